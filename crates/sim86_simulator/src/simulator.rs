use crate::arithmetic::{byte, word, ArithmeticFn};
use crate::error::{Result, SimulateError};
use crate::state::{Flags, State};
use sim86_instruction::{Instruction, Operand, Operation, Register};
use std::fmt::{Display, Formatter};

/// The record of a single executed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub instruction: Instruction,
    pub ip_before: u16,
    pub ip_after: u16,
    /// The state after the instruction was executed.
    pub state: State,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ; ip: {:#06x} -> {:#06x}",
            self.instruction, self.ip_before, self.ip_after
        )
    }
}

pub struct Simulator {
    instructions: Vec<Instruction>,
    /// Index of the next instruction to execute.
    cursor: usize,
    state: State,
}

impl Simulator {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            cursor: 0,
            state: State::default(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.instructions.len()
    }

    /// Execute the instruction under the cursor. Returns `None` once the cursor moved past the
    /// last instruction.
    pub fn step(&mut self) -> Result<Option<Step>> {
        let Some(&instruction) = self.instructions.get(self.cursor) else {
            return Ok(None);
        };

        let ip_before = self.state.ip;

        // The instruction pointer and cursor point to the next instruction while executing, jump
        // offsets are relative to it.
        self.state.ip = self.state.ip.wrapping_add(instruction.size as u16);
        self.cursor += 1;

        if let Err(err) = self.execute(&instruction) {
            tracing::warn!("{:04X}  {} failed: {}", ip_before, instruction, err);
            return Err(err);
        }

        let step = Step {
            instruction,
            ip_before,
            ip_after: self.state.ip,
            state: self.state,
        };

        tracing::info!("{}", step);

        Ok(Some(step))
    }

    /// Run until the end of the instruction stream, calling `on_step` after every instruction.
    pub fn run_with(&mut self, mut on_step: impl FnMut(&Step)) -> Result<()> {
        while let Some(step) = self.step()? {
            on_step(&step);
        }
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        self.run_with(|_| {})
    }

    fn execute(&mut self, instruction: &Instruction) -> Result<()> {
        match instruction.operation {
            Operation::MOV => self.mov(instruction),
            Operation::ADD | Operation::SUB | Operation::CMP => self.arithmetic(instruction),
            Operation::JNE => {
                if self.state.flags.contains(Flags::ZERO) {
                    return Ok(());
                }
                match instruction.destination {
                    Operand::RelativeOffset(offset) => self.jump(offset),
                    operand => Err(SimulateError::UnsupportedOperand {
                        operation: instruction.operation,
                        operand,
                    }),
                }
            }
            operation => Err(SimulateError::Unimplemented(operation)),
        }
    }

    fn mov(&mut self, instruction: &Instruction) -> Result<()> {
        let destination = self.destination_register(instruction)?;
        let value = self.source_value(instruction)?;

        self.state.set_register(destination, value);

        Ok(())
    }

    fn arithmetic(&mut self, instruction: &Instruction) -> Result<()> {
        let destination = self.destination_register(instruction)?;
        let left = self.state.register(destination);
        let right = self.source_value(instruction)?;
        let flags = &mut self.state.flags;

        let result = if destination.is_byte() {
            let op: ArithmeticFn<u8> = match instruction.operation {
                Operation::ADD => byte::add,
                Operation::SUB => byte::subtract,
                _ => byte::compare,
            };
            op(left as u8, right as u8, flags).map(u16::from)
        } else {
            let op: ArithmeticFn<u16> = match instruction.operation {
                Operation::ADD => word::add,
                Operation::SUB => word::subtract,
                _ => word::compare,
            };
            op(left, right, flags)
        };

        if let Some(result) = result {
            self.state.set_register(destination, result);
        }

        Ok(())
    }

    fn destination_register(&self, instruction: &Instruction) -> Result<Register> {
        match instruction.destination {
            Operand::Register(register) => Ok(register),
            operand => Err(SimulateError::UnsupportedOperand {
                operation: instruction.operation,
                operand,
            }),
        }
    }

    fn source_value(&self, instruction: &Instruction) -> Result<u16> {
        match instruction.source {
            Operand::Register(register) => Ok(self.state.register(register)),
            Operand::ImmediateByte(value) => Ok(value as u16),
            Operand::ImmediateWord(value) => Ok(value),
            operand => Err(SimulateError::UnsupportedOperand {
                operation: instruction.operation,
                operand,
            }),
        }
    }

    /// Move the cursor by whole instructions until their sizes add up to `offset` bytes. The
    /// cursor is already past the jump itself.
    fn jump(&mut self, offset: i8) -> Result<()> {
        let target = offset as isize;
        let mut cursor = self.cursor;
        let mut delta: isize = 0;

        if target > 0 {
            while delta < target {
                let Some(instruction) = self.instructions.get(cursor) else {
                    return Err(SimulateError::JumpOutOfBounds { offset });
                };
                delta += instruction.size as isize;
                cursor += 1;
            }
        } else {
            while delta > target {
                if cursor == 0 {
                    return Err(SimulateError::JumpOutOfBounds { offset });
                }
                cursor -= 1;
                delta -= self.instructions[cursor].size as isize;
            }
        }

        if delta != target {
            return Err(SimulateError::JumpOvershoot {
                offset,
                landed: delta,
            });
        }

        tracing::debug!(
            "jump by {} moves the cursor from {} to {}",
            offset,
            self.cursor,
            cursor
        );

        self.cursor = cursor;
        self.state.ip = self.state.ip.wrapping_add(delta as u16);

        Ok(())
    }
}

#[cfg(test)]
#[path = "_tests/simulator.rs"]
mod tests;
