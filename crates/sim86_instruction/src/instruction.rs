use crate::{Operand, Operation};
use std::fmt::{Display, Formatter};

/// Representation of a decoded 8086 instruction.
///
/// ```rust
/// use sim86_instruction::*;
///
/// // mov ax, [bp + 5]
/// let i = Instruction::new(
///     Operation::MOV,
///     Operand::Register(Register::AX),
///     Operand::EffectiveAddress(EffectiveAddress::new(
///         effective_address_calculation(0b110, 0b01).unwrap(),
///         Some(5),
///     )),
///     3,
/// );
/// assert_eq!(i.to_string(), "mov ax, [bp + 5]");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Operation,
    pub destination: Operand,
    /// [Operand::None] for single operand instructions.
    pub source: Operand,
    /// Number of bytes the instruction was encoded in.
    pub size: usize,
}

impl Instruction {
    pub fn new(operation: Operation, destination: Operand, source: Operand, size: usize) -> Self {
        Self {
            operation,
            destination,
            source,
            size,
        }
    }

    /// Create a short jump instruction, always encoded in 2 bytes.
    pub fn jump(operation: Operation, offset: i8) -> Self {
        Self::new(operation, Operand::RelativeOffset(offset), Operand::None, 2)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.operation, self.destination)?;

        match self.source {
            Operand::None => Ok(()),
            // The size can not be implied from a memory destination.
            Operand::ImmediateByte(value) if self.destination.is_memory() => {
                write!(f, ", byte {}", value)
            }
            Operand::ImmediateWord(value) if self.destination.is_memory() => {
                write!(f, ", word {}", value)
            }
            source => write!(f, ", {}", source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effective_address_calculation, EffectiveAddress, Register};

    #[test]
    fn register_destination_implies_size() {
        let i = Instruction::new(
            Operation::MOV,
            Register::CX.into(),
            Operand::ImmediateWord(12),
            3,
        );
        assert_eq!(i.to_string(), "mov cx, 12");

        let i = Instruction::new(
            Operation::ADD,
            Register::AL.into(),
            Operand::ImmediateByte(200),
            2,
        );
        assert_eq!(i.to_string(), "add al, 200");
    }

    #[test]
    fn memory_destination_gets_explicit_size() {
        let bx = effective_address_calculation(0b111, 0b00).unwrap();

        let i = Instruction::new(
            Operation::MOV,
            EffectiveAddress::new(bx, None).into(),
            Operand::ImmediateByte(7),
            3,
        );
        assert_eq!(i.to_string(), "mov [bx], byte 7");

        let i = Instruction::new(
            Operation::CMP,
            EffectiveAddress::direct(4834).into(),
            Operand::ImmediateWord(29),
            5,
        );
        assert_eq!(i.to_string(), "cmp [4834], word 29");
    }

    #[test]
    fn register_and_memory() {
        let bp_si = effective_address_calculation(0b010, 0b00).unwrap();
        let i = Instruction::new(
            Operation::SUB,
            EffectiveAddress::new(bp_si, None).into(),
            Register::CH.into(),
            2,
        );
        assert_eq!(i.to_string(), "sub [bp + si], ch");
    }

    #[test]
    fn jumps_render_relative_to_themselves() {
        assert_eq!(Instruction::jump(Operation::JNE, -4).to_string(), "jne $-2");
        assert_eq!(Instruction::jump(Operation::JE, -2).to_string(), "je $+0");
        assert_eq!(Instruction::jump(Operation::LOOP, 4).to_string(), "loop $+6");
        assert_eq!(
            Instruction::jump(Operation::JCXZ, -128).to_string(),
            "jcxz $-126"
        );
        assert!(Operation::LOOPNE.is_jump());
        assert!(!Operation::CMP.is_jump());
    }
}
