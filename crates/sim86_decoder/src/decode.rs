use crate::common::{
    immediate_to_accumulator, immediate_to_register_or_memory, register_or_memory_and_register,
};
use crate::errors::{DecodeError, Result};
use crate::mod_reg_rm::ModRegRM;
use crate::reader::ByteReader;
use crate::register_from_encoding;
use crate::traits::OpCodeExt;
use sim86_instruction::bits::{bits_from_right, is_bit_set_from_right};
use sim86_instruction::{
    EffectiveAddress, Instruction, Operand, OperandSize, Operation, Register,
};

/// The immediate group (0x80..=0x83) does not encode the operation in the op code, it is stored
/// in the `reg` field of the mod/reg/r_m byte.
fn group_operation(mrrm: &ModRegRM) -> Result<Operation> {
    match mrrm.reg {
        0b000 => Ok(Operation::ADD),
        0b101 => Ok(Operation::SUB),
        0b111 => Ok(Operation::CMP),
        _ => Err(DecodeError::InvalidGroupSelector(mrrm.as_byte())),
    }
}

fn jump_operation(op_code: u8) -> Option<Operation> {
    use Operation::*;

    Some(match op_code {
        0x70 => JO,
        0x71 => JNO,
        0x72 => JB,
        0x73 => JAE,
        0x74 => JE,
        0x75 => JNE,
        0x76 => JBE,
        0x77 => JA,
        0x78 => JS,
        0x79 => JNS,
        0x7A => JP,
        0x7B => JNP,
        0x7C => JL,
        0x7D => JGE,
        0x7E => JLE,
        0x7F => JG,
        0xE0 => LOOPNE,
        0xE1 => LOOPE,
        0xE2 => LOOP,
        0xE3 => JCXZ,
        _ => return None,
    })
}

/// Decode a single instruction starting at the reader's current position. On success the reader
/// is positioned at the start of the next instruction.
pub fn decode_instruction(reader: &mut ByteReader) -> Result<Instruction> {
    let start = reader.position();
    let op_code = reader.read_u8()?;

    let (operation, destination, source) = match op_code {
        // mov

        // 1 0 1 1 w reg | data | data if w = 1
        0xB0..=0xBF => {
            let operand_size = OperandSize::from_w_bit(is_bit_set_from_right(op_code, 3));
            let register = register_from_encoding(bits_from_right(op_code, 2, 3), operand_size)?;
            let immediate = Operand::immediate(operand_size, reader.read_sized(operand_size)?);

            (Operation::MOV, register.into(), immediate)
        }

        // 1 0 1 0 0 0 0 w | addr-lo | addr-hi    memory to accumulator
        // 1 0 1 0 0 0 1 w | addr-lo | addr-hi    accumulator to memory
        0xA0..=0xA3 => {
            let accumulator = match op_code.operand_size() {
                OperandSize::Byte => Register::AL,
                OperandSize::Word => Register::AX,
            };
            let memory = EffectiveAddress::direct(reader.read_u16()?);

            if is_bit_set_from_right(op_code, 1) {
                (Operation::MOV, memory.into(), accumulator.into())
            } else {
                (Operation::MOV, accumulator.into(), memory.into())
            }
        }

        // 1 1 0 0 0 1 1 w | mod 0 0 0 r/m | (disp-lo) | (disp-hi) | data | data if w = 1
        0xC6 | 0xC7 => {
            immediate_to_register_or_memory(|_| Ok(Operation::MOV), false, op_code, reader)?
        }

        // 1 0 0 0 1 0 d w | mod reg r/m
        // 1 0 0 0 1 1 1 0 | mod 0 sr r/m
        // 1 0 0 0 1 1 0 0 | mod 0 sr r/m
        0x88..=0x8C | 0x8E => {
            let (destination, source) = register_or_memory_and_register(op_code, reader)?;
            (Operation::MOV, destination, source)
        }

        // add / sub / cmp

        // 0 0 x x x 0 d w | mod reg r/m
        0x00..=0x03 | 0x28..=0x2B | 0x38..=0x3B => {
            let operation = match op_code >> 3 {
                0b00_000 => Operation::ADD,
                0b00_101 => Operation::SUB,
                _ => Operation::CMP,
            };
            let (destination, source) = register_or_memory_and_register(op_code, reader)?;
            (operation, destination, source)
        }

        // 1 0 0 0 0 0 s w | mod x x x r/m | (disp-lo) | (disp-hi) | data | data if s w = 0 1
        0x80..=0x83 => immediate_to_register_or_memory(group_operation, true, op_code, reader)?,

        // 0 0 x x x 1 0 w | data | data if w = 1
        0x04 | 0x05 | 0x2C | 0x2D | 0x3C | 0x3D => {
            let operation = match op_code >> 3 {
                0b00_000 => Operation::ADD,
                0b00_101 => Operation::SUB,
                _ => Operation::CMP,
            };
            let (destination, source) = immediate_to_accumulator(op_code, reader)?;
            (operation, destination, source)
        }

        // jumps

        // op code | ip-inc8
        _ => match jump_operation(op_code) {
            Some(operation) => {
                let offset = reader.read_i8()?;
                (operation, Operand::RelativeOffset(offset), Operand::None)
            }
            None => {
                return Err(DecodeError::InvalidOpCode {
                    op_code,
                    position: start,
                })
            }
        },
    };

    let instruction = Instruction::new(
        operation,
        destination,
        source,
        reader.position() - start,
    );

    tracing::debug!("{:04X}  {}", start, instruction);

    Ok(instruction)
}

/// Decode the entire buffer. Any byte sequence that can not be decoded fails the whole decode.
pub fn decode(data: &[u8]) -> Result<Vec<Instruction>> {
    let mut reader = ByteReader::new(data);
    let mut instructions = Vec::new();

    while !reader.is_at_end() {
        let instruction = decode_instruction(&mut reader).map_err(|err| {
            tracing::warn!("Decoding stopped after {} instructions: {}", instructions.len(), err);
            err
        })?;
        instructions.push(instruction);
    }

    Ok(instructions)
}

#[cfg(test)]
#[path = "_tests/decode.rs"]
mod tests;
