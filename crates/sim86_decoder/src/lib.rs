//! Decodes a flat buffer of 8086 machine code into [Instruction]s.
//!
//! Only the `mov`, `add`, `sub` and `cmp` families and the short jumps are recognized.

mod common;
mod decode;
mod errors;
mod mod_reg_rm;
mod reader;
mod traits;

pub use decode::{decode, decode_instruction};
pub use errors::{DecodeError, Result};
pub use mod_reg_rm::ModRegRM;
pub use reader::ByteReader;
pub use sim86_instruction::Instruction;

use sim86_instruction::{OperandSize, Register};

/// Register named by a 3-bit `reg` or `r_m` field.
pub(crate) fn register_from_encoding(encoding: u8, operand_size: OperandSize) -> Result<Register> {
    use Register::*;

    let register = match (operand_size, encoding) {
        (OperandSize::Byte, 0b000) => AL,
        (OperandSize::Byte, 0b001) => CL,
        (OperandSize::Byte, 0b010) => DL,
        (OperandSize::Byte, 0b011) => BL,
        (OperandSize::Byte, 0b100) => AH,
        (OperandSize::Byte, 0b101) => CH,
        (OperandSize::Byte, 0b110) => DH,
        (OperandSize::Byte, 0b111) => BH,

        (OperandSize::Word, 0b000) => AX,
        (OperandSize::Word, 0b001) => CX,
        (OperandSize::Word, 0b010) => DX,
        (OperandSize::Word, 0b011) => BX,
        (OperandSize::Word, 0b100) => SP,
        (OperandSize::Word, 0b101) => BP,
        (OperandSize::Word, 0b110) => SI,
        (OperandSize::Word, 0b111) => DI,

        _ => return Err(DecodeError::InvalidRegisterEncoding(encoding)),
    };

    Ok(register)
}

/// Segment register named by the `reg` field of a segment move.
pub(crate) fn segment_from_encoding(encoding: u8) -> Result<Register> {
    match encoding {
        0b000 => Ok(Register::ES),
        0b001 => Ok(Register::CS),
        0b010 => Ok(Register::SS),
        0b011 => Ok(Register::DS),
        _ => Err(DecodeError::InvalidSegmentEncoding(encoding)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_encodings() {
        assert_eq!(
            register_from_encoding(0b000, OperandSize::Word),
            Ok(Register::AX)
        );
        assert_eq!(
            register_from_encoding(0b100, OperandSize::Byte),
            Ok(Register::AH)
        );
        assert_eq!(
            register_from_encoding(0b100, OperandSize::Word),
            Ok(Register::SP)
        );
        assert_eq!(
            register_from_encoding(0b1000, OperandSize::Word),
            Err(DecodeError::InvalidRegisterEncoding(0b1000))
        );
    }

    #[test]
    fn segment_encodings() {
        assert_eq!(segment_from_encoding(0b000), Ok(Register::ES));
        assert_eq!(segment_from_encoding(0b011), Ok(Register::DS));
        assert_eq!(
            segment_from_encoding(0b100),
            Err(DecodeError::InvalidSegmentEncoding(0b100))
        );
    }
}
