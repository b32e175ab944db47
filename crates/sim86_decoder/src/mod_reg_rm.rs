use crate::errors::Result;
use crate::reader::ByteReader;
use crate::register_from_encoding;
use sim86_instruction::bits::bits_from_left;
use sim86_instruction::{
    effective_address_calculation, DisplacementWidth, EffectiveAddress, Operand, OperandSize,
};

/// The fields of the addressing mode byte that follows many op codes.
///
/// ```text
/// 7 6 | 5 4 3 | 2 1 0
/// mod |  reg  |  r_m
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModRegRM {
    pub mode: u8,
    pub reg: u8,
    pub r_m: u8,
}

impl ModRegRM {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            mode: bits_from_left(byte, 0, 2),
            reg: bits_from_left(byte, 2, 3),
            r_m: bits_from_left(byte, 5, 3),
        }
    }

    pub fn as_byte(&self) -> u8 {
        (self.mode << 6) | (self.reg << 3) | self.r_m
    }

    /// Decode the `r_m` side of the byte, consuming any displacement that follows it.
    pub fn register_or_memory(
        &self,
        operand_size: OperandSize,
        reader: &mut ByteReader,
    ) -> Result<Operand> {
        let Some(calculation) = effective_address_calculation(self.r_m, self.mode) else {
            return Ok(register_from_encoding(self.r_m, operand_size)?.into());
        };

        let displacement = match calculation.displacement {
            DisplacementWidth::None => None,
            DisplacementWidth::Byte => Some(reader.read_i8()? as i16),
            DisplacementWidth::Word => Some(reader.read_i16()?),
        };

        Ok(EffectiveAddress::new(calculation, displacement).into())
    }
}
