use crate::errors::{DecodeError, Result};
use sim86_instruction::bits::{combine, to_i16, to_i8};
use sim86_instruction::OperandSize;

/// Sequential reader over a fixed buffer of bytes. Words are read little endian.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move to an absolute position. Positions past the end are clamped to the end.
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.data.len());
    }

    pub fn peek_u8(&self) -> Result<u8> {
        self.peek_u8_at(0)
    }

    /// Look at the byte `offset` bytes away from the current position without consuming anything.
    pub fn peek_u8_at(&self, offset: isize) -> Result<u8> {
        self.position
            .checked_add_signed(offset)
            .and_then(|index| self.data.get(index))
            .copied()
            .ok_or(DecodeError::UnexpectedEndOfInput {
                position: self.position,
            })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Ok(byte)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(to_i8(self.read_u8()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        if self.remaining() < 2 {
            return Err(DecodeError::UnexpectedEndOfInput {
                position: self.position,
            });
        }

        let low = self.read_u8()?;
        let high = self.read_u8()?;
        Ok(combine(low, high))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(to_i16(self.read_u16()?))
    }

    /// Read a byte or a word, depending on `operand_size`. Bytes are zero extended.
    pub fn read_sized(&mut self, operand_size: OperandSize) -> Result<u16> {
        match operand_size {
            OperandSize::Byte => self.read_u8().map(u16::from),
            OperandSize::Word => self.read_u16(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_position() {
        let mut reader = ByteReader::new(&[0x01, 0x34, 0x12, 0xFF, 0xFE, 0xFF]);

        assert_eq!(reader.read_u8(), Ok(0x01));
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_u16(), Ok(0x1234));
        assert_eq!(reader.read_i8(), Ok(-1));
        assert_eq!(reader.read_i16(), Ok(-2));
        assert!(reader.is_at_end());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut reader = ByteReader::new(&[0xAA, 0xBB]);

        assert_eq!(reader.peek_u8(), Ok(0xAA));
        assert_eq!(reader.peek_u8_at(1), Ok(0xBB));
        assert_eq!(reader.position(), 0);

        reader.read_u8().unwrap();
        assert_eq!(reader.peek_u8_at(-1), Ok(0xAA));
        assert!(reader.peek_u8_at(-2).is_err());
        assert!(reader.peek_u8_at(1).is_err());
    }

    #[test]
    fn reading_past_the_end_fails_without_consuming() {
        let mut reader = ByteReader::new(&[0x05]);

        assert_eq!(
            reader.read_u16(),
            Err(DecodeError::UnexpectedEndOfInput { position: 0 })
        );
        assert_eq!(reader.position(), 0);

        assert_eq!(reader.read_sized(OperandSize::Byte), Ok(5));
        assert_eq!(
            reader.read_u8(),
            Err(DecodeError::UnexpectedEndOfInput { position: 1 })
        );
    }

    #[test]
    fn seek_clamps() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        reader.seek(2);
        assert_eq!(reader.read_u8(), Ok(3));
        reader.seek(100);
        assert_eq!(reader.position(), 3);
        reader.seek(0);
        assert_eq!(reader.read_sized(OperandSize::Word), Ok(0x0201));
    }
}
