use crate::{EffectiveAddress, Register};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSize {
    Byte,
    Word,
}

impl OperandSize {
    /// Decode the `w` bit of an op code.
    #[inline]
    pub fn from_w_bit(w: bool) -> Self {
        if w {
            OperandSize::Word
        } else {
            OperandSize::Byte
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Operand {
    /// The unused slot of an instruction.
    #[default]
    None,
    Register(Register),
    EffectiveAddress(EffectiveAddress),
    ImmediateByte(u8),
    ImmediateWord(u16),
    /// Signed offset of a short jump, relative to the address of the next instruction.
    RelativeOffset(i8),
}

impl Operand {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }

    #[inline]
    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::EffectiveAddress(_))
    }

    pub fn immediate(size: OperandSize, value: u16) -> Self {
        match size {
            OperandSize::Byte => Operand::ImmediateByte(value as u8),
            OperandSize::Word => Operand::ImmediateWord(value),
        }
    }
}

impl From<Register> for Operand {
    fn from(register: Register) -> Self {
        Operand::Register(register)
    }
}

impl From<EffectiveAddress> for Operand {
    fn from(address: EffectiveAddress) -> Self {
        Operand::EffectiveAddress(address)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Register(register) => register.fmt(f),
            Operand::EffectiveAddress(address) => address.fmt(f),
            Operand::ImmediateByte(value) => value.fmt(f),
            Operand::ImmediateWord(value) => value.fmt(f),
            Operand::RelativeOffset(offset) => {
                // NASM's `$` is the address of the jump itself, the encoded offset is relative to
                // the instruction after the 2 byte jump.
                let relative = *offset as i16 + 2;
                if relative < 0 {
                    write!(f, "$-{}", relative.unsigned_abs())
                } else {
                    write!(f, "$+{}", relative)
                }
            }
        }
    }
}
