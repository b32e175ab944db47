//! This crate holds all the structs and constants to represent a decoded instruction for the 8086
//! microprocessor, along with the NASM compatible text rendering of them.

mod address;
mod instruction;
mod operand;
mod operation;
mod register;

pub mod bits;

pub use address::{
    effective_address_calculation, DisplacementWidth, EffectiveAddress,
    EffectiveAddressCalculation,
};
pub use instruction::Instruction;
pub use operand::{Operand, OperandSize};
pub use operation::Operation;
pub use register::{PhysicalRegister, Register, RegisterPart};
