//! Executes a decoded 8086 instruction stream against a register file.
//!
//! Memory is not modeled, only registers, the zero and sign flags and the instruction pointer.

mod arithmetic;
mod error;
mod simulator;
mod state;

pub use error::{Result, SimulateError};
pub use simulator::{Simulator, Step};
pub use state::{Flags, State};
