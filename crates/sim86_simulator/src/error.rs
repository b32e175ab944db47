use sim86_instruction::{Operand, Operation};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SimulateError {
    #[error("jump by {offset} does not land on an instruction boundary (stopped at {landed})")]
    JumpOvershoot { offset: i8, landed: isize },

    #[error("jump by {offset} leaves the instruction stream")]
    JumpOutOfBounds { offset: i8 },

    #[error("execution of {0} is not implemented")]
    Unimplemented(Operation),

    #[error("operand \"{operand}\" is not supported by {operation}")]
    UnsupportedOperand {
        operation: Operation,
        operand: Operand,
    },
}

pub type Result<T> = std::result::Result<T, SimulateError>;
