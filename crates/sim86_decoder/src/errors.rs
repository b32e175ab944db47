#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unexpected end of input at byte {position}")]
    UnexpectedEndOfInput { position: usize },

    #[error("Invalid op code ({op_code:#04x}) at byte {position}")]
    InvalidOpCode { op_code: u8, position: usize },

    #[error("Invalid group selector in mod/reg/r_m byte ({0:#010b})")]
    InvalidGroupSelector(u8),

    #[error("Invalid register encoding ({0:#05b})")]
    InvalidRegisterEncoding(u8),

    #[error("Invalid segment encoding ({0:#05b})")]
    InvalidSegmentEncoding(u8),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
