use sim86_instruction::bits::is_bit_set_from_right;
use sim86_instruction::OperandSize;

/// Access to the control bits at the low end of an op code.
pub(crate) trait OpCodeExt {
    /// `w`: operate on words instead of bytes.
    fn operand_size(self) -> OperandSize;

    /// `d`: the `reg` field names the destination.
    fn reg_is_destination(self) -> bool;

    /// `s`: a byte immediate is sign extended to the operand size.
    fn sign_extends(self) -> bool;
}

impl OpCodeExt for u8 {
    #[inline]
    fn operand_size(self) -> OperandSize {
        OperandSize::from_w_bit(is_bit_set_from_right(self, 0))
    }

    #[inline]
    fn reg_is_destination(self) -> bool {
        is_bit_set_from_right(self, 1)
    }

    #[inline]
    fn sign_extends(self) -> bool {
        is_bit_set_from_right(self, 1)
    }
}
