use crate::errors::Result;
use crate::mod_reg_rm::ModRegRM;
use crate::reader::ByteReader;
use crate::traits::OpCodeExt;
use crate::{register_from_encoding, segment_from_encoding};
use sim86_instruction::bits::sign_extend;
use sim86_instruction::{Operand, OperandSize, Operation, Register};

/// Operands in `(destination, source)` order.
pub(crate) type Operands = (Operand, Operand);

const MOV_RM16_SEGMENT: u8 = 0x8C;
const MOV_SEGMENT_RM16: u8 = 0x8E;

// x x x x x x d w | mod reg r/m | (disp-lo) | (disp-hi)
pub(crate) fn register_or_memory_and_register(
    op_code: u8,
    reader: &mut ByteReader,
) -> Result<Operands> {
    let mrrm = ModRegRM::from_byte(reader.read_u8()?);

    // 1 0 0 0 1 1 d 0 | mod 0 sr r/m
    if matches!(op_code, MOV_RM16_SEGMENT | MOV_SEGMENT_RM16) {
        let segment = Operand::Register(segment_from_encoding(mrrm.reg)?);
        let reg_mem = mrrm.register_or_memory(OperandSize::Word, reader)?;

        return Ok(if op_code == MOV_SEGMENT_RM16 {
            (segment, reg_mem)
        } else {
            (reg_mem, segment)
        });
    }

    let operand_size = op_code.operand_size();

    let reg = Operand::Register(register_from_encoding(mrrm.reg, operand_size)?);
    let reg_mem = mrrm.register_or_memory(operand_size, reader)?;

    Ok(if op_code.reg_is_destination() {
        (reg, reg_mem)
    } else {
        (reg_mem, reg)
    })
}

// x x x x x x s w | mod x x x r/m | (disp-lo) | (disp-hi) | data | data if s w = 0 1
//
// The operation is picked by the caller, based on the mod/reg/r_m byte. The `s` bit is only
// honored when `sign_extension` is set.
pub(crate) fn immediate_to_register_or_memory(
    operation: impl Fn(&ModRegRM) -> Result<Operation>,
    sign_extension: bool,
    op_code: u8,
    reader: &mut ByteReader,
) -> Result<(Operation, Operand, Operand)> {
    let mrrm = ModRegRM::from_byte(reader.read_u8()?);
    let operation = operation(&mrrm)?;

    let operand_size = op_code.operand_size();
    let destination = mrrm.register_or_memory(operand_size, reader)?;

    let source = if sign_extension && op_code.sign_extends() {
        let value = reader.read_u8()?;
        match operand_size {
            OperandSize::Byte => Operand::ImmediateByte(value),
            OperandSize::Word => Operand::ImmediateWord(sign_extend(value)),
        }
    } else {
        Operand::immediate(operand_size, reader.read_sized(operand_size)?)
    };

    Ok((operation, destination, source))
}

// x x x x x x x w | data | data if w = 1
pub(crate) fn immediate_to_accumulator(op_code: u8, reader: &mut ByteReader) -> Result<Operands> {
    let operand_size = op_code.operand_size();

    let accumulator = match operand_size {
        OperandSize::Byte => Register::AL,
        OperandSize::Word => Register::AX,
    };

    Ok((
        accumulator.into(),
        Operand::immediate(operand_size, reader.read_sized(operand_size)?),
    ))
}
