use crate::Register;
use std::fmt::{Display, Formatter};

/// How many displacement bytes follow the mod/reg/r_m byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplacementWidth {
    None,
    Byte,
    Word,
}

/// The formula used to calculate a memory operand's address: up to two registers summed together,
/// plus a displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectiveAddressCalculation {
    pub first: Option<Register>,
    pub second: Option<Register>,
    pub displacement: DisplacementWidth,
    /// mod=00 r_m=110: no registers, only a 16-bit address.
    pub direct: bool,
}

impl EffectiveAddressCalculation {
    const fn new(
        first: Register,
        second: Option<Register>,
        displacement: DisplacementWidth,
    ) -> Self {
        Self {
            first: Some(first),
            second,
            displacement,
            direct: false,
        }
    }

    pub const DIRECT: Self = Self {
        first: None,
        second: None,
        displacement: DisplacementWidth::Word,
        direct: true,
    };

    #[inline]
    pub fn has_displacement(&self) -> bool {
        self.displacement != DisplacementWidth::None
    }
}

macro_rules! calculation_table {
    ($width:expr, $r_m_110:expr) => {
        [
            EffectiveAddressCalculation::new(Register::BX, Some(Register::SI), $width),
            EffectiveAddressCalculation::new(Register::BX, Some(Register::DI), $width),
            EffectiveAddressCalculation::new(Register::BP, Some(Register::SI), $width),
            EffectiveAddressCalculation::new(Register::BP, Some(Register::DI), $width),
            EffectiveAddressCalculation::new(Register::SI, None, $width),
            EffectiveAddressCalculation::new(Register::DI, None, $width),
            $r_m_110,
            EffectiveAddressCalculation::new(Register::BX, None, $width),
        ]
    };
}

const MOD_00: [EffectiveAddressCalculation; 8] = calculation_table!(
    DisplacementWidth::None,
    EffectiveAddressCalculation::DIRECT
);

const MOD_01: [EffectiveAddressCalculation; 8] = calculation_table!(
    DisplacementWidth::Byte,
    EffectiveAddressCalculation::new(Register::BP, None, DisplacementWidth::Byte)
);

const MOD_10: [EffectiveAddressCalculation; 8] = calculation_table!(
    DisplacementWidth::Word,
    EffectiveAddressCalculation::new(Register::BP, None, DisplacementWidth::Word)
);

/// Look up the address calculation for the `r_m` and `mod` fields of a mod/reg/r_m byte. Returns
/// `None` for mod=11, which addresses a register and not memory.
pub fn effective_address_calculation(r_m: u8, mode: u8) -> Option<EffectiveAddressCalculation> {
    debug_assert!(r_m <= 0b111 && mode <= 0b11);

    let table = match mode {
        0b00 => &MOD_00,
        0b01 => &MOD_01,
        0b10 => &MOD_10,
        _ => return None,
    };

    Some(table[(r_m & 0b111) as usize])
}

/// A memory operand: the address calculation and the displacement that was decoded for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectiveAddress {
    pub calculation: EffectiveAddressCalculation,
    pub displacement: Option<i16>,
}

impl EffectiveAddress {
    pub fn new(calculation: EffectiveAddressCalculation, displacement: Option<i16>) -> Self {
        debug_assert_eq!(calculation.has_displacement(), displacement.is_some());

        Self {
            calculation,
            displacement,
        }
    }

    pub fn direct(address: u16) -> Self {
        Self::new(EffectiveAddressCalculation::DIRECT, Some(address as i16))
    }
}

impl Display for EffectiveAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let calculation = &self.calculation;

        if calculation.direct {
            return write!(f, "[{}]", self.displacement.unwrap_or_default() as u16);
        }

        "[".fmt(f)?;
        if let Some(first) = calculation.first {
            first.fmt(f)?;
        }
        if let Some(second) = calculation.second {
            write!(f, " + {}", second)?;
        }
        match self.displacement {
            Some(displacement) if displacement < 0 => {
                write!(f, " - {}", displacement.unsigned_abs())?
            }
            Some(displacement) => write!(f, " + {}", displacement)?,
            None => {}
        }
        "]".fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_mode_has_no_calculation() {
        for r_m in 0..=0b111 {
            assert!(effective_address_calculation(r_m, 0b11).is_none());
        }
    }

    #[test]
    fn direct_address_only_in_mod_00() {
        assert_eq!(
            effective_address_calculation(0b110, 0b00),
            Some(EffectiveAddressCalculation::DIRECT)
        );

        let bp = effective_address_calculation(0b110, 0b01).unwrap();
        assert!(!bp.direct);
        assert_eq!(bp.first, Some(Register::BP));
        assert_eq!(bp.displacement, DisplacementWidth::Byte);
    }

    #[test]
    fn displacement_width_follows_mod() {
        for r_m in 0..=0b111 {
            if r_m != 0b110 {
                assert_eq!(
                    effective_address_calculation(r_m, 0b00).unwrap().displacement,
                    DisplacementWidth::None
                );
            }
            assert_eq!(
                effective_address_calculation(r_m, 0b01).unwrap().displacement,
                DisplacementWidth::Byte
            );
            assert_eq!(
                effective_address_calculation(r_m, 0b10).unwrap().displacement,
                DisplacementWidth::Word
            );
        }
    }

    #[test]
    fn display() {
        let bx_si = effective_address_calculation(0b000, 0b00).unwrap();
        assert_eq!(EffectiveAddress::new(bx_si, None).to_string(), "[bx + si]");

        let bp = effective_address_calculation(0b110, 0b01).unwrap();
        assert_eq!(EffectiveAddress::new(bp, Some(5)).to_string(), "[bp + 5]");
        assert_eq!(EffectiveAddress::new(bp, Some(0)).to_string(), "[bp + 0]");

        let bx_di = effective_address_calculation(0b001, 0b10).unwrap();
        assert_eq!(
            EffectiveAddress::new(bx_di, Some(-37)).to_string(),
            "[bx + di - 37]"
        );
        assert_eq!(
            EffectiveAddress::new(bx_di, Some(i16::MIN)).to_string(),
            "[bx + di - 32768]"
        );

        assert_eq!(EffectiveAddress::direct(3458).to_string(), "[3458]");
        assert_eq!(EffectiveAddress::direct(0xFFFF).to_string(), "[65535]");
    }
}
