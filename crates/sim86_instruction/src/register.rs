use std::fmt::{Display, Formatter};

/// A register name as it appears in an instruction. Several names alias the same
/// [PhysicalRegister].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    AL,
    CL,
    DL,
    BL,
    AH,
    CH,
    DH,
    BH,

    AX,
    CX,
    DX,
    BX,
    SP,
    BP,
    SI,
    DI,

    ES,
    CS,
    SS,
    DS,
}

/// The 12 16-bit storage cells of the 8086 that the simulator models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PhysicalRegister {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    SP = 4,
    BP = 5,
    SI = 6,
    DI = 7,
    ES = 8,
    CS = 9,
    SS = 10,
    DS = 11,
}

/// Which bits of a [PhysicalRegister] a [Register] addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterPart {
    Low,
    High,
    Full,
}

impl Register {
    /// The storage cell and the part of it this name reads and writes.
    pub const fn location(self) -> (PhysicalRegister, RegisterPart) {
        use PhysicalRegister as P;
        use RegisterPart::*;

        match self {
            Register::AL => (P::A, Low),
            Register::AH => (P::A, High),
            Register::AX => (P::A, Full),
            Register::BL => (P::B, Low),
            Register::BH => (P::B, High),
            Register::BX => (P::B, Full),
            Register::CL => (P::C, Low),
            Register::CH => (P::C, High),
            Register::CX => (P::C, Full),
            Register::DL => (P::D, Low),
            Register::DH => (P::D, High),
            Register::DX => (P::D, Full),
            Register::SP => (P::SP, Full),
            Register::BP => (P::BP, Full),
            Register::SI => (P::SI, Full),
            Register::DI => (P::DI, Full),
            Register::ES => (P::ES, Full),
            Register::CS => (P::CS, Full),
            Register::SS => (P::SS, Full),
            Register::DS => (P::DS, Full),
        }
    }

    #[inline]
    pub const fn part(self) -> RegisterPart {
        self.location().1
    }

    #[inline]
    pub const fn is_byte(self) -> bool {
        !matches!(self.part(), RegisterPart::Full)
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Register::*;

        let name = match self {
            AL => "al",
            CL => "cl",
            DL => "dl",
            BL => "bl",
            AH => "ah",
            CH => "ch",
            DH => "dh",
            BH => "bh",
            AX => "ax",
            CX => "cx",
            DX => "dx",
            BX => "bx",
            SP => "sp",
            BP => "bp",
            SI => "si",
            DI => "di",
            ES => "es",
            CS => "cs",
            SS => "ss",
            DS => "ds",
        };
        f.write_str(name)
    }
}

impl PhysicalRegister {
    pub const ALL: [PhysicalRegister; 12] = [
        PhysicalRegister::A,
        PhysicalRegister::B,
        PhysicalRegister::C,
        PhysicalRegister::D,
        PhysicalRegister::SP,
        PhysicalRegister::BP,
        PhysicalRegister::SI,
        PhysicalRegister::DI,
        PhysicalRegister::ES,
        PhysicalRegister::CS,
        PhysicalRegister::SS,
        PhysicalRegister::DS,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Only the four general purpose registers can be addressed by byte.
    pub const fn has_byte_parts(self) -> bool {
        matches!(
            self,
            PhysicalRegister::A | PhysicalRegister::B | PhysicalRegister::C | PhysicalRegister::D
        )
    }

    /// The word sized name of the register.
    pub const fn full(self) -> Register {
        match self {
            PhysicalRegister::A => Register::AX,
            PhysicalRegister::B => Register::BX,
            PhysicalRegister::C => Register::CX,
            PhysicalRegister::D => Register::DX,
            PhysicalRegister::SP => Register::SP,
            PhysicalRegister::BP => Register::BP,
            PhysicalRegister::SI => Register::SI,
            PhysicalRegister::DI => Register::DI,
            PhysicalRegister::ES => Register::ES,
            PhysicalRegister::CS => Register::CS,
            PhysicalRegister::SS => Register::SS,
            PhysicalRegister::DS => Register::DS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_general_registers_have_halves() {
        for physical in PhysicalRegister::ALL {
            assert_eq!(physical.full().location(), (physical, RegisterPart::Full));
        }

        let halves = [
            Register::AL,
            Register::AH,
            Register::BL,
            Register::BH,
            Register::CL,
            Register::CH,
            Register::DL,
            Register::DH,
        ];
        for register in halves {
            let (physical, part) = register.location();
            assert!(physical.has_byte_parts());
            assert_ne!(part, RegisterPart::Full);
            assert!(register.is_byte());
        }

        assert!(!PhysicalRegister::SP.has_byte_parts());
        assert!(!PhysicalRegister::DS.has_byte_parts());
    }

    #[test]
    fn aliases_share_storage() {
        assert_eq!(Register::AL.location().0, Register::AX.location().0);
        assert_eq!(Register::AH.location().0, Register::AX.location().0);
        assert_ne!(Register::AH.location().0, Register::SP.location().0);
    }

    #[test]
    fn display() {
        assert_eq!(Register::AX.to_string(), "ax");
        assert_eq!(Register::BH.to_string(), "bh");
        assert_eq!(Register::ES.to_string(), "es");
    }
}
