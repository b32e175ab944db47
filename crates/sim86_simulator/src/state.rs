use bitflags::bitflags;
use sim86_instruction::bits::{combine, hex_u16, high_byte, low_byte};
use sim86_instruction::{PhysicalRegister, Register, RegisterPart};
use std::fmt::{Display, Formatter};

bitflags! {
    /// Only the flags that `add`, `sub` and `cmp` update are modeled. The bit positions match the
    /// 8086 flags register.
    pub struct Flags : u16 {
        const ZERO = 1 << 6;
        const SIGN = 1 << 7;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct State {
    registers: [u16; 12],

    pub ip: u16,
    pub flags: Flags,
}

impl State {
    /// The full 16-bit value of a storage cell.
    #[inline(always)]
    pub fn physical(&self, register: PhysicalRegister) -> u16 {
        self.registers[register.index()]
    }

    /// The value addressed by `register`. Byte registers are zero extended.
    pub fn register(&self, register: Register) -> u16 {
        let (physical, part) = register.location();
        let value = self.physical(physical);

        match part {
            RegisterPart::Low => low_byte(value) as u16,
            RegisterPart::High => high_byte(value) as u16,
            RegisterPart::Full => value,
        }
    }

    /// Write `value` to the bits addressed by `register`, leaving the rest of the storage cell
    /// untouched. Byte registers only take the low byte of `value`.
    pub fn set_register(&mut self, register: Register, value: u16) {
        let (physical, part) = register.location();
        let cell = &mut self.registers[physical.index()];

        *cell = match part {
            RegisterPart::Low => combine(low_byte(value), high_byte(*cell)),
            RegisterPart::High => combine(low_byte(*cell), low_byte(value)),
            RegisterPart::Full => value,
        };
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            registers: [0; 12],
            ip: 0,
            flags: Flags::empty(),
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for register in PhysicalRegister::ALL {
            let value = self.physical(register);
            writeln!(f, "{}: {} ({})", register.full(), hex_u16(value), value)?;
        }

        writeln!(f, "ip: {} ({})", hex_u16(self.ip), self.ip)?;

        write!(f, "flags:")?;
        if !self.flags.is_empty() {
            write!(f, " ")?;
        }

        macro_rules! print_flag {
            ($name:ident,$flag:expr) => {{
                if self.flags.contains($flag) {
                    write!(f, "{}", stringify!($name))?;
                }
            }};
        }

        print_flag!(S, Flags::SIGN);
        print_flag!(Z, Flags::ZERO);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let state = State::default();
        for register in PhysicalRegister::ALL {
            assert_eq!(state.physical(register), 0);
        }
        assert_eq!(state.ip, 0);
        assert!(state.flags.is_empty());
    }

    #[test]
    fn byte_parts_share_storage() {
        let mut state = State::default();

        state.set_register(Register::AX, 0x1234);
        assert_eq!(state.register(Register::AL), 0x34);
        assert_eq!(state.register(Register::AH), 0x12);

        state.set_register(Register::AL, 0xFF);
        assert_eq!(state.register(Register::AX), 0x12FF);

        state.set_register(Register::AH, 0x00);
        assert_eq!(state.register(Register::AX), 0x00FF);

        // Only the low byte of the value is written to a byte register.
        state.set_register(Register::BH, 0xABCD);
        assert_eq!(state.register(Register::BX), 0xCD00);
        assert_eq!(state.physical(PhysicalRegister::A), 0x00FF);
    }

    #[test]
    fn segment_registers() {
        let mut state = State::default();

        state.set_register(Register::SS, 0x4000);
        state.set_register(Register::DS, 0x1000);
        assert_eq!(state.register(Register::SS), 0x4000);
        assert_eq!(state.physical(PhysicalRegister::DS), 0x1000);
        assert_eq!(state.register(Register::ES), 0);
    }

    #[test]
    fn display() {
        let mut state = State::default();
        state.set_register(Register::BX, 0xFFFF);
        state.ip = 14;
        state.flags = Flags::SIGN | Flags::ZERO;

        let text = state.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "ax: 0x0000 (0)");
        assert_eq!(lines[1], "bx: 0xffff (65535)");
        assert_eq!(lines[11], "ds: 0x0000 (0)");
        assert_eq!(lines[12], "ip: 0x000e (14)");
        assert_eq!(lines[13], "flags: SZ");

        state.flags = Flags::empty();
        assert!(state.to_string().ends_with("flags:"));
    }
}
