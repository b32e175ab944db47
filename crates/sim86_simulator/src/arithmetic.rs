use crate::state::Flags;

pub trait SignificantBit {
    fn most_significant_bit(&self) -> bool;
}

macro_rules! significant_bit {
    ($t:ident) => {
        impl SignificantBit for $t {
            fn most_significant_bit(&self) -> bool {
                self & (0x1 << (std::mem::size_of::<$t>() * 8) - 1) != 0
            }
        }
    };
}

significant_bit!(u8);
significant_bit!(u16);

/// Every operation returns the value to write back to the destination, or `None` if the
/// destination is left untouched.
pub type ArithmeticFn<T> = fn(T, T, &mut Flags) -> Option<T>;

macro_rules! arithmetic {
    ($t:ident) => {
        fn flags_from_result(flags: &mut Flags, result: $t) {
            flags.set(Flags::ZERO, result == 0);
            flags.set(Flags::SIGN, result.most_significant_bit());
        }

        pub fn add(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            let result = destination.wrapping_add(source);

            flags_from_result(flags, result);

            Some(result)
        }

        pub fn subtract(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            let result = destination.wrapping_sub(source);

            flags_from_result(flags, result);

            Some(result)
        }

        pub fn compare(destination: $t, source: $t, flags: &mut Flags) -> Option<$t> {
            let _ = subtract(destination, source, flags);
            None
        }
    };
}

pub mod byte {
    use super::*;

    arithmetic!(u8);
}

pub mod word {
    use super::*;

    arithmetic!(u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_flags(flags: &Flags, zero: bool, sign: bool) {
        assert_eq!(zero, flags.contains(Flags::ZERO), "ZERO");
        assert_eq!(sign, flags.contains(Flags::SIGN), "SIGN");
    }

    #[test]
    fn most_significant_bit() {
        for value in 0..=u8::MAX {
            assert_eq!(value.most_significant_bit(), value >= 0x80);
        }
        for value in 0..=u16::MAX {
            assert_eq!(value.most_significant_bit(), value >= 0x8000);
        }
    }

    #[test]
    fn add_word() {
        let mut flags = Flags::SIGN;
        assert_eq!(word::add(0, 0, &mut flags), Some(0));
        test_flags(&flags, true, false);

        assert_eq!(word::add(0x7FFF, 1, &mut flags), Some(0x8000));
        test_flags(&flags, false, true);

        assert_eq!(word::add(0xFFFF, 1, &mut flags), Some(0));
        test_flags(&flags, true, false);

        assert_eq!(word::add(1000, 10, &mut flags), Some(1010));
        test_flags(&flags, false, false);
    }

    #[test]
    fn subtract_word() {
        let mut flags = Flags::ZERO;
        assert_eq!(word::subtract(0, 1, &mut flags), Some(0xFFFF));
        test_flags(&flags, false, true);

        assert_eq!(word::subtract(5, 5, &mut flags), Some(0));
        test_flags(&flags, true, false);
    }

    #[test]
    fn compare_does_not_write_back() {
        let mut flags = Flags::empty();
        assert_eq!(word::compare(3, 3, &mut flags), None);
        test_flags(&flags, true, false);

        assert_eq!(word::compare(1, 2, &mut flags), None);
        test_flags(&flags, false, true);
    }

    #[test]
    fn byte_flags_use_bit_7() {
        let mut flags = Flags::empty();
        assert_eq!(byte::add(0x7F, 1, &mut flags), Some(0x80));
        test_flags(&flags, false, true);

        assert_eq!(byte::add(0xFF, 1, &mut flags), Some(0));
        test_flags(&flags, true, false);

        assert_eq!(byte::subtract(0, 1, &mut flags), Some(0xFF));
        test_flags(&flags, false, true);
    }

    #[test]
    fn results_match_wrapping_arithmetic() {
        let mut flags = Flags::empty();
        for left in 0..=u8::MAX {
            for right in 0..=u8::MAX {
                let sum = byte::add(left, right, &mut flags);
                assert_eq!(sum, Some(left.wrapping_add(right)));
                assert_eq!(flags.contains(Flags::ZERO), sum == Some(0));

                let difference = byte::subtract(left, right, &mut flags);
                assert_eq!(difference, Some(left.wrapping_sub(right)));
                assert_eq!(flags.contains(Flags::SIGN), left.wrapping_sub(right) >= 0x80);
            }
        }
    }
}
