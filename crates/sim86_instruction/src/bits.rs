//! Bit extraction and numeric conversion helpers shared by the decoder and the tools.
//!
//! Bit indices count from the edge named by the function. `bits_from_left(byte, 2, 3)` takes the
//! three bits starting at the third most significant bit, which is the `reg` field of a
//! mod/reg/r_m byte.

/// Extract `count` bits from `byte`, starting `index` bits from the most significant bit.
#[inline]
pub fn bits_from_left(byte: u8, index: u32, count: u32) -> u8 {
    debug_assert!((1..=8).contains(&count), "must extract between 1 and 8 bits");
    debug_assert!(index + count <= 8);

    let shifted = (byte as u16) >> (8 - (index + count));
    (shifted & mask(count)) as u8
}

/// Extract `count` bits from `byte`, where `index` is the bit (counted from the least significant
/// bit) holding the most significant bit of the result.
#[inline]
pub fn bits_from_right(byte: u8, index: u32, count: u32) -> u8 {
    debug_assert!((1..=8).contains(&count), "must extract between 1 and 8 bits");
    debug_assert!(index < 8 && index + 1 >= count);

    let shifted = (byte as u16) >> (index + 1 - count);
    (shifted & mask(count)) as u8
}

#[inline]
pub fn is_bit_set_from_left(byte: u8, index: u32) -> bool {
    bits_from_left(byte, index, 1) == 1
}

#[inline]
pub fn is_bit_set_from_right(byte: u8, index: u32) -> bool {
    bits_from_right(byte, index, 1) == 1
}

#[inline]
fn mask(count: u32) -> u16 {
    (1_u16 << count) - 1
}

#[inline]
pub fn to_i8(value: u8) -> i8 {
    value as i8
}

#[inline]
pub fn to_i16(value: u16) -> i16 {
    value as i16
}

/// Widen a byte to a word by replicating its sign bit.
#[inline]
pub fn sign_extend(value: u8) -> u16 {
    value as i8 as i16 as u16
}

#[inline]
pub fn low_byte(value: u16) -> u8 {
    (value & 0xFF) as u8
}

#[inline]
pub fn high_byte(value: u16) -> u8 {
    (value >> 8) as u8
}

#[inline]
pub fn combine(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}

pub fn hex_u16(value: u16) -> String {
    format!("{:#06x}", value)
}

pub fn binary_u8(value: u8) -> String {
    format!("{:08b}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_reg_rm_fields() {
        let byte = 0b11_011_000;
        assert_eq!(bits_from_left(byte, 0, 2), 0b11);
        assert_eq!(bits_from_left(byte, 2, 3), 0b011);
        assert_eq!(bits_from_right(byte, 2, 3), 0b000);
    }

    #[test]
    fn opcode_prefixes() {
        assert_eq!(bits_from_left(0xB8, 0, 4), 0b1011);
        assert_eq!(bits_from_left(0x89, 0, 6), 0b100010);
        assert_eq!(bits_from_left(0xC7, 0, 7), 0b1100011);
        assert!(is_bit_set_from_right(0x89, 0));
        assert!(!is_bit_set_from_right(0x89, 1));
        assert!(is_bit_set_from_right(0xB8, 3));
        assert!(is_bit_set_from_left(0x80, 0));
    }

    #[test]
    fn nibbles_reconstruct_every_byte() {
        for byte in 0..=u8::MAX {
            let high = bits_from_left(byte, 0, 4);
            let low = bits_from_right(byte, 3, 4);
            assert_eq!((high << 4) | low, byte);
            assert_eq!(bits_from_left(byte, 4, 4), low);
            assert_eq!(bits_from_right(byte, 7, 4), high);
        }
    }

    #[test]
    fn full_width_extraction_is_identity() {
        for byte in 0..=u8::MAX {
            assert_eq!(bits_from_left(byte, 0, 8), byte);
            assert_eq!(bits_from_right(byte, 7, 8), byte);
        }
    }

    #[test]
    fn single_bits_match_mask() {
        for byte in 0..=u8::MAX {
            for index in 0..8 {
                assert_eq!(is_bit_set_from_right(byte, index), byte & (1 << index) != 0);
                assert_eq!(is_bit_set_from_left(byte, index), byte & (0x80 >> index) != 0);
            }
        }
    }

    #[test]
    fn split_and_combine_every_word() {
        for value in 0..=u16::MAX {
            assert_eq!(combine(low_byte(value), high_byte(value)), value);
        }
    }

    #[test]
    fn signed_conversion() {
        assert_eq!(to_i8(0x7F), 127);
        assert_eq!(to_i8(0x80), -128);
        assert_eq!(to_i8(0xFF), -1);
        assert_eq!(to_i16(0xFFFF), -1);
        assert_eq!(to_i16(0x8000), i16::MIN);
        assert_eq!(sign_extend(0xF4), 0xFFF4);
        assert_eq!(sign_extend(0x7F), 0x007F);
    }

    #[test]
    fn text_rendering() {
        assert_eq!(hex_u16(0x00AB), "0x00ab");
        assert_eq!(binary_u8(0b1000_1001), "10001001");
        assert_eq!(binary_u8(1), "00000001");
    }
}
