//! Check-bit unit.
//!
//! Computes the five Hamming check bits `{cb16, cb8, cb4, cb2, cb1}` of a
//! 16-bit data word. Each check bit is the XOR parity over a fixed covering
//! set of data bits. The covering sets are the rows of the parity-check
//! matrix; its columns are the syndromes in [`SYNDROME_TABLE`]:
//!
//! | check | covers data bit indices |
//! |-------|-------------------------|
//! | cb16  | 11, 12, 13, 14, 15 |
//! | cb8   | 4, 5, 6, 7, 8, 9, 10 |
//! | cb4   | 1, 2, 3, 7, 8, 9, 10, 14, 15 |
//! | cb2   | 0, 2, 3, 5, 6, 9, 10, 12, 13 |
//! | cb1   | 0, 1, 3, 4, 6, 8, 10, 11, 13, 15 |
//!
//! The masks are generated from the syndrome table at compile time, so a
//! single flipped data bit `d` always yields syndrome `SYNDROME_TABLE[d]`.

use std::fmt::{Display, Formatter};

/// Number of Hamming check bits.
pub const CHECK_BIT_COUNT: usize = 5;

/// Mask of a packed [`CheckBits`] value.
pub const CHECK_BITS_MASK: u8 = (1 << CHECK_BIT_COUNT) - 1;

/// Syndrome produced by a flip of data bit `i`, indexed by `i`.
///
/// Each entry is also the column of the parity-check matrix for that bit.
/// The 16 values are distinct and none is zero or a power of two: those
/// syndromes are reserved for "no error" and single check-bit flips.
pub const SYNDROME_TABLE: [u8; 16] = [
    3, 5, 6, 7, 9, 10, 11, 12, 13, 14, 15, 17, 18, 19, 20, 21,
];

/// Covering set of each check bit as a data-word mask, indexed by check-bit
/// position (`0` = cb1 .. `4` = cb16).
pub const COVERING_MASKS: [u16; CHECK_BIT_COUNT] = generate_covering_masks();

const fn generate_covering_masks() -> [u16; CHECK_BIT_COUNT] {
    let mut masks = [0u16; CHECK_BIT_COUNT];
    let mut data_bit = 0;
    while data_bit < SYNDROME_TABLE.len() {
        let column = SYNDROME_TABLE[data_bit];
        let mut check = 0;
        while check < CHECK_BIT_COUNT {
            if column & (1 << check) != 0 {
                masks[check] |= 1 << data_bit;
            }
            check += 1;
        }
        data_bit += 1;
    }
    masks
}

/// Packed check bits, bit 4..0 = `{cb16, cb8, cb4, cb2, cb1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CheckBits(u8);

impl CheckBits {
    /// Wraps a raw value, discarding anything above the five check bits.
    pub fn from_raw(raw: u8) -> Self {
        CheckBits(raw & CHECK_BITS_MASK)
    }

    /// The packed 5-bit value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns check bit `cb(2^position)`, i.e. `position` 0 is cb1.
    pub fn bit(self, position: usize) -> bool {
        position < CHECK_BIT_COUNT && (self.0 >> position) & 1 == 1
    }

    /// XOR of two check-bit vectors. Zero when they agree.
    pub fn syndrome(self, other: CheckBits) -> u8 {
        self.0 ^ other.0
    }
}

impl From<CheckBits> for u32 {
    fn from(bits: CheckBits) -> Self {
        u32::from(bits.0)
    }
}

impl Display for CheckBits {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:05b}", self.0)
    }
}

/// Computes the five check bits of `data`.
///
/// # Examples
///
/// ```rust
/// use secded::ecc::check_bits::compute_check_bits;
///
/// assert_eq!(compute_check_bits(0x0000).value(), 0);
/// // data bit 0 is covered by cb2 and cb1
/// assert_eq!(compute_check_bits(0x0001).value(), 0b00011);
/// ```
pub fn compute_check_bits(data: u16) -> CheckBits {
    let packed = COVERING_MASKS
        .iter()
        .enumerate()
        .fold(0u8, |acc, (position, &mask)| {
            let bit = ((data & mask).count_ones() & 1) as u8;
            acc | (bit << position)
        });
    CheckBits(packed)
}

/// Maps a syndrome to the data bit it implicates, if any.
pub fn data_bit_for_syndrome(syndrome: u8) -> Option<usize> {
    SYNDROME_TABLE.iter().position(|&entry| entry == syndrome)
}

/// True for syndromes explained by a flip confined to the redundancy bits:
/// `0` (parity bit only) or a single power of two (one check bit).
pub fn is_redundancy_syndrome(syndrome: u8) -> bool {
    syndrome == 0 || (syndrome <= CHECK_BITS_MASK && syndrome.is_power_of_two())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(mask: u16) -> Vec<usize> {
        (0..16).filter(|&bit| mask & (1 << bit) != 0).collect()
    }

    #[test]
    fn test_covering_sets() {
        assert_eq!(covered(COVERING_MASKS[4]), vec![11, 12, 13, 14, 15]);
        assert_eq!(covered(COVERING_MASKS[3]), vec![4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(
            covered(COVERING_MASKS[2]),
            vec![1, 2, 3, 7, 8, 9, 10, 14, 15]
        );
        assert_eq!(
            covered(COVERING_MASKS[1]),
            vec![0, 2, 3, 5, 6, 9, 10, 12, 13]
        );
        assert_eq!(
            covered(COVERING_MASKS[0]),
            vec![0, 1, 3, 4, 6, 8, 10, 11, 13, 15]
        );
    }

    #[test]
    fn test_including_bit_7_in_cb1_would_alias_bits_7_and_8() {
        // With bit 7 in cb1, bits 7 and 8 share a column and cannot be told apart
        let column = |mask_cb1: u16, bit: usize| -> u8 {
            let mut masks = COVERING_MASKS;
            masks[0] = mask_cb1;
            masks
                .iter()
                .enumerate()
                .fold(0, |acc, (pos, &m)| acc | ((((m >> bit) & 1) as u8) << pos))
        };
        let aliased = COVERING_MASKS[0] | (1 << 7);
        assert_eq!(column(aliased, 7), column(aliased, 8));
        assert_ne!(column(COVERING_MASKS[0], 7), column(COVERING_MASKS[0], 8));
    }

    #[test]
    fn test_single_data_bit_yields_table_syndrome() {
        for (bit, &expected) in SYNDROME_TABLE.iter().enumerate() {
            let data = 1u16 << bit;
            let syndrome = compute_check_bits(data).syndrome(compute_check_bits(0));
            assert_eq!(syndrome, expected, "data bit {bit}");
        }
    }

    #[test]
    fn test_syndrome_table_is_bijective_and_disjoint() {
        let mut seen = [false; 32];
        for &syndrome in SYNDROME_TABLE.iter() {
            assert!(!seen[syndrome as usize], "duplicate syndrome {syndrome}");
            seen[syndrome as usize] = true;
            assert!(!is_redundancy_syndrome(syndrome));
            assert!(syndrome < 22);
        }
        for reserved in [0u8, 1, 2, 4, 8, 16] {
            assert!(data_bit_for_syndrome(reserved).is_none());
            assert!(is_redundancy_syndrome(reserved));
        }
    }

    #[test]
    fn test_data_bit_lookup() {
        assert_eq!(data_bit_for_syndrome(3), Some(0));
        assert_eq!(data_bit_for_syndrome(12), Some(7));
        assert_eq!(data_bit_for_syndrome(13), Some(8));
        assert_eq!(data_bit_for_syndrome(21), Some(15));
        assert_eq!(data_bit_for_syndrome(22), None);
        assert_eq!(data_bit_for_syndrome(31), None);
    }

    #[test]
    fn test_check_bits_all_ones() {
        // cb16: 5 ones, cb8: 7, cb4: 9, cb2: 9, cb1: 10 -> 1,1,1,1,0
        assert_eq!(compute_check_bits(0xFFFF).value(), 0b11110);
    }

    #[test]
    fn test_check_bits_accessors() {
        let bits = CheckBits::from_raw(0b1110_0101);
        assert_eq!(bits.value(), 0b00101);
        assert!(bits.bit(0));
        assert!(!bits.bit(1));
        assert!(bits.bit(2));
        assert!(!bits.bit(5));
        assert_eq!(bits.to_string(), "00101");
        assert_eq!(u32::from(bits), 5);
    }
}
