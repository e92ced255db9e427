//! SECDED(22,16) encoder and decoder.
//!
//! A 16-bit data word is stored as a 22-bit codeword:
//!
//! ```text
//!  21 | 20 .. 16          | 15 .. 0
//!   P | cb16 cb8 cb4 cb2 cb1 | data
//! ```
//!
//! `P` is the even parity of bits 0..=20. Bits above 21 are written as zero
//! and ignored on read.
//!
//! On decode the overall parity tells odd-weight corruption (one flip) from
//! even-weight corruption (zero or two flips), and the 5-bit syndrome locates
//! the flipped bit. Only a flipped data bit needs an observable fix; a flip
//! confined to the check bits or the parity bit leaves the data intact.
//!
//! # Examples
//!
//! ```rust
//! use secded::ecc::secded::{decode, encode, DecodeOutcome};
//!
//! let codeword = encode(0xBEEF);
//! assert_eq!(decode(codeword), DecodeOutcome::Unchanged(0xBEEF));
//!
//! // a single flipped data bit is repaired
//! let damaged = codeword.with_flipped_bits(1 << 4);
//! assert_eq!(decode(damaged).data(), Some(0xBEEF));
//!
//! // two flipped bits are detected
//! let damaged = codeword.with_flipped_bits((1 << 4) | (1 << 18));
//! assert!(!decode(damaged).is_ok());
//! ```

use crate::cs::ecc::check_bits::{
    compute_check_bits, data_bit_for_syndrome, is_redundancy_syndrome, CheckBits,
};
use crate::cs::ecc::parity::compute_parity;
use log::warn;
use std::fmt::{Display, Formatter};

/// A 22-bit SECDED codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Codeword(u32);

impl Codeword {
    /// Width of a codeword in bits.
    pub const BITS: u32 = 22;
    /// Mask of the meaningful low bits of a raw word.
    pub const MASK: u32 = (1 << Self::BITS) - 1;
    /// Position of the lowest check bit (cb1).
    pub const CHECK_SHIFT: u32 = 16;
    /// Position of the overall parity bit.
    pub const PARITY_BIT: u32 = 21;
    /// Number of bits covered by the overall parity.
    pub const PARITY_SPAN: usize = Self::PARITY_BIT as usize;

    /// Reinterprets a raw physical word, ignoring bits 22 and above.
    pub fn from_raw(raw: u32) -> Self {
        Codeword(raw & Self::MASK)
    }

    /// The 22-bit value as stored.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Data field, bits 0..=15.
    pub fn data(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Stored check bits, bits 16..=20.
    pub fn check_bits(self) -> CheckBits {
        CheckBits::from_raw((self.0 >> Self::CHECK_SHIFT) as u8)
    }

    /// Stored parity bit (0 or 1).
    pub fn parity(self) -> u32 {
        (self.0 >> Self::PARITY_BIT) & 1
    }

    /// Returns a copy with every bit set in `mask` inverted. Bits outside
    /// the codeword are dropped.
    pub fn with_flipped_bits(self, mask: u32) -> Self {
        Codeword::from_raw(self.0 ^ mask)
    }
}

impl From<Codeword> for u32 {
    fn from(codeword: Codeword) -> Self {
        codeword.0
    }
}

impl Display for Codeword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

/// Where a corrected single-bit error was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorLocation {
    /// Data bit at this index (0..=15) was flipped and has been restored.
    Data(u8),
    /// A check bit or the parity bit was flipped; the data was unaffected.
    Redundancy,
}

/// Result of decoding one codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeOutcome {
    /// No error detected.
    Unchanged(u16),
    /// A single-bit error was found and the data is correct.
    Corrected { data: u16, location: ErrorLocation },
    /// A double-bit error was detected. The data is lost.
    Uncorrectable { syndrome: u8 },
}

impl DecodeOutcome {
    /// The recovered data word, unless the error was uncorrectable.
    pub fn data(&self) -> Option<u16> {
        match *self {
            DecodeOutcome::Unchanged(data) | DecodeOutcome::Corrected { data, .. } => Some(data),
            DecodeOutcome::Uncorrectable { .. } => None,
        }
    }

    /// `true` unless the error was uncorrectable.
    pub fn is_ok(&self) -> bool {
        !matches!(self, DecodeOutcome::Uncorrectable { .. })
    }

    /// `true` if a single-bit error was repaired.
    pub fn is_corrected(&self) -> bool {
        matches!(self, DecodeOutcome::Corrected { .. })
    }
}

/// Encodes a data word into a codeword.
pub fn encode(data: u16) -> Codeword {
    let check_bits = u32::from(compute_check_bits(data));
    let partial = (check_bits << Codeword::CHECK_SHIFT) | u32::from(data);
    let parity = compute_parity(partial, Codeword::PARITY_SPAN);
    Codeword(partial | parity)
}

/// Decodes a codeword, correcting one flipped bit and detecting two.
pub fn decode(codeword: Codeword) -> DecodeOutcome {
    let recomputed_parity = compute_parity(codeword.raw(), Codeword::PARITY_SPAN)
        >> Codeword::PARITY_BIT;
    let parity_mismatch = recomputed_parity != codeword.parity();

    let syndrome = codeword
        .check_bits()
        .syndrome(compute_check_bits(codeword.data()));

    classify(parity_mismatch, syndrome, codeword.data())
}

/// Decodes a raw physical word with the boolean contract of the load path:
/// the data word and whether it can be trusted. On `false` the returned
/// data is the uncorrected stored field and must not be used.
pub fn decode_word(raw: u32) -> (u16, bool) {
    let codeword = Codeword::from_raw(raw);
    match decode(codeword).data() {
        Some(data) => (data, true),
        None => (codeword.data(), false),
    }
}

/// Classifies a decode from the parity comparison and the syndrome.
///
/// | parity | syndrome            | outcome |
/// |--------|---------------------|---------|
/// | differ | in syndrome table   | data bit flipped, corrected |
/// | differ | anything else       | redundancy bit flipped, data as stored |
/// | agree  | non-zero            | two bits flipped, uncorrectable |
/// | agree  | zero                | clean |
pub fn classify(parity_mismatch: bool, syndrome: u8, stored: u16) -> DecodeOutcome {
    match (parity_mismatch, syndrome) {
        (true, _) => match data_bit_for_syndrome(syndrome) {
            Some(bit) => DecodeOutcome::Corrected {
                data: stored ^ (1 << bit),
                location: ErrorLocation::Data(bit as u8),
            },
            None => {
                if !is_redundancy_syndrome(syndrome) {
                    // Only reachable with three or more flips
                    warn!(
                        "odd-weight error with unmapped syndrome {:#07b}; keeping stored data",
                        syndrome
                    );
                }
                DecodeOutcome::Corrected {
                    data: stored,
                    location: ErrorLocation::Redundancy,
                }
            }
        },
        (false, 0) => DecodeOutcome::Unchanged(stored),
        (false, _) => DecodeOutcome::Uncorrectable { syndrome },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_word() {
        let codeword = encode(0x0000);
        assert_eq!(codeword.raw(), 0x000000);
        assert_eq!(codeword.check_bits().value(), 0);
        assert_eq!(codeword.parity(), 0);
        assert_eq!(decode(codeword), DecodeOutcome::Unchanged(0x0000));
        assert_eq!(decode_word(codeword.raw()), (0x0000, true));
    }

    #[test]
    fn test_layout() {
        let codeword = encode(0x0001);
        // data bit 0 -> cb2, cb1; three ones below bit 21 -> parity set
        assert_eq!(codeword.data(), 0x0001);
        assert_eq!(codeword.check_bits().value(), 0b00011);
        assert_eq!(codeword.parity(), 1);
        assert_eq!(codeword.raw(), (1 << 21) | (0b00011 << 16) | 1);

        let codeword = encode(0xFFFF);
        assert_eq!(codeword.check_bits().value(), 0b11110);
        // 16 + 4 ones -> even
        assert_eq!(codeword.parity(), 0);
    }

    #[test]
    fn test_codeword_has_even_weight() {
        for data in [0x0000u16, 0x0001, 0x1234, 0x8000, 0xA5A5, 0xFFFF] {
            let codeword = encode(data);
            assert_eq!(codeword.raw().count_ones() % 2, 0, "data {data:#06x}");
            assert_eq!(codeword.raw() & !Codeword::MASK, 0);
        }
    }

    #[test]
    fn test_all_ones_with_bit_3_flipped() {
        let damaged = encode(0xFFFF).with_flipped_bits(1 << 3);
        assert_eq!(
            decode(damaged),
            DecodeOutcome::Corrected {
                data: 0xFFFF,
                location: ErrorLocation::Data(3),
            }
        );
        assert_eq!(decode_word(damaged.raw()), (0xFFFF, true));
    }

    #[test]
    fn test_double_flip_in_data_and_check_bits() {
        let damaged = encode(0x1234).with_flipped_bits((1 << 2) | (1 << 17));
        let outcome = decode(damaged);
        assert!(!outcome.is_ok());
        assert_eq!(outcome.data(), None);
        assert!(!decode_word(damaged.raw()).1);
    }

    #[test]
    fn test_every_single_data_flip_is_corrected() {
        for data in [0x0000u16, 0x1234, 0xFFFF, 0x0F0F] {
            for bit in 0..16 {
                let damaged = encode(data).with_flipped_bits(1 << bit);
                assert_eq!(
                    decode(damaged),
                    DecodeOutcome::Corrected {
                        data,
                        location: ErrorLocation::Data(bit as u8),
                    },
                    "data {data:#06x} bit {bit}"
                );
            }
        }
    }

    #[test]
    fn test_redundancy_flip_keeps_data() {
        for data in [0x0000u16, 0x1234, 0xFFFF] {
            for bit in 16..22 {
                let damaged = encode(data).with_flipped_bits(1 << bit);
                assert_eq!(
                    decode(damaged),
                    DecodeOutcome::Corrected {
                        data,
                        location: ErrorLocation::Redundancy,
                    },
                    "data {data:#06x} bit {bit}"
                );
            }
        }
    }

    #[test]
    fn test_every_double_flip_is_detected() {
        for data in [0x0000u16, 0x1234, 0xFFFF] {
            for i in 0..22 {
                for j in (i + 1)..22 {
                    let damaged = encode(data).with_flipped_bits((1 << i) | (1 << j));
                    assert!(
                        !decode(damaged).is_ok(),
                        "data {data:#06x} bits {i},{j}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_high_bits_are_ignored() {
        let raw = encode(0xCAFE).raw() | 0xFFC0_0000;
        assert_eq!(decode_word(raw), (0xCAFE, true));
        assert_eq!(Codeword::from_raw(raw), encode(0xCAFE));
        // bit 22 leaking in must not disturb the check-bit field
        let raw = encode(0x0001).raw() | (1 << 22);
        assert_eq!(decode_word(raw), (0x0001, true));
    }

    #[test]
    fn test_classify_table() {
        assert_eq!(classify(false, 0, 0x00AA), DecodeOutcome::Unchanged(0x00AA));
        assert_eq!(
            classify(false, 5, 0x00AA),
            DecodeOutcome::Uncorrectable { syndrome: 5 }
        );
        assert_eq!(
            classify(true, 3, 0x00AA),
            DecodeOutcome::Corrected {
                data: 0x00AB,
                location: ErrorLocation::Data(0),
            }
        );
        for syndrome in [0u8, 1, 2, 4, 8, 16] {
            assert_eq!(
                classify(true, syndrome, 0x00AA),
                DecodeOutcome::Corrected {
                    data: 0x00AA,
                    location: ErrorLocation::Redundancy,
                }
            );
        }
    }

    #[test]
    fn test_unmapped_odd_syndrome_is_lenient() {
        // 3-bit corruption can land on a syndrome outside every table; the
        // stored data is returned rather than rejected
        let outcome = classify(true, 25, 0x1234);
        assert!(outcome.is_ok());
        assert_eq!(outcome.data(), Some(0x1234));
    }

    #[test]
    fn test_codeword_display() {
        assert_eq!(encode(0x0000).to_string(), "0x000000");
        assert_eq!(Codeword::from_raw(0x3F_FFFF).to_string(), "0x3fffff");
    }
}
