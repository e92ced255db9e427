//! Parity unit.
//!
//! Folds the low bits of a word into a single even-parity bit. The SECDED
//! encoder uses it once over the data + check-bit field (bits 0..=20) and
//! places the result at bit 21; the decoder recomputes it over the stored
//! codeword and compares against the stored bit.

use bitvec::prelude::*;

/// Returns the XOR of bits `0..bit_count` of `word`, unshifted (0 or 1).
///
/// `bit_count` is clamped to the width of the word.
pub fn fold_parity(word: u32, bit_count: usize) -> u32 {
    let bits = word.view_bits::<Lsb0>();
    let end = bit_count.min(bits.len());
    (bits[..end].count_ones() & 1) as u32
}

/// Computes the parity of bits `0..bit_count` of `word` and returns it
/// already shifted into position `bit_count`, directly above the summed
/// range.
///
/// # Examples
///
/// ```rust
/// use secded::ecc::parity::compute_parity;
///
/// // three ones below bit 21 -> odd -> parity bit set at 21
/// assert_eq!(compute_parity(0b111, 21), 1 << 21);
/// assert_eq!(compute_parity(0b11, 21), 0);
/// ```
pub fn compute_parity(word: u32, bit_count: usize) -> u32 {
    // The slot above the range has to exist in a u32
    let bit_count = bit_count.min(u32::BITS as usize - 1);
    fold_parity(word, bit_count) << bit_count
}
