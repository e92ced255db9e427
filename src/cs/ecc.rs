//! SECDED error correction for 16-bit memory words.
//!
//! This module provides the codec used by [`crate::memory::SecdedMemory`]:
//! - Parity unit (overall parity over a bit range)
//! - Check-bit unit (5 Hamming check bits from fixed covering sets)
//! - Encoder and decoder for the 22-bit codeword
//! - Exhaustive verification of the code's properties
//!
//! # Error Correction
//!
//! A Hamming code extended with one overall parity bit corrects any single
//! flipped bit and detects any two flipped bits (SECDED). Sixteen data bits
//! need five check bits, so each word is stored as 22 bits.
//!
//! # Examples
//!
//! ```rust
//! use secded::ecc::{decode_word, encode};
//!
//! let stored = encode(0x1234).raw() ^ (1 << 9);
//! assert_eq!(decode_word(stored), (0x1234, true));
//! ```

pub mod check_bits;
pub mod parity;
pub mod secded;
pub mod verify;

pub use check_bits::{compute_check_bits, CheckBits, COVERING_MASKS, SYNDROME_TABLE};
pub use parity::compute_parity;
pub use secded::{classify, decode, decode_word, encode, Codeword, DecodeOutcome, ErrorLocation};
pub use verify::{verify_exhaustive, verify_range, VerificationFailure, VerificationReport};
