//! Raw memory abstraction and the SECDED front end built on it.
//!
//! The codec never talks to storage directly. It consumes a [`RawMemory`]
//! that persists wide physical words and may flip bits between a store and
//! the next load. Two deterministic implementations are provided for tests
//! and simulation:
//! - [`SparseMemory`]: a map from address to word, with explicit bit-flip
//!   injection
//! - [`FaultyMemory`]: wraps another memory and flips up to two bits per
//!   load with configurable, seeded probabilities
//!
//! # Examples
//!
//! ```rust
//! use secded::memory::{SecdedMemory, SparseMemory};
//!
//! let mut memory = SecdedMemory::new(SparseMemory::new());
//! memory.store(0x40, 0xBEEF);
//! memory.raw_mut().flip_bits(0x40, 1 << 5);
//! assert_eq!(memory.load(0x40), Ok(0xBEEF));
//! assert_eq!(memory.counters().corrected, 1);
//! ```

pub mod faulty;
pub mod secded_memory;
pub mod sparse;

pub use faulty::{FaultConfig, FaultStats, FaultyMemory};
pub use secded_memory::{ErrorCounters, SecdedMemory};
pub use sparse::SparseMemory;

/// Number of meaningful low bits in a raw word.
pub const RAW_WORD_BITS: u32 = 22;

/// Mask of the meaningful low bits in a raw word.
pub const RAW_WORD_MASK: u32 = (1 << RAW_WORD_BITS) - 1;

/// Word-addressed physical memory that may corrupt stored bits.
///
/// `store` persists the low [`RAW_WORD_BITS`] of `value`. `load` returns the
/// word last stored at `address`, possibly with some of those bits
/// inverted. Each call is atomic; a `load` after a `store` to the same
/// address observes that store.
pub trait RawMemory {
    /// Reads the physical word at `address`.
    fn load(&mut self, address: u32) -> u32;

    /// Writes the physical word at `address`.
    fn store(&mut self, address: u32, value: u32);
}

impl<M: RawMemory + ?Sized> RawMemory for &mut M {
    fn load(&mut self, address: u32) -> u32 {
        (**self).load(address)
    }

    fn store(&mut self, address: u32, value: u32) {
        (**self).store(address, value)
    }
}

impl<M: RawMemory + ?Sized> RawMemory for Box<M> {
    fn load(&mut self, address: u32) -> u32 {
        (**self).load(address)
    }

    fn store(&mut self, address: u32, value: u32) {
        (**self).store(address, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_word_mask() {
        assert_eq!(RAW_WORD_MASK, 0x003F_FFFF);
        assert_eq!(RAW_WORD_MASK, crate::ecc::Codeword::MASK);
    }

    #[test]
    fn test_forwarding_impls() {
        let mut memory = SparseMemory::new();
        {
            let mut borrowed = &mut memory;
            RawMemory::store(&mut borrowed, 7, 0x1234);
            assert_eq!(RawMemory::load(&mut borrowed, 7), 0x1234);
        }

        let mut boxed: Box<dyn RawMemory> = Box::new(memory);
        boxed.store(8, 0x55);
        assert_eq!(boxed.load(8), 0x55);
        assert_eq!(boxed.load(7), 0x1234);
    }
}
