//! Sparse in-memory raw storage.

use crate::cs::memory::{RawMemory, RAW_WORD_MASK};
use std::collections::HashMap;

/// Raw memory backed by a hash map. Unwritten addresses read as zero.
///
/// Faults are injected explicitly with [`SparseMemory::flip_bits`], which
/// makes it a deterministic double for codec tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseMemory {
    words: HashMap<u32, u32>,
}

impl SparseMemory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored word without going through `load`.
    pub fn peek(&self, address: u32) -> u32 {
        self.words.get(&address).copied().unwrap_or(0)
    }

    /// Inverts the stored bits selected by `mask`. Bits above the raw word
    /// width are ignored.
    pub fn flip_bits(&mut self, address: u32, mask: u32) {
        *self.words.entry(address).or_insert(0) ^= mask & RAW_WORD_MASK;
    }

    /// Number of addresses that have been written.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl RawMemory for SparseMemory {
    fn load(&mut self, address: u32) -> u32 {
        self.peek(address)
    }

    fn store(&mut self, address: u32, value: u32) {
        self.words.insert(address, value & RAW_WORD_MASK);
    }
}
