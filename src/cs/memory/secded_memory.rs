//! SECDED-protected memory front end.
//!
//! [`SecdedMemory`] is what a client sees: it stores and loads 16-bit words
//! and keeps the redundancy in the underlying [`RawMemory`]. Every store
//! writes a freshly encoded codeword; every load decodes, corrects a single
//! flipped bit and fails on two.

use crate::cs::ecc::secded::{decode, encode, Codeword, DecodeOutcome, ErrorLocation};
use crate::cs::error::{Error, Result};
use crate::cs::memory::RawMemory;
use log::{debug, warn};

/// Running totals of decode outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorCounters {
    /// Loads with no detected error
    pub clean: u64,
    /// Loads where a single-bit error was corrected
    pub corrected: u64,
    /// Loads that found an uncorrectable error
    pub uncorrectable: u64,
}

impl ErrorCounters {
    /// Total number of decoded loads.
    pub fn total(&self) -> u64 {
        self.clean + self.corrected + self.uncorrectable
    }
}

/// 16-bit word memory protected by a SECDED(22,16) code.
#[derive(Debug, Clone)]
pub struct SecdedMemory<M> {
    raw: M,
    counters: ErrorCounters,
}

impl<M: RawMemory> SecdedMemory<M> {
    pub fn new(raw: M) -> Self {
        Self {
            raw,
            counters: ErrorCounters::default(),
        }
    }

    /// Encodes `data` and stores the codeword at `address`.
    pub fn store(&mut self, address: u32, data: u16) {
        let codeword = encode(data);
        self.raw.store(address, codeword.raw());
    }

    /// Loads and decodes the word at `address`.
    ///
    /// # Errors
    ///
    /// [`Error::Uncorrectable`] if two bits of the codeword were flipped.
    pub fn load(&mut self, address: u32) -> Result<u16> {
        match self.read(address) {
            DecodeOutcome::Unchanged(data) | DecodeOutcome::Corrected { data, .. } => Ok(data),
            DecodeOutcome::Uncorrectable { syndrome } => {
                Err(Error::Uncorrectable { address, syndrome })
            }
        }
    }

    /// Loads the word at `address` with a boolean status instead of a
    /// `Result`. When the status is `false` the word must be treated as lost.
    pub fn load_word(&mut self, address: u32) -> (u16, bool) {
        match self.load(address) {
            Ok(data) => (data, true),
            Err(_) => (0, false),
        }
    }

    /// Loads the word at `address` and, if a single-bit error was corrected,
    /// writes back a clean codeword so the error cannot accumulate.
    ///
    /// # Errors
    ///
    /// [`Error::Uncorrectable`] if two bits of the codeword were flipped; the
    /// stored word is left as found.
    pub fn scrub(&mut self, address: u32) -> Result<DecodeOutcome> {
        let outcome = self.read(address);
        match outcome {
            DecodeOutcome::Corrected { data, .. } => {
                debug!("scrubbing address {:#x}", address);
                self.store(address, data);
                Ok(outcome)
            }
            DecodeOutcome::Unchanged(_) => Ok(outcome),
            DecodeOutcome::Uncorrectable { syndrome } => {
                Err(Error::Uncorrectable { address, syndrome })
            }
        }
    }

    pub fn counters(&self) -> ErrorCounters {
        self.counters
    }

    pub fn reset_counters(&mut self) {
        self.counters = ErrorCounters::default();
    }

    pub fn raw(&self) -> &M {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut M {
        &mut self.raw
    }

    pub fn into_inner(self) -> M {
        self.raw
    }

    fn read(&mut self, address: u32) -> DecodeOutcome {
        let codeword = Codeword::from_raw(self.raw.load(address));
        let outcome = decode(codeword);
        match outcome {
            DecodeOutcome::Unchanged(_) => self.counters.clean += 1,
            DecodeOutcome::Corrected { location, .. } => {
                self.counters.corrected += 1;
                match location {
                    ErrorLocation::Data(bit) => {
                        debug!("corrected data bit {} at address {:#x}", bit, address)
                    }
                    ErrorLocation::Redundancy => {
                        debug!("corrected redundancy bit at address {:#x}", address)
                    }
                }
            }
            DecodeOutcome::Uncorrectable { syndrome } => {
                self.counters.uncorrectable += 1;
                warn!(
                    "uncorrectable error at address {:#x}: codeword {}, syndrome {:#07b}",
                    address, codeword, syndrome
                );
            }
        }
        outcome
    }
}
