//! Fault-injecting raw memory.
//!
//! Wraps another [`RawMemory`] and, on every load, flips zero, one or two
//! distinct bits among the low [`RAW_WORD_BITS`] of the returned word. The
//! stored word itself is left intact, so faults behave like read
//! disturbances. Persistent faults can be injected on the wrapped memory
//! instead (see [`crate::memory::SparseMemory::flip_bits`]).

use crate::cs::error::{Error, Result};
use crate::cs::memory::{RawMemory, RAW_WORD_BITS};
use log::trace;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fault injection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultConfig {
    /// Probability that a load returns a word with exactly one flipped bit.
    pub single_flip_probability: f64,
    /// Probability that a load returns a word with exactly two flipped bits.
    pub double_flip_probability: f64,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            single_flip_probability: 0.01,
            double_flip_probability: 0.001,
            seed: None,
        }
    }
}

impl FaultConfig {
    /// A configuration that never injects faults.
    pub fn none() -> Self {
        Self {
            single_flip_probability: 0.0,
            double_flip_probability: 0.0,
            seed: None,
        }
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that both probabilities lie in `[0, 1]` and their sum does not
    /// exceed 1.
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("single_flip_probability", self.single_flip_probability),
            ("double_flip_probability", self.double_flip_probability),
        ] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidInput(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }

        let total = self.single_flip_probability + self.double_flip_probability;
        if total > 1.0 {
            return Err(Error::InvalidInput(format!(
                "fault probabilities sum to {}, which exceeds 1",
                total
            )));
        }
        Ok(())
    }
}

/// Counts of operations and injected faults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultStats {
    pub loads: u64,
    pub stores: u64,
    pub single_flips: u64,
    pub double_flips: u64,
}

/// Raw memory that corrupts loaded words at random.
#[derive(Debug, Clone)]
pub struct FaultyMemory<M> {
    inner: M,
    config: FaultConfig,
    rng: ChaCha8Rng,
    stats: FaultStats,
}

impl<M: RawMemory> FaultyMemory<M> {
    /// Wraps `inner`, validating `config`.
    pub fn new(inner: M, config: FaultConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            inner,
            config,
            rng,
            stats: FaultStats::default(),
        })
    }

    pub fn config(&self) -> &FaultConfig {
        &self.config
    }

    pub fn stats(&self) -> FaultStats {
        self.stats
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }

    /// Draws the corruption mask for one load.
    fn draw_fault_mask(&mut self) -> u32 {
        let roll: f64 = self.rng.gen();
        if roll < self.config.double_flip_probability {
            self.stats.double_flips += 1;
            sample(&mut self.rng, RAW_WORD_BITS as usize, 2)
                .iter()
                .fold(0, |mask, bit| mask | (1 << bit))
        } else if roll < self.config.double_flip_probability + self.config.single_flip_probability
        {
            self.stats.single_flips += 1;
            1 << self.rng.gen_range(0..RAW_WORD_BITS)
        } else {
            0
        }
    }
}

impl<M: RawMemory> RawMemory for FaultyMemory<M> {
    fn load(&mut self, address: u32) -> u32 {
        self.stats.loads += 1;
        let value = self.inner.load(address);
        let mask = self.draw_fault_mask();
        if mask != 0 {
            trace!("injecting fault mask {:#08x} at address {:#x}", mask, address);
        }
        value ^ mask
    }

    fn store(&mut self, address: u32, value: u32) {
        self.stats.stores += 1;
        self.inner.store(address, value);
    }
}
