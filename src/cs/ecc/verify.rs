//! Exhaustive self-test of the SECDED code.
//!
//! The data space is only 2^16 words, so every property of the code can be
//! checked directly: round trip, correction of each of the 22 single-bit
//! flips and detection of each of the 231 double-bit flips, for every word.
//! Words are checked in parallel with rayon.

use crate::cs::ecc::check_bits::{
    compute_check_bits, data_bit_for_syndrome, is_redundancy_syndrome, SYNDROME_TABLE,
};
use crate::cs::ecc::secded::{decode, encode, Codeword, DecodeOutcome};
use log::debug;
use rayon::prelude::*;
use std::ops::RangeInclusive;

/// Upper bound on the failures kept in a report; the rest are only counted.
pub const MAX_REPORTED_FAILURES: usize = 16;

/// A property violation found by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFailure {
    /// An undamaged codeword did not decode to its data word.
    RoundTrip { data: u16, outcome: DecodeOutcome },
    /// A single flipped bit was not repaired.
    SingleFlip {
        data: u16,
        bit: u32,
        outcome: DecodeOutcome,
    },
    /// Two flipped bits were not reported as uncorrectable.
    DoubleFlip {
        data: u16,
        bits: (u32, u32),
        outcome: DecodeOutcome,
    },
    /// A data bit's syndrome is missing, duplicated or reserved.
    SyndromeTable { data_bit: usize, syndrome: u8 },
}

impl VerificationFailure {
    /// The data word the failure was observed on, if any.
    pub fn data(&self) -> Option<u16> {
        match *self {
            VerificationFailure::RoundTrip { data, .. }
            | VerificationFailure::SingleFlip { data, .. }
            | VerificationFailure::DoubleFlip { data, .. } => Some(data),
            VerificationFailure::SyndromeTable { .. } => None,
        }
    }
}

/// Summary of a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Data words checked
    pub words_checked: u64,
    /// Single-bit corruptions decoded
    pub single_flips_checked: u64,
    /// Double-bit corruptions decoded
    pub double_flips_checked: u64,
    /// Total failures found
    pub failure_count: u64,
    /// The first failures found, at most [`MAX_REPORTED_FAILURES`]
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// True when no property was violated.
    pub fn is_sound(&self) -> bool {
        self.failure_count == 0
    }

    fn record(&mut self, failure: VerificationFailure) {
        self.failure_count += 1;
        if self.failures.len() < MAX_REPORTED_FAILURES {
            self.failures.push(failure);
        }
    }

    fn merge(mut self, other: VerificationReport) -> VerificationReport {
        self.words_checked += other.words_checked;
        self.single_flips_checked += other.single_flips_checked;
        self.double_flips_checked += other.double_flips_checked;
        self.failure_count += other.failure_count;
        self.failures.extend(other.failures);
        // Keep the lowest data words so the report does not depend on scheduling
        self.failures.sort_by_key(|failure| failure.data());
        self.failures.truncate(MAX_REPORTED_FAILURES);
        self
    }
}

/// Checks that every data bit has a distinct syndrome outside the reserved
/// redundancy syndromes, and that the check-bit unit produces it.
pub fn verify_syndrome_table() -> Vec<VerificationFailure> {
    SYNDROME_TABLE
        .iter()
        .enumerate()
        .filter_map(|(data_bit, &expected)| {
            // Check bits of a one-hot word are that bit's column
            let syndrome = compute_check_bits(1 << data_bit).value();
            let sound = syndrome == expected
                && !is_redundancy_syndrome(syndrome)
                && data_bit_for_syndrome(syndrome) == Some(data_bit);
            (!sound).then_some(VerificationFailure::SyndromeTable { data_bit, syndrome })
        })
        .collect()
}

fn check_word(data: u16) -> VerificationReport {
    let mut report = VerificationReport {
        words_checked: 1,
        ..Default::default()
    };
    let codeword = encode(data);

    let outcome = decode(codeword);
    if outcome != DecodeOutcome::Unchanged(data) {
        report.record(VerificationFailure::RoundTrip { data, outcome });
    }

    for i in 0..Codeword::BITS {
        let outcome = decode(codeword.with_flipped_bits(1 << i));
        report.single_flips_checked += 1;
        if !outcome.is_corrected() || outcome.data() != Some(data) {
            report.record(VerificationFailure::SingleFlip {
                data,
                bit: i,
                outcome,
            });
        }

        for j in (i + 1)..Codeword::BITS {
            let outcome = decode(codeword.with_flipped_bits((1 << i) | (1 << j)));
            report.double_flips_checked += 1;
            if outcome.is_ok() {
                report.record(VerificationFailure::DoubleFlip {
                    data,
                    bits: (i, j),
                    outcome,
                });
            }
        }
    }

    report
}

/// Verifies the code over a range of data words.
pub fn verify_range(words: RangeInclusive<u16>) -> VerificationReport {
    let (start, end) = words.into_inner();
    let mut report = (u32::from(start)..=u32::from(end))
        .into_par_iter()
        .map(|word| check_word(word as u16))
        .reduce(VerificationReport::default, VerificationReport::merge);

    for failure in verify_syndrome_table() {
        report.record(failure);
    }

    debug!(
        "verified {} words ({} single, {} double flips): {} failures",
        report.words_checked,
        report.single_flips_checked,
        report.double_flips_checked,
        report.failure_count
    );
    report
}

/// Verifies the code over the whole 16-bit data space.
///
/// # Examples
///
/// ```rust,no_run
/// use secded::ecc::verify::verify_exhaustive;
///
/// assert!(verify_exhaustive().is_sound());
/// ```
pub fn verify_exhaustive() -> VerificationReport {
    verify_range(0..=u16::MAX)
}
