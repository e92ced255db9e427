//! Error types shared by the codec and the memory front end.

use thiserror::Error;

/// Errors raised by SECDED memory operations.
///
/// The codec functions themselves are total; errors only surface where a
/// decoded word is handed back to a caller or where a configuration is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two bits of the codeword at `address` were flipped. The data is lost.
    #[error("uncorrectable error at address {address:#x} (syndrome {syndrome:#07b})")]
    Uncorrectable { address: u32, syndrome: u8 },

    /// Rejected parameters, e.g. a fault probability outside `[0, 1]`.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
