pub mod ecc;
pub mod error;
pub mod memory;

// Re-export the codec and memory front end
pub use ecc::*;
pub use memory::*;
