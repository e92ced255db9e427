pub mod cs;

pub use cs::{ecc, memory};
pub use cs::error::{Error, Result};
