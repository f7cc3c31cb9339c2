//! Request handlers.

pub mod file;
pub mod health;
pub mod prediction;

pub use file::*;
pub use health::*;
pub use prediction::*;
