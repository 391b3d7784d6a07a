//! Configuration types
//!
//! Board-agnostic tuning constants for characterization and the host link.
//! Everything here is plain `const` data passed around by reference.

pub mod baud;
pub mod types;

pub use baud::*;
pub use types::*;
