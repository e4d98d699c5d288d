//! iv-core: stable foundation for ivprecise.
//!
//! Contains:
//! - precision (arbitrary-precision `Real` + explicit arithmetic context)
//! - constants (physical and algorithm constants record)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod precision;

// Re-exports: nice ergonomics for downstream crates
pub use constants::*;
pub use error::{IvError, IvResult};
pub use precision::*;
