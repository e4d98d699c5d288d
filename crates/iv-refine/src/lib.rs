//! Precision refinement of approximate I-V curves.
//!
//! This crate takes a curve produced in limited precision, checks every point
//! against the single-diode equation in arbitrary precision, recomputes the
//! current of any point that misses the tolerance with the closed-form
//! inverter, and pins the short-circuit and open-circuit ends exactly.

pub mod curve;
pub mod error;
pub mod refine;

pub use curve::{Curve, CurvePoint};
pub use error::{RefineError, RefineResult};
pub use refine::{Refinement, refine};
