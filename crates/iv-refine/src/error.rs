//! Error types for refinement.

use iv_core::IvError;
use iv_model::ModelError;
use thiserror::Error;

/// Errors that end refinement of a curve.
///
/// None of these are retried: the inputs are deterministic, so a second
/// attempt would fail the same way.
#[derive(Error, Debug)]
pub enum RefineError {
    #[error(
        "Precision failure at index {index}: closed-form current {current} at voltage {voltage} \
         leaves residual {residual} (atol {atol})"
    )]
    PrecisionFailure {
        index: usize,
        voltage: String,
        current: String,
        residual: String,
        atol: String,
    },

    #[error("Boundary violated: {what} must be exactly 0, got {value}")]
    BoundaryViolation { what: &'static str, value: String },

    #[error("Invalid curve: {what}")]
    InvalidCurve { what: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Core error: {0}")]
    Core(#[from] IvError),
}

pub type RefineResult<T> = Result<T, RefineError>;
