//! Error types for model evaluation.

use iv_core::IvError;
use thiserror::Error;

/// Errors raised while building or evaluating the diode model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Precision failure: {what} leaves residual {residual} (atol {atol})")]
    PrecisionFailure {
        what: String,
        residual: String,
        atol: String,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Core error: {0}")]
    Core(#[from] IvError),
}

pub type ModelResult<T> = Result<T, ModelError>;
