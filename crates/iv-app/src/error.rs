//! Error types for the iv-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Test set error: {0}")]
    Source(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Refinement error: {0}")]
    Refine(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("{curve} failed: {message}")]
    CaseFailed { curve: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for iv-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<iv_core::IvError> for AppError {
    fn from(err: iv_core::IvError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<iv_model::ModelError> for AppError {
    fn from(err: iv_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<iv_refine::RefineError> for AppError {
    fn from(err: iv_refine::RefineError) -> Self {
        AppError::Refine(err.to_string())
    }
}

impl From<iv_source::SourceError> for AppError {
    fn from(err: iv_source::SourceError) -> Self {
        AppError::Source(err.to_string())
    }
}

impl From<iv_results::ResultsError> for AppError {
    fn from(err: iv_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
