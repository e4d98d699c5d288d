//! iv-results: canonical number formatting and test-set result storage.

pub mod format;
pub mod store;
pub mod types;

pub use format::{CanonicalFormatter, format_significant};
pub use store::ResultStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Test set result not found: {name}")]
    NotFound { name: String },

    #[error("Invalid test set name: {name:?}")]
    InvalidName { name: String },
}
