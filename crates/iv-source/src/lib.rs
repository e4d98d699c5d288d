//! iv-source: tabular test-set parameter files.

pub mod directory;
pub mod loader;
pub mod test_set;

pub use directory::TestSetDirectory;
pub use loader::{INDEX_COLUMN, parse_test_set, read_test_set};
pub use test_set::{TestCase, TestSet};

use iv_model::ModelError;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Test set {test_set} is missing columns: {}", missing.join(", "))]
    MissingColumns {
        test_set: String,
        missing: Vec<String>,
    },

    #[error("Test set {test_set}, row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        test_set: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Test set {test_set}, case {index}: {source}")]
    InvalidParameters {
        test_set: String,
        index: u32,
        #[source]
        source: ModelError,
    },

    #[error("Test set {test_set}: duplicate case index {index}")]
    DuplicateIndex { test_set: String, index: u32 },

    #[error("Unknown test sets: {}", names.join(", "))]
    UnknownTestSets { names: Vec<String> },

    #[error("Test set {test_set} has no cases with index: {}", join_indices(indices))]
    UnknownCases { test_set: String, indices: Vec<u32> },
}

fn join_indices(indices: &[u32]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
