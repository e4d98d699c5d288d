//! A directory of `{name}.csv` test-set files.

use crate::loader::read_test_set;
use crate::test_set::TestSet;
use crate::{SourceError, SourceResult};
use iv_core::Precision;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct TestSetDirectory {
    root: PathBuf,
}

impl TestSetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.csv"))
    }

    /// Test-set names (CSV file stems), sorted.
    pub fn list(&self) -> SourceResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file()
                && path.extension().is_some_and(|ext| ext == "csv")
                && let Some(stem) = path.file_stem()
            {
                names.push(stem.to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str, precision: Precision) -> SourceResult<TestSet> {
        let path = self.path_of(name);
        if !path.is_file() {
            return Err(SourceError::UnknownTestSets {
                names: vec![name.to_string()],
            });
        }
        read_test_set(&path, precision)
    }

    /// Load several test sets. Unknown names are all reported together,
    /// before any file is parsed.
    pub fn load_many(&self, names: &[String], precision: Precision) -> SourceResult<Vec<TestSet>> {
        let unknown: Vec<String> = names
            .iter()
            .filter(|n| !self.path_of(n).is_file())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SourceError::UnknownTestSets { names: unknown });
        }
        names.iter().map(|n| self.load(n, precision)).collect()
    }

    pub fn load_all(&self, precision: Precision) -> SourceResult<Vec<TestSet>> {
        let names = self.list()?;
        self.load_many(&names, precision)
    }
}
