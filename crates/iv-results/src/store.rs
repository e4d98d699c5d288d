//! Test-set result storage API.

use crate::types::TestSetResult;
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of `{test_set}.json` files.
#[derive(Clone, Debug)]
pub struct ResultStore {
    root_dir: PathBuf,
}

impl ResultStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn result_path(&self, name: &str) -> ResultsResult<PathBuf> {
        let valid = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        if !valid {
            return Err(ResultsError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root_dir.join(format!("{name}.json")))
    }

    pub fn has_result(&self, name: &str) -> bool {
        self.result_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Write `result` as pretty JSON (2-space indent), replacing any earlier
    /// file for the same test set. Returns the file written.
    pub fn save(&self, name: &str, result: &TestSetResult) -> ResultsResult<PathBuf> {
        let path = self.result_path(name)?;
        let json = serde_json::to_string_pretty(result)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> ResultsResult<TestSetResult> {
        let path = self.result_path(name)?;
        if !path.exists() {
            return Err(ResultsError::NotFound {
                name: name.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Names of the stored test sets, sorted.
    pub fn list(&self) -> ResultsResult<Vec<String>> {
        let mut names = Vec::new();
        if !self.root_dir.exists() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.is_file()
                && path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem()
            {
                names.push(stem.to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> ResultsResult<()> {
        let path = self.result_path(name)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
