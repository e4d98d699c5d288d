//! Named collections of diode parameter sets.

use crate::{SourceError, SourceResult};
use iv_model::DiodeParameters;

/// One row of a test-set file.
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    pub index: u32,
    pub params: DiodeParameters,
}

/// All cases of one test-set file, ordered by index.
#[derive(Clone, Debug, PartialEq)]
pub struct TestSet {
    name: String,
    cases: Vec<TestCase>,
}

impl TestSet {
    /// `cases` must already be sorted by index with no duplicates.
    pub(crate) fn new(name: String, cases: Vec<TestCase>) -> Self {
        Self { name, cases }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn case(&self, index: u32) -> Option<&TestCase> {
        self.cases
            .binary_search_by_key(&index, |c| c.index)
            .ok()
            .map(|pos| &self.cases[pos])
    }

    /// A test set holding only the cases with the given indices, in index
    /// order. Every requested index must exist.
    pub fn select(&self, indices: &[u32]) -> SourceResult<TestSet> {
        let mut unknown: Vec<u32> = indices
            .iter()
            .copied()
            .filter(|&i| self.case(i).is_none())
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            unknown.dedup();
            return Err(SourceError::UnknownCases {
                test_set: self.name.clone(),
                indices: unknown,
            });
        }
        let cases = self
            .cases
            .iter()
            .filter(|c| indices.contains(&c.index))
            .cloned()
            .collect();
        Ok(TestSet::new(self.name.clone(), cases))
    }
}
