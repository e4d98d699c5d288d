//! CSV test-set reader.
//!
//! Header: `Index` followed by the six parameter columns in any order.
//! Extra columns are ignored.

use crate::test_set::{TestCase, TestSet};
use crate::{SourceError, SourceResult};
use iv_core::Precision;
use iv_model::{DiodeParameters, PARAMETER_NAMES};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

pub const INDEX_COLUMN: &str = "Index";

/// Read the test set stored at `path`, named after the file stem.
pub fn read_test_set(path: &Path, precision: Precision) -> SourceResult<TestSet> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file = std::fs::File::open(path)?;
    parse_test_set(&name, file, precision)
}

/// Parse CSV test-set content. Every row is parsed and validated before
/// anything is returned; the first malformed row is the error.
pub fn parse_test_set<R: Read>(name: &str, reader: R, precision: Precision) -> SourceResult<TestSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |wanted: &str| headers.iter().position(|h| h == wanted);

    let required = std::iter::once(INDEX_COLUMN).chain(PARAMETER_NAMES);
    let missing: Vec<String> = required
        .filter(|c| column(*c).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(SourceError::MissingColumns {
            test_set: name.to_string(),
            missing,
        });
    }
    // Present after the check above.
    let index_col = column(INDEX_COLUMN).unwrap_or_default();
    let param_cols = PARAMETER_NAMES.map(|c| column(c).unwrap_or_default());

    let mut cases = BTreeMap::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let row = row + 1;
        let field = |col: usize| record.get(col).unwrap_or("");
        let invalid = |column: &str, value: &str| SourceError::InvalidValue {
            test_set: name.to_string(),
            row,
            column: column.to_string(),
            value: value.to_string(),
        };

        let index_text = field(index_col);
        let index = parse_index(index_text).ok_or_else(|| invalid(INDEX_COLUMN, index_text))?;

        let mut values = Vec::with_capacity(PARAMETER_NAMES.len());
        for (column_name, col) in PARAMETER_NAMES.iter().zip(param_cols) {
            let text = field(col);
            values.push(precision.parse(text).map_err(|_| invalid(column_name, text))?);
        }
        let [il, io, rs, rsh, n, ns]: [_; 6] = values
            .try_into()
            .map_err(|_| invalid("parameters", "wrong column count"))?;
        let params = DiodeParameters::new(il, io, rs, rsh, n, ns).map_err(|source| {
            SourceError::InvalidParameters {
                test_set: name.to_string(),
                index,
                source,
            }
        })?;

        if cases.insert(index, TestCase { index, params }).is_some() {
            return Err(SourceError::DuplicateIndex {
                test_set: name.to_string(),
                index,
            });
        }
    }

    tracing::debug!(test_set = name, cases = cases.len(), "test set loaded");
    Ok(TestSet::new(name.to_string(), cases.into_values().collect()))
}

/// Case indices are integers, but spreadsheets like to write `3.0`.
fn parse_index(text: &str) -> Option<u32> {
    if let Ok(index) = text.parse::<u32>() {
        return Some(index);
    }
    let value = text.parse::<f64>().ok()?;
    let integral = value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64;
    integral.then_some(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Index,photocurrent,saturation_current,resistance_series,resistance_shunt,n,cells_in_series";

    fn parse(body: &str) -> SourceResult<TestSet> {
        let text = format!("{HEADER}\n{body}");
        parse_test_set("case0", text.as_bytes(), Precision::default())
    }

    #[test]
    fn parses_rows_in_index_order() {
        let set = parse("2,6,1e-9,0.1,1000,1,60\n1.0,7.5,5e-10,0.2,500,1.2,72\n").unwrap();
        assert_eq!(set.name(), "case0");
        assert_eq!(set.len(), 2);
        assert_eq!(set.cases()[0].index, 1);
        assert_eq!(set.cases()[1].index, 2);
        let ctx = Precision::default();
        assert_eq!(
            set.case(1).unwrap().params.photocurrent(),
            &ctx.parse("7.5").unwrap()
        );
    }

    #[test]
    fn columns_in_any_order() {
        let text = "n,Index,cells_in_series,photocurrent,saturation_current,resistance_shunt,resistance_series,comment\n\
                    1,4,60,6,1e-9,1000,0.1,hello\n";
        let set = parse_test_set("shuffled", text.as_bytes(), Precision::default()).unwrap();
        let ctx = Precision::default();
        let params = &set.case(4).unwrap().params;
        assert_eq!(params.resistance_series(), &ctx.parse("0.1").unwrap());
        assert_eq!(params.cells_in_series(), &ctx.parse("60").unwrap());
    }

    #[test]
    fn missing_column_fails_before_rows() {
        let text = "Index,photocurrent,saturation_current,resistance_series,n,cells_in_series\n\
                    1,6,garbage,0.1,1,60\n";
        let err = parse_test_set("case1", text.as_bytes(), Precision::default()).unwrap_err();
        match err {
            SourceError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["resistance_shunt"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_values() {
        assert!(matches!(
            parse("1,6,abc,0.1,1000,1,60\n"),
            Err(SourceError::InvalidValue { row: 1, .. })
        ));
        assert!(matches!(
            parse("1.5,6,1e-9,0.1,1000,1,60\n"),
            Err(SourceError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse("1,6,1e-9,0.1,0,1,60\n"),
            Err(SourceError::InvalidParameters { index: 1, .. })
        ));
        assert!(matches!(
            parse("1,6,1e-9,0.1,1000,1,60\n1,6,1e-9,0.1,1000,1,60\n"),
            Err(SourceError::DuplicateIndex { index: 1, .. })
        ));
    }

    #[test]
    fn index_forms() {
        assert_eq!(parse_index("12"), Some(12));
        assert_eq!(parse_index("12.0"), Some(12));
        assert_eq!(parse_index("12.5"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index(""), None);
    }
}
