//! Row validation and transformation for variant samplesheets.
//!
//! Every row runs through four field rules in a fixed order:
//!
//! | Role           | Rule                                                   |
//! |----------------|--------------------------------------------------------|
//! | `var_id`       | non-empty; spaces become underscores                   |
//! | `chr`          | non-empty                                              |
//! | `region_start` | non-empty, ASCII digits only, value > 0                |
//! | `region_end`   | non-empty, ASCII digits only, value > `region_start`   |
//!
//! Coordinates are compared as decimal digit strings, so there is no upper
//! bound on their size.
//!
//! A row that passes is appended to the result; the first failing rule is
//! returned and nothing is recorded for that row. Duplicate variant IDs are
//! only checked once all rows have passed, by [`RowChecker::validate_unique_var`].
//!
//! # Example
//!
//! ```rust,ignore
//! use varsheet::validation::RowChecker;
//!
//! let mut checker = RowChecker::default();
//! for row in reader.rows() {
//!     checker.validate_and_transform(&row?)?;
//! }
//! checker.validate_unique_var()?;
//! let rows = checker.into_rows();
//! ```

use std::collections::HashSet;

use crate::error::{IntegerRequirement, RowError};
use crate::models::{ColumnNames, ColumnRole, ValidatedRow};
use crate::parser::Row;

/// Validates rows one at a time and accumulates the transformed result.
#[derive(Debug, Clone, Default)]
pub struct RowChecker {
    columns: ColumnNames,
    seen: SeenValues,
    modified: Vec<ValidatedRow>,
}

/// Distinct values observed per required column.
#[derive(Debug, Clone, Default)]
struct SeenValues {
    var_id: HashSet<String>,
    chr: HashSet<String>,
    region_start: HashSet<String>,
    region_end: HashSet<String>,
}

impl SeenValues {
    fn record(&mut self, row: &ValidatedRow) {
        self.var_id.insert(row.var_id.clone());
        self.chr.insert(row.chr.clone());
        self.region_start.insert(row.region_start.clone());
        self.region_end.insert(row.region_end.clone());
    }
}

/// Outcome of a failed uniqueness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateIds {
    pub distinct: usize,
    pub rows: usize,
}

impl RowChecker {
    /// Checker expecting the given column names.
    pub fn new(columns: ColumnNames) -> Self {
        Self {
            columns,
            seen: SeenValues::default(),
            modified: Vec::new(),
        }
    }

    /// Validate `row` and append its transformed form.
    pub fn validate_and_transform(&mut self, row: &Row) -> Result<(), RowError> {
        let var_id = self.validate_var_id(row)?;
        let chr = self.validate_chr(row)?;
        let (region_start, start) = self.validate_region_start(row, &var_id)?;
        let region_end = self.validate_region_end(row, &var_id, &start)?;

        let validated = ValidatedRow {
            line: row.line(),
            var_id,
            chr,
            region_start,
            region_end,
        };
        self.seen.record(&validated);
        self.modified.push(validated);
        Ok(())
    }

    /// Fail if any transformed variant ID was accepted more than once.
    pub fn validate_unique_var(&self) -> Result<(), DuplicateIds> {
        let distinct = self.seen.var_id.len();
        let rows = self.modified.len();
        if distinct != rows {
            return Err(DuplicateIds { distinct, rows });
        }
        Ok(())
    }

    /// Rows accepted so far, in input order.
    pub fn rows(&self) -> &[ValidatedRow] {
        &self.modified
    }

    /// Consume the checker, returning the accepted rows.
    pub fn into_rows(self) -> Vec<ValidatedRow> {
        self.modified
    }

    fn validate_var_id(&self, row: &Row) -> Result<String, RowError> {
        let value = self.required(row, ColumnRole::VarId)?;
        Ok(value.replace(' ', "_"))
    }

    fn validate_chr(&self, row: &Row) -> Result<String, RowError> {
        self.required(row, ColumnRole::Chr).map(str::to_string)
    }

    /// Returns the source text and its digits without leading zeros.
    fn validate_region_start(&self, row: &Row, var_id: &str) -> Result<(String, String), RowError> {
        let role = ColumnRole::RegionStart;
        let value = self.required(row, role)?;
        match parse_position(value) {
            Some(start) if !start.is_empty() => Ok((value.to_string(), start.to_string())),
            _ => Err(self.invalid_integer(role, var_id, value, IntegerRequirement::Positive)),
        }
    }

    /// Needs the parsed region start of the same row.
    fn validate_region_end(&self, row: &Row, var_id: &str, start: &str) -> Result<String, RowError> {
        let role = ColumnRole::RegionEnd;
        let value = self.required(row, role)?;
        match parse_position(value) {
            Some(end) if position_gt(end, start) => Ok(value.to_string()),
            _ => Err(self.invalid_integer(
                role,
                var_id,
                value,
                IntegerRequirement::GreaterThanStart(start.to_string()),
            )),
        }
    }

    fn required<'r>(&self, row: &'r Row, role: ColumnRole) -> Result<&'r str, RowError> {
        let column = self.columns.name(role);
        match row.get(column) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(RowError::EmptyField {
                role,
                column: column.to_string(),
            }),
        }
    }

    fn invalid_integer(
        &self,
        role: ColumnRole,
        var_id: &str,
        value: &str,
        requirement: IntegerRequirement,
    ) -> RowError {
        RowError::InvalidInteger {
            role,
            column: self.columns.name(role).to_string(),
            var_id: var_id.to_string(),
            value: value.to_string(),
            requirement,
        }
    }
}

/// Parse a non-negative decimal coordinate of any length.
///
/// Only ASCII digits `0-9` are accepted: signs, whitespace, separators and
/// non-ASCII decimal digits such as `١٢` or `１２` are rejected. Returns the
/// digits with leading zeros removed, so zero is the empty string.
fn parse_position(value: &str) -> Option<&str> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(value.trim_start_matches('0'))
}

/// `a > b` for digit strings without leading zeros.
fn position_gt(a: &str, b: &str) -> bool {
    (a.len(), a) > (b.len(), b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Dialect, TableReader};

    fn parse_rows(text: &str) -> Vec<Row> {
        let mut reader = TableReader::new(text.as_bytes(), Dialect::default()).unwrap();
        reader.rows().map(Result::unwrap).collect()
    }

    fn check_one(line: &str) -> Result<ValidatedRow, RowError> {
        let text = format!("var_id,chr,region_start,region_end\n{line}\n");
        let mut checker = RowChecker::default();
        checker.validate_and_transform(&parse_rows(&text)[0])?;
        Ok(checker.into_rows().remove(0))
    }

    #[test]
    fn test_valid_row_passes_through() {
        let row = check_one("v1,1,100,200").unwrap();
        assert_eq!(row.fields(), ["v1", "1", "100", "200"]);
        assert_eq!(row.line, 2);
    }

    #[test]
    fn test_spaces_in_var_id_replaced() {
        let row = check_one("my var 1,chr 1,100,200").unwrap();
        assert_eq!(row.var_id, "my_var_1");
        assert_eq!(row.chr, "chr 1");
    }

    #[test]
    fn test_coordinates_keep_source_text() {
        let row = check_one("v1,1,0100,0200").unwrap();
        assert_eq!(row.region_start, "0100");
        assert_eq!(row.region_end, "0200");
    }

    #[test]
    fn test_empty_var_id() {
        let err = check_one(",1,100,200").unwrap_err();
        assert!(matches!(err, RowError::EmptyField { role: ColumnRole::VarId, .. }));
    }

    #[test]
    fn test_empty_chr() {
        let err = check_one("v1,,100,200").unwrap_err();
        assert!(matches!(err, RowError::EmptyField { role: ColumnRole::Chr, .. }));
    }

    #[test]
    fn test_missing_value_counts_as_empty() {
        let err = check_one("v1,1,100").unwrap_err();
        assert!(matches!(err, RowError::EmptyField { role: ColumnRole::RegionEnd, .. }));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let err = check_one(",,abc,").unwrap_err();
        assert!(matches!(err, RowError::EmptyField { role: ColumnRole::VarId, .. }));

        let err = check_one("v1,1,abc,").unwrap_err();
        assert!(matches!(
            err,
            RowError::InvalidInteger { role: ColumnRole::RegionStart, .. }
        ));
    }

    #[test]
    fn test_region_start_must_be_positive_integer() {
        for bad in ["0", "-5", "1.5", "1e3", " 10", "abc", "+7", "１２"] {
            let err = check_one(&format!("v1,1,{bad},200")).unwrap_err();
            match err {
                RowError::InvalidInteger { role, value, requirement, .. } => {
                    assert_eq!(role, ColumnRole::RegionStart);
                    assert_eq!(value, bad);
                    assert_eq!(requirement, IntegerRequirement::Positive);
                }
                other => panic!("unexpected error for {bad:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_region_end_must_exceed_start() {
        let err = check_one("v1,1,200,100").unwrap_err();
        match err {
            RowError::InvalidInteger { role, var_id, requirement, .. } => {
                assert_eq!(role, ColumnRole::RegionEnd);
                assert_eq!(var_id, "v1");
                assert_eq!(requirement, IntegerRequirement::GreaterThanStart("200".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(check_one("v1,1,200,200").is_err());
        assert!(check_one("v1,1,200,201").is_ok());
    }

    #[test]
    fn test_error_reports_transformed_var_id() {
        let err = check_one("v 1,1,x,200").unwrap_err();
        assert!(err.to_string().contains("var_id: v_1"));
    }

    #[test]
    fn test_coordinates_beyond_u64() {
        let row = check_one("v1,1,1,99999999999999999999999").unwrap();
        assert_eq!(row.region_end, "99999999999999999999999");
        assert!(check_one("v1,1,18446744073709551616,18446744073709551617").is_ok());

        let err = check_one("v1,1,99999999999999999999999,1").unwrap_err();
        match err {
            RowError::InvalidInteger { role, requirement, .. } => {
                assert_eq!(role, ColumnRole::RegionEnd);
                assert_eq!(
                    requirement,
                    IntegerRequirement::GreaterThanStart("99999999999999999999999".into())
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_leading_zeros_compared_by_value() {
        assert!(check_one("v1,1,0009,10").is_ok());
        assert!(check_one("v1,1,10,0009").is_err());
        assert!(check_one("v1,1,000,5").is_err());
        let err = check_one("v1,1,007,0007").unwrap_err();
        assert!(err.to_string().contains("greater than region_start (7)"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        for bad in ["١٢", "１２", "٣"] {
            let err = check_one(&format!("v1,1,1,{bad}")).unwrap_err();
            assert!(matches!(err, RowError::InvalidInteger { role: ColumnRole::RegionEnd, .. }));
        }
    }

    #[test]
    fn test_position_ordering() {
        assert!(position_gt("10", "9"));
        assert!(position_gt("21", "20"));
        assert!(!position_gt("20", "20"));
        assert!(!position_gt("", ""));
        assert!(position_gt("1", ""));
        assert_eq!(parse_position("000"), Some(""));
        assert_eq!(parse_position(""), None);
    }

    #[test]
    fn test_failed_row_not_recorded() {
        let rows = parse_rows("var_id,chr,region_start,region_end\nv1,1,100,200\nv2,,1,2\n");
        let mut checker = RowChecker::default();
        checker.validate_and_transform(&rows[0]).unwrap();
        assert!(checker.validate_and_transform(&rows[1]).is_err());

        assert_eq!(checker.rows().len(), 1);
        assert!(checker.validate_unique_var().is_ok());
    }

    #[test]
    fn test_duplicate_var_ids() {
        let rows = parse_rows("var_id,chr,region_start,region_end\nv1,1,100,200\nv1,2,5,6\nv2,3,1,2\n");
        let mut checker = RowChecker::default();
        for row in &rows {
            checker.validate_and_transform(row).unwrap();
        }
        assert_eq!(
            checker.validate_unique_var(),
            Err(DuplicateIds { distinct: 2, rows: 3 })
        );
    }

    #[test]
    fn test_duplicates_after_space_replacement() {
        let rows = parse_rows("var_id,chr,region_start,region_end\nv 1,1,100,200\nv_1,2,5,6\n");
        let mut checker = RowChecker::default();
        for row in &rows {
            checker.validate_and_transform(row).unwrap();
        }
        assert!(checker.validate_unique_var().is_err());
    }

    #[test]
    fn test_custom_column_names() {
        let columns = ColumnNames {
            var_id: "id".into(),
            chr: "chrom".into(),
            region_start: "start".into(),
            region_end: "end".into(),
        };
        let rows = parse_rows("id,chrom,start,end\nrs 1,7,10,20\n");
        let mut checker = RowChecker::new(columns);
        checker.validate_and_transform(&rows[0]).unwrap();
        assert_eq!(checker.rows()[0].var_id, "rs_1");

        let rows = parse_rows("var_id,chrom,start,end\nrs1,7,10,20\n");
        let err = checker.validate_and_transform(&rows[0]).unwrap_err();
        assert!(matches!(err, RowError::EmptyField { ref column, .. } if column == "id"));
    }
}
