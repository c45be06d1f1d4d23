//! High-level API for checking a samplesheet end to end.
//!
//! Steps, strictly in order:
//! 1. Read and decode the input file
//! 2. Sniff the dialect from the first lines
//! 3. Check the header for the required columns
//! 4. Validate and transform every row
//! 5. Check that variant IDs are unique
//! 6. Write the canonical CSV
//!
//! The output file is only created once steps 1-5 have succeeded.
//!
//! # Example
//!
//! ```rust,ignore
//! use varsheet::pipeline::{check_samplesheet, CheckOptions};
//! use std::path::Path;
//!
//! let summary = check_samplesheet(
//!     Path::new("samplesheet.tsv"),
//!     Path::new("samplesheet.valid.csv"),
//!     &CheckOptions::default(),
//! )?;
//! println!("{} rows", summary.row_count);
//! ```

use std::fs;
use std::io::{BufRead, BufWriter, Seek};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, CheckResult, ConfigError};
use crate::models::{ColumnNames, ValidatedRow};
use crate::parser::{decode_input, sniff_format, write_table, Dialect, TableReader, SNIFF_LINES};
use crate::validation::RowChecker;

/// Options for a samplesheet check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckOptions {
    /// Header names of the four required columns.
    pub columns: ColumnNames,

    /// Number of lines inspected to detect the dialect.
    pub sniff_lines: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            sniff_lines: SNIFF_LINES,
        }
    }
}

impl CheckOptions {
    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sniff_lines == 0 {
            return Err(ConfigError::Invalid("sniff_lines must be at least 1".into()));
        }
        let names = self.columns.header();
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::Invalid("column names must not be empty".into()));
            }
            if names[..i].contains(name) {
                return Err(ConfigError::Invalid(format!(
                    "column name '{name}' is used for more than one role"
                )));
            }
        }
        Ok(())
    }
}

/// Rows that passed every check, plus what was learned about the input.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub dialect: Dialect,
    pub headers: Vec<String>,
    pub rows: Vec<ValidatedRow>,
}

/// Summary of a successful check.
#[derive(Debug, Clone)]
pub struct CheckSummary {
    pub encoding: &'static str,
    pub dialect: Dialect,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Validate `file_in` and write the canonical table to `file_out`.
pub fn check_samplesheet(
    file_in: &Path,
    file_out: &Path,
    options: &CheckOptions,
) -> CheckResult<CheckSummary> {
    if !file_in.is_file() {
        return Err(CheckError::InputNotFound(file_in.to_path_buf()));
    }

    let bytes = fs::read(file_in).map_err(|e| CheckError::io(file_in, e))?;
    let decoded = decode_input(&bytes);
    let encoding = decoded.encoding;
    tracing::info!(path = %file_in.display(), encoding, "read samplesheet");

    let result = validate_table(decoded.into_cursor(), options)?;

    // Only touch the output once validation is complete.
    let file = fs::File::create(file_out).map_err(|e| CheckError::io(file_out, e))?;
    write_table(BufWriter::new(file), &options.columns, &result.rows)?;
    tracing::info!(
        path = %file_out.display(),
        rows = result.rows.len(),
        "wrote validated samplesheet"
    );

    Ok(CheckSummary {
        encoding,
        dialect: result.dialect,
        headers: result.headers,
        row_count: result.rows.len(),
    })
}

/// Sniff, read and validate a whole table held in `input`.
pub fn validate_table<R: BufRead + Seek>(
    mut input: R,
    options: &CheckOptions,
) -> CheckResult<ValidationResult> {
    let dialect = sniff_format(&mut input, options.sniff_lines)?;
    tracing::info!(%dialect, "detected table format");

    let mut reader = TableReader::new(input, dialect)?;
    let headers = reader.headers().to_vec();
    tracing::info!(columns = %headers.join(", "), "read header");

    let missing = options.columns.missing_from(&headers);
    if !missing.is_empty() {
        return Err(CheckError::MissingColumns {
            required: options.columns.header().map(str::to_string).to_vec(),
            missing,
        });
    }

    let mut checker = RowChecker::new(options.columns.clone());
    for row in reader.rows() {
        let row = row?;
        checker
            .validate_and_transform(&row)
            .map_err(|source| CheckError::Row {
                line: row.line(),
                source,
            })?;
        tracing::debug!(line = row.line(), "row accepted");
    }

    checker
        .validate_unique_var()
        .map_err(|dup| CheckError::DuplicateId {
            distinct: dup.distinct,
            rows: dup.rows,
        })?;
    tracing::info!(rows = checker.rows().len(), "all rows valid");

    Ok(ValidationResult {
        dialect,
        headers,
        rows: checker.into_rows(),
    })
}

/// Validate in-memory text and render the canonical CSV.
pub fn check_text(text: &str, options: &CheckOptions) -> CheckResult<String> {
    let result = validate_table(std::io::Cursor::new(text), options)?;
    let mut out = Vec::new();
    write_table(&mut out, &options.columns, &result.rows)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use crate::models::ColumnRole;
    use tempfile::tempdir;

    const VALID: &str = "var_id,chr,region_start,region_end\nv1,1,100,200\nv2,2,50,60\n";

    #[test]
    fn test_default_options() {
        let opts = CheckOptions::default();
        assert_eq!(opts.sniff_lines, 10);
        assert_eq!(opts.columns, ColumnNames::default());
    }

    #[test]
    fn test_options_from_json() {
        let opts = CheckOptions::from_json(r#"{"columns": {"chr": "chrom"}, "sniff_lines": 5}"#)
            .unwrap();
        assert_eq!(opts.columns.chr, "chrom");
        assert_eq!(opts.columns.var_id, "var_id");
        assert_eq!(opts.sniff_lines, 5);
    }

    #[test]
    fn test_options_reject_bad_values() {
        assert!(CheckOptions::from_json(r#"{"sniff_lines": 0}"#).is_err());
        assert!(CheckOptions::from_json(r#"{"columns": {"chr": "var_id"}}"#).is_err());
        assert!(CheckOptions::from_json(r#"{"unknown": 1}"#).is_err());
    }

    #[test]
    fn test_valid_table() {
        let out = check_text(VALID, &CheckOptions::default()).unwrap();
        assert_eq!(out, VALID);
    }

    #[test]
    fn test_output_is_idempotent() {
        let input = "var_id\tchr\tregion_start\tregion_end\textra\nmy var\tX\t1\t2\tz\n";
        let once = check_text(input, &CheckOptions::default()).unwrap();
        let twice = check_text(&once, &CheckOptions::default()).unwrap();
        assert_eq!(once, "var_id,chr,region_start,region_end\nmy_var,X,1,2\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_column_order_and_extras_normalized() {
        let input = "region_end;note;chr;var_id;region_start\n200;x;1;v1;100\n";
        let out = check_text(input, &CheckOptions::default()).unwrap();
        assert_eq!(out, "var_id,chr,region_start,region_end\nv1,1,100,200\n");
    }

    #[test]
    fn test_missing_columns() {
        let err = check_text("var_id,chr,region_start\nv1,1,100\n", &CheckOptions::default())
            .unwrap_err();
        match err {
            CheckError::MissingColumns { missing, .. } => assert_eq!(missing, vec!["region_end"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_row_error_carries_line() {
        let input = "var_id,chr,region_start,region_end\nv1,1,100,200\nv2,1,200,100\n";
        let err = check_text(input, &CheckOptions::default()).unwrap_err();
        match err {
            CheckError::Row { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(
                    source,
                    RowError::InvalidInteger { role: ColumnRole::RegionEnd, .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_local_errors_reported_before_duplicates() {
        let input = "var_id,chr,region_start,region_end\nv1,1,1,2\nv1,1,1,2\nv3,,1,2\n";
        let err = check_text(input, &CheckOptions::default()).unwrap_err();
        assert!(matches!(err, CheckError::Row { line: 4, .. }));
    }

    #[test]
    fn test_duplicate_ids() {
        let input = "var_id,chr,region_start,region_end\nv1,1,100,200\nv1,2,5,6\n";
        let err = check_text(input, &CheckOptions::default()).unwrap_err();
        assert!(matches!(err, CheckError::DuplicateId { distinct: 1, rows: 2 }));
        assert!(err.to_string().contains("must be unique"));
    }

    #[test]
    fn test_header_only_table() {
        let out = check_text("var_id,chr,region_start,region_end\n", &CheckOptions::default())
            .unwrap();
        assert_eq!(out, "var_id,chr,region_start,region_end\n");
    }

    #[test]
    fn test_empty_input_is_format_error() {
        let err = check_text("", &CheckOptions::default()).unwrap_err();
        assert!(matches!(err, CheckError::FormatDetection(_)));
    }

    #[test]
    fn test_check_samplesheet_writes_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.tsv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "var_id\tchr\tregion_start\tregion_end\nv 1\t1\t100\t200\n").unwrap();

        let summary = check_samplesheet(&input, &output, &CheckOptions::default()).unwrap();

        assert_eq!(summary.row_count, 1);
        assert_eq!(summary.dialect.delimiter, b'\t');
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "var_id,chr,region_start,region_end\nv_1,1,100,200\n"
        );
    }

    #[test]
    fn test_check_samplesheet_keeps_utf8_values() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        let text = "var_id,chr,region_start,region_end\ncafé,1,100,200\nnaïve,2,5,6\nrs1_α,3,1,2\n";
        fs::write(&input, text).unwrap();

        let summary = check_samplesheet(&input, &output, &CheckOptions::default()).unwrap();

        assert_eq!(summary.encoding, "UTF-8");
        assert_eq!(summary.row_count, 3);
        assert_eq!(fs::read(&output).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_failed_check_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "var_id,chr,region_start,region_end\nv1,1,200,100\n").unwrap();

        let err = check_samplesheet(&input, &output, &CheckOptions::default()).unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let err = check_samplesheet(&dir.path().join("nope.csv"), &output, &CheckOptions::default())
            .unwrap_err();

        assert!(matches!(err, CheckError::InputNotFound(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!output.exists());
    }
}
