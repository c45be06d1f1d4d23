//! Error types for the samplesheet check pipeline.
//!
//! One error type per layer:
//!
//! - [`SniffError`] - dialect detection failed
//! - [`ReadError`] - input could not be decoded or parsed as a table
//! - [`RowError`] - a single row broke a field rule
//! - [`ConfigError`] - options file could not be loaded
//! - [`CheckError`] - top-level errors returned by the pipeline
//!
//! Conversion into [`CheckError`] is automatic via `From` implementations,
//! so `?` works across layers.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ColumnRole;

// =============================================================================
// Format Detection Errors
// =============================================================================

/// The sniffer could not infer a dialect from the sample.
#[derive(Debug, Error)]
pub enum SniffError {
    /// Failed to peek at or rewind the input.
    #[error("Failed to read the input sample: {0}")]
    Io(#[from] std::io::Error),

    /// Sample contains no non-blank lines.
    #[error("Could not determine the table format: the input is empty")]
    EmptySample,

    /// No candidate delimiter occurs consistently across the sample.
    #[error("Could not determine the table format: no consistent delimiter in the first {lines} lines")]
    NoConsistentDelimiter { lines: usize },
}

// =============================================================================
// Table Reading Errors
// =============================================================================

/// Errors while decoding or parsing the input table.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Failed to read from the underlying stream.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited record.
    #[error("Invalid table format: {0}")]
    Csv(#[from] csv::Error),

    /// The header line is missing.
    #[error("The samplesheet has no header line")]
    NoHeaders,
}

// =============================================================================
// Row Validation Errors
// =============================================================================

/// Constraint an integer column must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegerRequirement {
    /// Strictly greater than zero.
    Positive,
    /// Strictly greater than the row's region start.
    GreaterThanStart(String),
}

impl fmt::Display for IntegerRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerRequirement::Positive => write!(f, "greater than 0"),
            IntegerRequirement::GreaterThanStart(start) => {
                write!(f, "greater than region_start ({start})")
            }
        }
    }
}

/// A row failed one of the field rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowError {
    /// A required value is empty or absent.
    #[error("The {role} is required")]
    EmptyField { role: ColumnRole, column: String },

    /// A region coordinate is not a valid integer for its position.
    #[error(
        "The {role} entries must be integers {requirement}. \
         Error detected for var_id: {var_id}, {column}: {value}"
    )]
    InvalidInteger {
        role: ColumnRole,
        column: String,
        var_id: String,
        value: String,
        requirement: IntegerRequirement,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors loading [`crate::pipeline::CheckOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read options file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid options: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid options: {0}")]
    Invalid(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::pipeline::check_samplesheet`].
#[derive(Debug, Error)]
pub enum CheckError {
    /// The input path does not name an existing file.
    #[error("The given input file {} was not found!", .0.display())]
    InputNotFound(PathBuf),

    /// Filesystem failure with path context.
    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    FormatDetection(#[from] SniffError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Header lacks one or more required columns.
    #[error(
        "The samplesheet must contain these column headers: {}. Missing: {}.",
        .required.join(", "),
        .missing.join(", ")
    )]
    MissingColumns {
        required: Vec<String>,
        missing: Vec<String>,
    },

    /// A row failed local validation.
    #[error("{source} on line {line}.")]
    Row {
        line: usize,
        #[source]
        source: RowError,
    },

    /// Some variant IDs occur more than once.
    #[error("Variant IDs must be unique ({distinct} distinct IDs across {rows} rows).")]
    DuplicateId { distinct: usize, rows: usize },

    /// Failure while writing the output table.
    #[error("Failed to write output: {0}")]
    Write(#[from] csv::Error),
}

impl CheckError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckError::InputNotFound(_) => 2,
            _ => 1,
        }
    }

    /// Wrap an I/O failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table reading.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for pipeline operations.
pub type CheckResult<T> = Result<T, CheckError>;
