//! # Varsheet - variant samplesheet validation
//!
//! Varsheet checks tabular samplesheets describing genomic variant regions
//! and rewrites them as canonical CSV for downstream pipeline stages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Samplesheet │────▶│   Sniffer   │────▶│ Row Checker │────▶│  Canonical  │
//! │ (CSV/TSV/..)│     │  + Reader   │     │  (4 rules)  │     │     CSV     │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The whole table is validated before any output is written; the first
//! invalid row aborts the run.
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Column roles and validated rows
//! - [`parser`] - Encoding, dialect sniffing, reading and writing tables
//! - [`validation`] - Field rules and the uniqueness check
//! - [`pipeline`] - End-to-end check
//! - [`logging`] - `tracing` subscriber setup

// Core modules
pub mod error;
pub mod models;

// Table I/O
pub mod parser;

// Validation
pub mod validation;

// Orchestration
pub mod pipeline;

// Logging
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    CheckError, CheckResult, ConfigError, IntegerRequirement, ReadError, RowError, SniffError,
};

pub use models::{ColumnNames, ColumnRole, ValidatedRow};

pub use parser::{
    decode_input, detect_encoding, sniff_format, write_table, Dialect, Row, TableReader,
};

pub use validation::{DuplicateIds, RowChecker};

pub use pipeline::{
    check_samplesheet, check_text, validate_table, CheckOptions, CheckSummary, ValidationResult,
};
