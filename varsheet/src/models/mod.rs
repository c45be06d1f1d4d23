//! Domain models for the samplesheet check.
//!
//! - [`ColumnRole`] - the four fixed roles a samplesheet column can play
//! - [`ColumnNames`] - header names bound to each role
//! - [`ValidatedRow`] - a row that passed every field rule

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Column Roles
// =============================================================================

/// Role of a required samplesheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Variant identifier.
    VarId,
    /// Chromosome identifier.
    Chr,
    /// First position of the region of interest.
    RegionStart,
    /// Last position of the region of interest.
    RegionEnd,
}

impl ColumnRole {
    /// All roles in validation order.
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::VarId,
        ColumnRole::Chr,
        ColumnRole::RegionStart,
        ColumnRole::RegionEnd,
    ];

    /// Human-readable description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            ColumnRole::VarId => "variant ID",
            ColumnRole::Chr => "chromosome ID",
            ColumnRole::RegionStart => "region start",
            ColumnRole::RegionEnd => "region end",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

// =============================================================================
// Column Names
// =============================================================================

/// Header names expected for each required role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub var_id: String,
    pub chr: String,
    pub region_start: String,
    pub region_end: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            var_id: "var_id".to_string(),
            chr: "chr".to_string(),
            region_start: "region_start".to_string(),
            region_end: "region_end".to_string(),
        }
    }
}

impl ColumnNames {
    /// Header name bound to `role`.
    pub fn name(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::VarId => &self.var_id,
            ColumnRole::Chr => &self.chr,
            ColumnRole::RegionStart => &self.region_start,
            ColumnRole::RegionEnd => &self.region_end,
        }
    }

    /// Names in canonical output order.
    pub fn header(&self) -> [&str; 4] {
        ColumnRole::ALL.map(|role| self.name(role))
    }

    /// Required names absent from `headers`, in canonical order.
    pub fn missing_from<S: AsRef<str>>(&self, headers: &[S]) -> Vec<String> {
        self.header()
            .into_iter()
            .filter(|name| !headers.iter().any(|h| h.as_ref() == *name))
            .map(str::to_string)
            .collect()
    }
}

// =============================================================================
// Validated Row
// =============================================================================

/// A row after every field rule passed.
///
/// Coordinates keep their source text; only `var_id` is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    /// 1-based line in the source table.
    pub line: usize,
    pub var_id: String,
    pub chr: String,
    pub region_start: String,
    pub region_end: String,
}

impl ValidatedRow {
    /// Value for `role`.
    pub fn get(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::VarId => &self.var_id,
            ColumnRole::Chr => &self.chr,
            ColumnRole::RegionStart => &self.region_start,
            ColumnRole::RegionEnd => &self.region_end,
        }
    }

    /// Fields in canonical output order.
    pub fn fields(&self) -> [&str; 4] {
        ColumnRole::ALL.map(|role| self.get(role))
    }
}
