//! Audit report sections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::ColumnType;

/// Table dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub row_count: usize,
    pub col_count: usize,
}

/// Missing-value statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MissingValues {
    /// Total missing cells.
    pub total: usize,
    /// Missing cells as a percentage of rows × columns.
    pub percentage: f64,
    /// Columns with at least one missing cell, most missing first.
    pub by_column: IndexMap<String, usize>,
    /// Column with the most missing cells (first in column order on ties).
    pub worst_column: Option<String>,
    pub worst_count: usize,
}

/// Exact duplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Duplicates {
    /// Rows repeating an earlier row.
    pub count: usize,
    /// Count as a percentage of the row count.
    pub percentage: f64,
}

/// A column with few distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowVariance {
    pub column: String,
    pub distinct: usize,
}

/// Outlier counts for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// Values strictly outside the IQR fences.
    pub iqr_count: usize,
    /// Values whose absolute z-score exceeds the threshold.
    pub z_score_count: usize,
    pub min: f64,
    pub max: f64,
}

/// Identifier-like text column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cardinality {
    pub unique_count: usize,
    /// Distinct/row ratio, rounded to 3 decimals.
    pub ratio: f64,
}

/// Suspicious string counts for one text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringProblems {
    pub empty_or_whitespace: usize,
    pub very_long: usize,
    pub very_short: usize,
}

impl StringProblems {
    /// Whether any count is nonzero.
    pub fn any(&self) -> bool {
        self.empty_or_whitespace > 0 || self.very_long > 0 || self.very_short > 0
    }
}

/// Reliability grade derived from a column's suspect-value percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// No suspect values at all.
    Perfect,
    /// Up to 3%.
    Excellent,
    /// Up to 6%.
    VeryGood,
    /// Up to 10%.
    Good,
    /// Up to 15%.
    Fair,
    Problematic,
}

impl Grade {
    /// Grade for a suspect total and its rounded percentage.
    pub fn from_suspects(total: usize, percentage: f64) -> Self {
        if total == 0 {
            Grade::Perfect
        } else if percentage <= 3.0 {
            Grade::Excellent
        } else if percentage <= 6.0 {
            Grade::VeryGood
        } else if percentage <= 10.0 {
            Grade::Good
        } else if percentage <= 15.0 {
            Grade::Fair
        } else {
            Grade::Problematic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Perfect => "perfect",
            Grade::Excellent => "excellent",
            Grade::VeryGood => "very good",
            Grade::Good => "good",
            Grade::Fair => "use with care",
            Grade::Problematic => "problematic",
        }
    }
}

/// Missing cells and placeholder strings found in one column.
///
/// The placeholder counts only apply to text columns and compare the value
/// trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspectValues {
    pub column: String,
    pub missing: usize,
    /// Values that are empty once trimmed.
    pub empty: usize,
    /// The text `none`.
    pub none_text: usize,
    /// The texts `na`, `n/a` and `null`.
    pub null_placeholders: usize,
    pub total: usize,
    /// Total as a percentage of the row count, rounded to 1 decimal.
    pub percentage: f64,
    pub grade: Grade,
}

/// Immutable result of auditing a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub shape: Shape,
    /// Column count per type tag, for tags that occur.
    pub dtypes_count: IndexMap<ColumnType, usize>,
    /// Column names per type tag, every tag present.
    pub columns_by_type: IndexMap<ColumnType, Vec<String>>,
    pub missing_values: MissingValues,
    pub duplicates: Duplicates,
    /// Columns with at most one distinct non-missing value.
    pub constants: Vec<String>,
    pub low_variance: Vec<LowVariance>,
    pub outliers: IndexMap<String, OutlierSummary>,
    pub high_cardinality: IndexMap<String, Cardinality>,
    pub string_problems: IndexMap<String, StringProblems>,
    /// Every column, fewest suspect values first.
    pub suspect_values: Vec<SuspectValues>,
}

impl AuditReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether the audit found nothing to report beyond shape and types.
    pub fn is_clean(&self) -> bool {
        self.missing_values.total == 0
            && self.duplicates.count == 0
            && self.constants.is_empty()
            && self.low_variance.is_empty()
            && self
                .outliers
                .values()
                .all(|o| o.iqr_count == 0 && o.z_score_count == 0)
            && self.high_cardinality.is_empty()
            && self.string_problems.is_empty()
            && self.clean_columns().len() == self.suspect_values.len()
    }

    /// Columns without a single suspect value, in report order.
    pub fn clean_columns(&self) -> Vec<&str> {
        self.suspect_values
            .iter()
            .filter(|s| s.grade == Grade::Perfect)
            .map(|s| s.column.as_str())
            .collect()
    }
}
