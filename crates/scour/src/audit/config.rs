//! Thresholds used by the audit checks.

use serde::{Deserialize, Serialize};

/// Configuration for an audit run.
///
/// Deserialises from a partial document; absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Low-variance columns are only reported when the table has more rows than this.
    pub low_variance_min_rows: usize,
    /// Largest distinct count that still counts as low variance.
    pub low_variance_max_distinct: usize,
    /// Numeric columns with fewer distinct values skip outlier analysis.
    pub outlier_min_distinct: usize,
    /// IQR fence multiplier.
    pub iqr_multiplier: f64,
    /// Absolute z-score above which a value is an outlier.
    pub z_score_threshold: f64,
    /// Distinct/row ratio above which a text column is high cardinality.
    pub high_cardinality_ratio: f64,
    /// Strings longer than this many characters are "very long".
    pub long_string_chars: usize,
    /// Non-empty strings up to this many characters are "very short".
    pub short_string_chars: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            low_variance_min_rows: 20,
            low_variance_max_distinct: 5,
            outlier_min_distinct: 5,
            iqr_multiplier: 1.5,
            z_score_threshold: 3.0,
            high_cardinality_ratio: 0.25,
            long_string_chars: 200,
            short_string_chars: 2,
        }
    }
}

impl AuditConfig {
    /// Set the row count a table must exceed before low variance is reported.
    pub fn with_low_variance_min_rows(mut self, rows: usize) -> Self {
        self.low_variance_min_rows = rows;
        self
    }

    /// Set the IQR fence multiplier.
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    /// Set the z-score threshold.
    pub fn with_z_score_threshold(mut self, threshold: f64) -> Self {
        self.z_score_threshold = threshold;
        self
    }

    /// Set the high-cardinality ratio.
    pub fn with_high_cardinality_ratio(mut self, ratio: f64) -> Self {
        self.high_cardinality_ratio = ratio;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AuditConfig =
            serde_json::from_str(r#"{"low_variance_min_rows": 50}"#).unwrap();
        assert_eq!(config.low_variance_min_rows, 50);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.long_string_chars, 200);
    }
}
