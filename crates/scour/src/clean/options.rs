//! Parameters for cleaning operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::Value;

/// Default fence multiplier for IQR outlier removal.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Which columns an operation acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    /// The operation's default set (all columns, all text columns or all
    /// numeric columns, depending on the operation).
    #[default]
    Auto,
    /// Exactly these columns, in this order.
    Only(Vec<String>),
}

impl Columns {
    /// Target the named columns.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Columns::Only(names.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Columns {
    fn from(name: &str) -> Self {
        Columns::Only(vec![name.to_string()])
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Columns {
    fn from(names: [S; N]) -> Self {
        Columns::only(names)
    }
}

impl From<Vec<String>> for Columns {
    fn from(names: Vec<String>) -> Self {
        Columns::Only(names)
    }
}

/// How missing values are handled.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingStrategy {
    /// Drop rows with a missing value in any target column.
    Drop,
    /// Fill numeric columns with their mean.
    Mean,
    /// Fill numeric columns with their median.
    Median,
    /// Fill numeric columns with their most frequent value (smallest on ties).
    Mode,
    /// Fill with zero.
    Zero,
    /// Fill with a literal. Without a value the operation does nothing.
    Custom(Option<Value>),
}

impl MissingStrategy {
    /// Short lowercase name.
    pub fn label(&self) -> &'static str {
        match self {
            MissingStrategy::Drop => "drop",
            MissingStrategy::Mean => "mean",
            MissingStrategy::Median => "median",
            MissingStrategy::Mode => "mode",
            MissingStrategy::Zero => "zero",
            MissingStrategy::Custom(_) => "custom",
        }
    }
}

/// Text normalisation switches, applied in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringNormalization {
    /// Replacement for missing values, applied first.
    pub missing_placeholder: Option<String>,
    pub lowercase: bool,
    /// Trim leading and trailing whitespace.
    pub strip: bool,
    /// Collapse internal whitespace runs to a single space.
    pub collapse_whitespace: bool,
}

impl Default for StringNormalization {
    fn default() -> Self {
        Self {
            missing_placeholder: Some(String::new()),
            lowercase: true,
            strip: true,
            collapse_whitespace: true,
        }
    }
}

impl StringNormalization {
    /// All steps off; enable the ones you need.
    pub fn none() -> Self {
        Self {
            missing_placeholder: None,
            lowercase: false,
            strip: false,
            collapse_whitespace: false,
        }
    }

    pub fn with_lowercase(mut self, on: bool) -> Self {
        self.lowercase = on;
        self
    }

    pub fn with_strip(mut self, on: bool) -> Self {
        self.strip = on;
        self
    }

    pub fn with_collapse_whitespace(mut self, on: bool) -> Self {
        self.collapse_whitespace = on;
        self
    }

    pub fn with_missing_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.missing_placeholder = placeholder;
        self
    }
}

/// Target of a type conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Relabel values as categories.
    Categorical,
    /// Numeric, integer subtype.
    Integer,
    /// Numeric, floating-point subtype.
    Float,
    /// Free text.
    Text,
}

impl TargetType {
    /// Look up a target by name (`category`, `int`, `float64`, `str`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "category" | "categorical" => Some(TargetType::Categorical),
            "int" | "int64" | "integer" => Some(TargetType::Integer),
            "float" | "float64" | "number" | "numeric" => Some(TargetType::Float),
            "str" | "string" | "text" => Some(TargetType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetType::Categorical => "category",
            TargetType::Integer => "int",
            TargetType::Float => "float",
            TargetType::Text => "text",
        };
        f.write_str(name)
    }
}

/// What to do when one column of a conversion batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Record the failure in the log and carry on with the other columns.
    #[default]
    Lenient,
    /// Stop at the first failure and return it.
    FailFast,
}

/// Configuration for a cleaning session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub conversion_mode: ConversionMode,
}

impl CleanerConfig {
    /// Set how conversion failures are handled.
    pub fn with_conversion_mode(mut self, mode: ConversionMode) -> Self {
        self.conversion_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_names() {
        assert_eq!(TargetType::parse("category"), Some(TargetType::Categorical));
        assert_eq!(TargetType::parse("INT64"), Some(TargetType::Integer));
        assert_eq!(TargetType::parse(" float "), Some(TargetType::Float));
        assert_eq!(TargetType::parse("datetime"), None);
    }

    #[test]
    fn test_columns_from_array() {
        assert_eq!(
            Columns::from(["a", "b"]),
            Columns::Only(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(Columns::from("a"), Columns::Only(vec!["a".to_string()]));
    }
}
