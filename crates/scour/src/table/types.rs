//! Core type definitions for column classification and scalar values.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Declared type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Integer or floating-point numbers.
    Numeric,
    /// Free text values.
    Text,
    /// Boolean values (true/false).
    Boolean,
    /// Date and/or time values.
    #[serde(rename = "datetime")]
    DateTime,
    /// Labelled categories.
    Categorical,
}

impl ColumnType {
    /// Every type tag, in report order.
    pub const ALL: [ColumnType; 5] = [
        ColumnType::Numeric,
        ColumnType::Text,
        ColumnType::Boolean,
        ColumnType::DateTime,
        ColumnType::Categorical,
    ];

    /// Get a short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
            ColumnType::Categorical => "categorical",
        }
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Returns true for text-like types (free text and categories).
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::Categorical)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single scalar value, used for literal fills.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) | Value::Bool(_) | Value::DateTime(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

/// Which occurrence of a duplicated row to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keep {
    /// Keep the first occurrence, flag the later ones.
    #[default]
    First,
    /// Keep the last occurrence, flag the earlier ones.
    Last,
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keep::First => f.write_str("first"),
            Keep::Last => f.write_str("last"),
        }
    }
}
