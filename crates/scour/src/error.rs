//! Error types for the scour library.

use std::path::PathBuf;
use thiserror::Error;

use crate::table::ColumnType;

/// Main error type for scour operations.
#[derive(Debug, Error)]
pub enum ScourError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The table has no columns to audit or clean.
    #[error("Table has no columns")]
    EmptySchema,

    /// Two columns share a name.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A column's length differs from the rest of the table.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A requested column does not exist.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A column was targeted by an operation that does not apply to its type.
    #[error("Column '{column}' is {actual}, expected {expected}")]
    ColumnTypeMismatch {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    /// A type conversion target is not recognised.
    #[error("Unsupported conversion of '{column}' to '{target}'")]
    UnsupportedConversion { column: String, target: String },

    /// A type conversion was attempted but could not complete.
    #[error("Cannot convert '{column}': {message}")]
    Conversion { column: String, message: String },
}

/// Result type alias for scour operations.
pub type Result<T> = std::result::Result<T, ScourError>;
