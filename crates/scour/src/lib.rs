//! Scour: data quality auditing and auditable cleaning for tabular datasets.
//!
//! Two entry points work on a [`DataTable`]:
//!
//! - [`Auditor`] profiles a table once and exposes a read-only
//!   [`AuditReport`] (shape, types, missing values, duplicates, constant and
//!   low-variance columns, outliers, high cardinality, string problems).
//! - [`Cleaner`] applies chainable cleaning operations to its own copy of
//!   the table and keeps a timestamped log of every step.
//!
//! # Example
//!
//! ```no_run
//! use scour::{Auditor, Cleaner, Columns, Keep, MissingStrategy, Parser};
//!
//! let table = Parser::new().parse_file("customers.csv").unwrap();
//!
//! let auditor = Auditor::new(&table).unwrap();
//! println!("{}", auditor.render());
//!
//! let mut cleaner = Cleaner::new(&table).unwrap();
//! cleaner
//!     .drop_duplicates(Keep::First)
//!     .unwrap()
//!     .handle_missing(MissingStrategy::Median, Columns::Auto)
//!     .unwrap();
//! println!("{}", cleaner.summary_text());
//! ```

pub mod audit;
pub mod clean;
pub mod error;
pub mod input;
pub mod table;

pub use audit::{AuditConfig, AuditReport, Auditor};
pub use clean::{
    Cleaner, CleanerConfig, Columns, ConversionMode, DEFAULT_IQR_MULTIPLIER, LogEntry, LogLevel,
    MissingStrategy, StringNormalization, TargetType,
};
pub use error::{Result, ScourError};
pub use input::{Parser, ParserConfig};
pub use table::{Column, ColumnData, ColumnType, DataTable, Keep, Value};
