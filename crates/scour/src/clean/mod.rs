//! Chainable, logged table cleaning.

mod cleaner;
mod log;
pub mod operations;
mod options;

pub use cleaner::Cleaner;
pub use log::{LogEntry, LogLevel, Operation, OperationLog};
pub use options::{
    CleanerConfig, Columns, ConversionMode, DEFAULT_IQR_MULTIPLIER, MissingStrategy,
    StringNormalization, TargetType,
};
