//! Typed columnar tables and their aggregate primitives.

mod column;
mod data_table;
pub mod stats;
mod types;

pub use column::{Column, ColumnData};
pub use data_table::DataTable;
pub use types::{ColumnType, Keep, Value};
