//! Loading delimited text into tables.

mod parser;

pub use parser::{Parser, ParserConfig, is_null_value, parse_datetime};
