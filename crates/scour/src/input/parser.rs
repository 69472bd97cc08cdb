//! Delimited text loader with delimiter detection and basic type classification.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::{Result, ScourError};
use crate::table::{Column, ColumnData, DataTable};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Datetime layouts tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts tried in order (ISO, alt ISO, US, European).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl ParserConfig {
    /// Use a fixed delimiter instead of detecting one.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Declare whether the first row is a header.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Stop after `max_rows` data rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Loads delimited text into a typed [`DataTable`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a table.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataTable> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|e| ScourError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_bytes(&contents)
    }

    /// Parse text held in memory.
    pub fn parse_str(&self, text: &str) -> Result<DataTable> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse raw bytes.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes, self.config.quote)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(str::to_string).collect()
        } else {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(ScourError::EmptyData("No columns found".to_string()));
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let cells: Vec<Option<&str>> = rows
                    .iter()
                    .map(|row| row.get(index).map(String::as_str).filter(|v| !is_null_value(v)))
                    .collect();
                Column::new(name.clone(), classify(&cells))
            })
            .collect();

        let table = DataTable::new(columns)?;
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            delimiter = ?(delimiter as char),
            "parsed delimited input"
        );
        Ok(table)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells read as missing. Matching is exact: surrounding whitespace or a
/// different case keeps the cell as text.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#N/A N/A", "#NA", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// Check if a cell is a missing-value token.
pub fn is_null_value(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

/// Pick the narrowest storage that holds every non-null cell.
fn classify(cells: &[Option<&str>]) -> ColumnData {
    let present: Vec<&str> = cells.iter().flatten().map(|v| v.trim()).collect();

    if present.is_empty() {
        return ColumnData::Text(vec![None; cells.len()]);
    }

    if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        return ColumnData::Integer(
            cells
                .iter()
                .map(|c| c.and_then(|v| v.trim().parse().ok()))
                .collect(),
        );
    }

    if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        return ColumnData::Float(
            cells
                .iter()
                .map(|c| c.and_then(|v| v.trim().parse().ok()))
                .collect(),
        );
    }

    if present.iter().all(|v| parse_bool(v).is_some()) {
        return ColumnData::Boolean(cells.iter().map(|c| c.and_then(parse_bool)).collect());
    }

    if present.iter().all(|v| parse_datetime(v).is_some()) {
        return ColumnData::DateTime(cells.iter().map(|c| c.and_then(parse_datetime)).collect());
    }

    ColumnData::Text(cells.iter().map(|c| c.map(str::to_string)).collect())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a date or datetime in one of the supported layouts.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Lines sampled when detecting the delimiter.
const SNIFF_LINES: usize = 10;

/// Pick the delimiter that splits the sample into the most consistent,
/// widest records. Ties go to the earlier entry of [`DELIMITERS`]; a sample
/// no candidate splits falls back to a comma.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let sample: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    if sample.is_empty() {
        return Err(ScourError::EmptyData("No lines to analyze".to_string()));
    }
    let sample = sample.join("\n");

    let best = DELIMITERS
        .iter()
        .rev()
        .filter_map(|&delimiter| {
            let widths = record_widths(sample.as_bytes(), delimiter, quote);
            let header_width = *widths.first()?;
            if header_width < 2 {
                return None;
            }
            let agreeing = widths.iter().filter(|&&w| w == header_width).count();
            // Per-mille share of records with the header's width
            let consistency = agreeing * 1000 / widths.len();
            Some((consistency, header_width, delimiter))
        })
        .max_by_key(|&(consistency, width, _)| (consistency, width));

    Ok(best.map_or(b',', |(_, _, delimiter)| delimiter))
}

/// Field count of each record in `sample` when split on `delimiter`.
fn record_widths(sample: &[u8], delimiter: u8, quote: u8) -> Vec<usize> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample)
        .records()
        .map_while(std::result::Result::ok)
        .map(|record| record.len())
        .collect()
}
