//! Pure cleaning operations.
//!
//! Each function reads a table and returns a [`Step`]: the new table (if
//! anything changed) and the message for the log. Nothing here mutates its
//! input; [`Cleaner`](super::Cleaner) commits the result.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::{Result, ScourError};
use crate::table::{Column, ColumnData, ColumnType, DataTable, Keep, Value, stats};

use super::log::LogLevel;
use super::options::{Columns, ConversionMode, MissingStrategy, StringNormalization, TargetType};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Result of one operation, before it is committed.
#[derive(Debug, Clone)]
pub struct Step {
    /// The transformed table, or `None` if the operation changed nothing.
    pub table: Option<DataTable>,
    pub level: LogLevel,
    pub message: String,
}

impl Step {
    fn changed(table: DataTable, message: String) -> Self {
        Self {
            table: Some(table),
            level: LogLevel::Info,
            message,
        }
    }

    fn unchanged(level: LogLevel, message: String) -> Self {
        Self {
            table: None,
            level,
            message,
        }
    }
}

/// Resolve the columns an operation acts on.
///
/// `Auto` picks every column accepted by `default`. Explicit names must
/// exist, and when `required` is set they must have that type.
fn resolve_targets(
    table: &DataTable,
    columns: &Columns,
    required: Option<ColumnType>,
    default: impl Fn(&Column) -> bool,
) -> Result<Vec<String>> {
    match columns {
        Columns::Auto => Ok(table
            .columns()
            .iter()
            .filter(|c| default(c))
            .map(|c| c.name().to_string())
            .collect()),
        Columns::Only(names) => {
            for name in names {
                let column = table.require_column(name)?;
                if let Some(expected) = required
                    && column.column_type() != expected
                {
                    return Err(ScourError::ColumnTypeMismatch {
                        column: name.clone(),
                        expected,
                        actual: column.column_type(),
                    });
                }
            }
            Ok(names.clone())
        }
    }
}

/// Remove exact duplicate rows.
pub fn drop_duplicates(table: &DataTable, keep: Keep) -> Result<Step> {
    let keep_mask: Vec<bool> = table
        .duplicated_rows(keep)
        .into_iter()
        .map(|duplicate| !duplicate)
        .collect();
    let removed = keep_mask.iter().filter(|k| !**k).count();

    Ok(Step::changed(
        table.retain_rows(&keep_mask),
        format!("Removed {} duplicate rows (keep={})", removed, keep),
    ))
}

/// Drop or fill missing values in the target columns.
pub fn handle_missing(
    table: &DataTable,
    strategy: &MissingStrategy,
    columns: &Columns,
) -> Result<Step> {
    let targets = resolve_targets(table, columns, None, |_| true)?;

    match strategy {
        MissingStrategy::Drop => drop_missing_rows(table, &targets),
        MissingStrategy::Mean | MissingStrategy::Median | MissingStrategy::Mode => {
            fill_with_statistic(table, strategy, &targets)
        }
        MissingStrategy::Zero => fill_with_literal(table, &Value::Int(0), "zero", &targets),
        MissingStrategy::Custom(Some(value)) => {
            fill_with_literal(table, value, &format!("'{}'", value), &targets)
        }
        MissingStrategy::Custom(None) => Ok(Step::unchanged(
            LogLevel::Warning,
            "Custom fill requested without a value; nothing changed".to_string(),
        )),
    }
}

fn drop_missing_rows(table: &DataTable, targets: &[String]) -> Result<Step> {
    let mut keep = vec![true; table.row_count()];
    for name in targets {
        let mask = table.is_missing(name)?;
        for (k, missing) in keep.iter_mut().zip(mask) {
            if missing {
                *k = false;
            }
        }
    }
    let removed = keep.iter().filter(|k| !**k).count();

    Ok(Step::changed(
        table.retain_rows(&keep),
        format!(
            "Dropped {} rows with missing values in {} column(s)",
            removed,
            targets.len()
        ),
    ))
}

fn fill_with_statistic(
    table: &DataTable,
    strategy: &MissingStrategy,
    targets: &[String],
) -> Result<Step> {
    let mut current = table.clone();
    let mut notes = Vec::new();

    for name in targets {
        let column = current.require_column(name)?;
        let Some(values) = column.numeric_values() else {
            continue;
        };
        let statistic = match strategy {
            MissingStrategy::Mean => stats::mean(&values),
            MissingStrategy::Median => stats::median(&values),
            _ => stats::mode(&values),
        };
        let Some(statistic) = statistic else {
            notes.push(format!("{} has no values, left missing", name));
            continue;
        };
        if let Some((filled, count)) = column.fill_missing(&Value::Float(statistic)) {
            notes.push(format!("{}={} ({} filled)", name, statistic, count));
            current = current.with_column(filled)?;
        }
    }

    let detail = if notes.is_empty() {
        "no numeric columns targeted".to_string()
    } else {
        notes.join(", ")
    };
    Ok(Step::changed(
        current,
        format!("Filled missing values with {}: {}", strategy.label(), detail),
    ))
}

fn fill_with_literal(
    table: &DataTable,
    value: &Value,
    label: &str,
    targets: &[String],
) -> Result<Step> {
    let mut current = table.clone();
    let mut filled_total = 0;
    let mut skipped = Vec::new();

    for name in targets {
        let column = current.require_column(name)?;
        match column.fill_missing(value) {
            Some((filled, count)) => {
                filled_total += count;
                current = current.with_column(filled)?;
            }
            None => skipped.push(name.as_str()),
        }
    }

    let mut message = format!(
        "Filled {} missing values with {} in {} column(s)",
        filled_total,
        label,
        targets.len() - skipped.len()
    );
    if !skipped.is_empty() {
        message.push_str(&format!("; skipped incompatible: {}", skipped.join(", ")));
    }
    Ok(Step::changed(current, message))
}

/// Lowercase, trim and collapse whitespace in text columns.
pub fn normalize_strings(
    table: &DataTable,
    options: &StringNormalization,
    columns: &Columns,
) -> Result<Step> {
    let targets = resolve_targets(table, columns, Some(ColumnType::Text), |c| {
        c.column_type() == ColumnType::Text
    })?;

    let mut current = table.clone();
    let mut changed = 0;
    for name in &targets {
        let column = current.require_column(name)?;
        if let Some((normalized, count)) = normalize_column(column, options) {
            changed += count;
            current = current.with_column(normalized)?;
        }
    }

    Ok(Step::changed(
        current,
        format!(
            "Normalized strings in [{}] (lowercase={}, strip={}, collapse_whitespace={}): {} values changed",
            targets.join(", "),
            options.lowercase,
            options.strip,
            options.collapse_whitespace,
            changed
        ),
    ))
}

fn normalize_column(column: &Column, options: &StringNormalization) -> Option<(Column, usize)> {
    let values = column.text_values()?;
    let mut changed = 0;

    let normalized: Vec<Option<String>> = values
        .iter()
        .map(|cell| {
            let source = cell.as_deref().or(options.missing_placeholder.as_deref());
            let new = source.map(|s| normalize_value(s, options));
            if new.as_deref() != cell.as_deref() {
                changed += 1;
            }
            new
        })
        .collect();

    Some((Column::text(column.name(), normalized), changed))
}

fn normalize_value(value: &str, options: &StringNormalization) -> String {
    let mut out = if options.lowercase {
        value.to_lowercase()
    } else {
        value.to_string()
    };
    if options.strip {
        out = out.trim().to_string();
    }
    if options.collapse_whitespace {
        out = WHITESPACE_RUN.replace_all(&out, " ").into_owned();
    }
    out
}

/// Remove diacritics from text columns.
pub fn strip_accents(table: &DataTable, columns: &Columns) -> Result<Step> {
    let targets = resolve_targets(table, columns, Some(ColumnType::Text), |c| {
        c.column_type() == ColumnType::Text
    })?;

    let mut current = table.clone();
    let mut changed = 0;
    for name in &targets {
        let column = current.require_column(name)?;
        if let Some((stripped, count)) = column.map_text(remove_diacritics) {
            changed += count;
            current = current.with_column(stripped)?;
        }
    }

    Ok(Step::changed(
        current,
        format!(
            "Stripped accents in [{}]: {} values changed",
            targets.join(", "),
            changed
        ),
    ))
}

/// Decompose to NFD and drop combining marks.
pub fn remove_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Apply ordered literal substring replacements to text columns.
pub fn replace_substrings(
    table: &DataTable,
    rules: &[(&str, &str)],
    columns: &Columns,
) -> Result<Step> {
    let targets = resolve_targets(table, columns, Some(ColumnType::Text), |c| {
        c.column_type() == ColumnType::Text
    })?;

    // An empty pattern would match between every character
    let rules: Vec<&(&str, &str)> = rules.iter().filter(|(from, _)| !from.is_empty()).collect();
    if rules.is_empty() {
        return Ok(Step::unchanged(
            LogLevel::Warning,
            "No replacement rules supplied; nothing changed".to_string(),
        ));
    }

    let mut current = table.clone();
    let mut changed = 0;
    for name in &targets {
        let column = current.require_column(name)?;
        let replaced = column.map_text(|s| {
            rules
                .iter()
                .fold(s.to_string(), |acc, (from, to)| acc.replace(from, to))
        });
        if let Some((replaced, count)) = replaced {
            changed += count;
            current = current.with_column(replaced)?;
        }
    }

    let described: Vec<String> = rules
        .iter()
        .map(|(from, to)| format!("'{}' → '{}'", from, to))
        .collect();
    Ok(Step::changed(
        current,
        format!(
            "Replaced substrings in [{}]: {} ({} values changed)",
            targets.join(", "),
            described.join(", "),
            changed
        ),
    ))
}

/// Drop rows outside the IQR fences, one column at a time.
///
/// Each column's fences are computed on the rows that survived the previous
/// columns. Rows whose value is missing fall outside every fence and are
/// dropped; a column with no values at all has no fences and is skipped.
pub fn remove_outliers_iqr(table: &DataTable, columns: &Columns, multiplier: f64) -> Result<Step> {
    let targets = resolve_targets(table, columns, Some(ColumnType::Numeric), |c| {
        c.column_type().is_numeric()
    })?;

    let mut current = table.clone();
    let mut removed_by_column = Vec::new();
    let mut removed_total = 0;

    for name in &targets {
        let values = current.numeric(name)?;
        let Some((lower, upper)) = stats::iqr_bounds(&values, multiplier) else {
            continue;
        };
        let column = current.require_column(name)?;
        let keep: Vec<bool> = (0..current.row_count())
            .map(|row| {
                column
                    .number_at(row)
                    .is_some_and(|v| v >= lower && v <= upper)
            })
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed > 0 {
            removed_by_column.push(format!("{}={}", name, removed));
            removed_total += removed;
            current = current.retain_rows(&keep);
        }
    }

    let mut message = format!(
        "Removed {} outlier rows (IQR × {})",
        removed_total, multiplier
    );
    if !removed_by_column.is_empty() {
        message.push_str(&format!(": {}", removed_by_column.join(", ")));
    }
    Ok(Step::changed(current, message))
}

/// Convert columns to new types.
///
/// In [`ConversionMode::Lenient`] failed columns are left unchanged and the
/// step is logged at error level; in [`ConversionMode::FailFast`] the first
/// failure is returned.
pub fn convert_types(
    table: &DataTable,
    conversions: &[(&str, &str)],
    mode: ConversionMode,
) -> Result<Step> {
    let mut current = table.clone();
    let mut parts = Vec::new();
    let mut failures = 0;

    for (name, target) in conversions {
        let converted = TargetType::parse(target)
            .ok_or_else(|| ScourError::UnsupportedConversion {
                column: name.to_string(),
                target: target.to_string(),
            })
            .and_then(|target| {
                let column = current.require_column(name)?;
                let (column, coerced) = convert_column(column, target)?;
                Ok((column, target, coerced))
            });

        match converted {
            Ok((column, target, coerced)) => {
                current = current.with_column(column)?;
                if coerced > 0 {
                    parts.push(format!(
                        "{} → {} ({} values coerced to missing)",
                        name, target, coerced
                    ));
                } else {
                    parts.push(format!("{} → {}", name, target));
                }
            }
            Err(err) => {
                if mode == ConversionMode::FailFast {
                    return Err(err);
                }
                failures += 1;
                parts.push(format!("{} → {} failed: {}", name, target, err));
            }
        }
    }

    if failures > 0 {
        Ok(Step {
            table: Some(current),
            level: LogLevel::Error,
            message: format!(
                "Type conversion finished with {} error(s): {}",
                failures,
                parts.join("; ")
            ),
        })
    } else {
        Ok(Step::changed(
            current,
            format!("Converted types: {}", parts.join("; ")),
        ))
    }
}

/// Convert one column. Returns the new column and how many present values
/// could not be read and became missing.
fn convert_column(column: &Column, target: TargetType) -> Result<(Column, usize)> {
    let name = column.name();
    match target {
        TargetType::Categorical => Ok((
            Column::categorical(name, (0..column.len()).map(|row| column.display_at(row))),
            0,
        )),
        TargetType::Text => Ok((
            Column::text(name, (0..column.len()).map(|row| column.display_at(row))),
            0,
        )),
        TargetType::Float => {
            let (numbers, coerced) = read_numbers(column);
            Ok((Column::float(name, numbers), coerced))
        }
        TargetType::Integer => {
            if let ColumnData::Integer(values) = column.data() {
                return integers_without_missing(name, values.clone()).map(|c| (c, 0));
            }
            let (numbers, coerced) = read_numbers(column);
            let mut integers = Vec::with_capacity(numbers.len());
            for number in numbers {
                let integer = match number {
                    Some(n) if n.is_finite() && n.abs() < i64::MAX as f64 => Some(n.trunc() as i64),
                    Some(n) => {
                        return Err(ScourError::Conversion {
                            column: name.to_string(),
                            message: format!("{} cannot be stored as an integer", n),
                        });
                    }
                    None => None,
                };
                integers.push(integer);
            }
            integers_without_missing(name, integers).map(|c| (c, coerced))
        }
    }
}

fn integers_without_missing(name: &str, values: Vec<Option<i64>>) -> Result<Column> {
    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        return Err(ScourError::Conversion {
            column: name.to_string(),
            message: format!("{} missing values cannot be stored as integers", missing),
        });
    }
    Ok(Column::integer(name, values))
}

/// Read every cell as a number. Unreadable values become missing.
fn read_numbers(column: &Column) -> (Vec<Option<f64>>, usize) {
    let numbers: Vec<Option<f64>> = match column.data() {
        ColumnData::Integer(v) => v.iter().map(|c| c.map(|n| n as f64)).collect(),
        ColumnData::Float(v) => v.clone(),
        ColumnData::Text(v) | ColumnData::Categorical(v) => v
            .iter()
            .map(|c| {
                c.as_deref()
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .filter(|n| !n.is_nan())
            })
            .collect(),
        ColumnData::Boolean(v) => v
            .iter()
            .map(|c| c.map(|b| if b { 1.0 } else { 0.0 }))
            .collect(),
        ColumnData::DateTime(v) => vec![None; v.len()],
    };

    let present_before = column.len() - column.missing_count();
    let present_after = numbers.iter().filter(|n| n.is_some()).count();
    (numbers, present_before.saturating_sub(present_after))
}
