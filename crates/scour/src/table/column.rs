//! Typed column storage.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use super::types::{ColumnType, Value};

/// Values of a column, one variant per storage kind.
///
/// `None` marks a missing cell in every variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    DateTime(Vec<Option<NaiveDateTime>>),
    Categorical(Vec<Option<String>>),
}

/// Hashable view of one cell, used for distinct counts and row identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Missing,
    Int(i64),
    Float(u64),
    Text(&'a str),
    Bool(bool),
    DateTime(NaiveDateTime),
}

fn float_key(value: f64) -> u64 {
    // -0.0 and 0.0 are the same value
    if value == 0.0 { 0.0_f64.to_bits() } else { value.to_bits() }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from raw storage.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        let data = match data {
            ColumnData::Float(values) => ColumnData::Float(normalize_floats(values)),
            other => other,
        };
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create an integer column.
    pub fn integer(name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::new(name, ColumnData::Integer(values.into_iter().collect()))
    }

    /// Create a float column. NaN values are stored as missing.
    pub fn float(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values.into_iter().collect()))
    }

    /// Create a text column.
    pub fn text<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    /// Create a categorical column.
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    /// Create a boolean column.
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values.into_iter().collect()))
    }

    /// Create a datetime column.
    pub fn datetime(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        Self::new(name, ColumnData::DateTime(values.into_iter().collect()))
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying storage.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Declared type tag.
    pub fn column_type(&self) -> ColumnType {
        match self.data {
            ColumnData::Integer(_) | ColumnData::Float(_) => ColumnType::Numeric,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Boolean(_) => ColumnType::Boolean,
            ColumnData::DateTime(_) => ColumnType::DateTime,
            ColumnData::Categorical(_) => ColumnType::Categorical,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) | ColumnData::Categorical(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
        }
    }

    /// Whether the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cell at `row` is missing (out-of-range rows count as missing).
    pub fn is_missing(&self, row: usize) -> bool {
        matches!(self.key(row), CellKey::Missing)
    }

    /// Missing mask, one entry per row.
    pub fn missing_mask(&self) -> Vec<bool> {
        (0..self.len()).map(|row| self.is_missing(row)).collect()
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_missing(row)).count()
    }

    /// Number of distinct non-missing values.
    pub fn unique_count(&self) -> usize {
        (0..self.len())
            .map(|row| self.key(row))
            .filter(|key| !matches!(key, CellKey::Missing))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Numeric value at `row`, for numeric columns.
    pub fn number_at(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(|n| n as f64),
            ColumnData::Float(v) => v.get(row).copied().flatten(),
            ColumnData::Text(_)
            | ColumnData::Categorical(_)
            | ColumnData::Boolean(_)
            | ColumnData::DateTime(_) => None,
        }
    }

    /// Non-missing values as floats, or `None` if the column is not numeric.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        if !self.column_type().is_numeric() {
            return None;
        }
        Some((0..self.len()).filter_map(|row| self.number_at(row)).collect())
    }

    /// String form of the cell at `row`, or `None` when missing.
    pub fn display_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(|n| n.to_string()),
            ColumnData::Float(v) => v.get(row).copied().flatten().map(|n| n.to_string()),
            ColumnData::Text(v) | ColumnData::Categorical(v) => v.get(row).cloned().flatten(),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map(|b| b.to_string()),
            ColumnData::DateTime(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Text values, for text columns only.
    pub fn text_values(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn key(&self, row: usize) -> CellKey<'_> {
        let key = match &self.data {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(CellKey::Int),
            ColumnData::Float(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|f| CellKey::Float(float_key(f))),
            ColumnData::Text(v) | ColumnData::Categorical(v) => v
                .get(row)
                .and_then(|s| s.as_deref())
                .map(CellKey::Text),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map(CellKey::Bool),
            ColumnData::DateTime(v) => v.get(row).copied().flatten().map(CellKey::DateTime),
        };
        key.unwrap_or(CellKey::Missing)
    }

    /// Copy of the column keeping only rows where `keep` is true.
    pub fn retain_rows(&self, keep: &[bool]) -> Column {
        fn pick<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| v.clone())
                .collect()
        }

        let data = match &self.data {
            ColumnData::Integer(v) => ColumnData::Integer(pick(v, keep)),
            ColumnData::Float(v) => ColumnData::Float(pick(v, keep)),
            ColumnData::Text(v) => ColumnData::Text(pick(v, keep)),
            ColumnData::Boolean(v) => ColumnData::Boolean(pick(v, keep)),
            ColumnData::DateTime(v) => ColumnData::DateTime(pick(v, keep)),
            ColumnData::Categorical(v) => ColumnData::Categorical(pick(v, keep)),
        };
        Column::new(self.name.clone(), data)
    }

    /// Copy of the column with missing cells replaced by `value`.
    ///
    /// Returns the new column and the number of filled cells, or `None` when
    /// `value` cannot be stored in this column. Text and categorical columns
    /// take any value in its string form; an integer column receiving a
    /// non-integral number becomes a float column.
    pub fn fill_missing(&self, value: &Value) -> Option<(Column, usize)> {
        let filled = self.missing_count();
        let data = match (&self.data, value) {
            (ColumnData::Integer(v), Value::Int(n)) => {
                ColumnData::Integer(v.iter().map(|c| c.or(Some(*n))).collect())
            }
            (ColumnData::Integer(v), Value::Float(f)) if f.fract() == 0.0 && f.is_finite() => {
                let n = *f as i64;
                ColumnData::Integer(v.iter().map(|c| c.or(Some(n))).collect())
            }
            (ColumnData::Integer(v), Value::Float(f)) => ColumnData::Float(
                v.iter()
                    .map(|c| c.map(|n| n as f64).or(Some(*f)))
                    .collect(),
            ),
            (ColumnData::Float(v), Value::Int(_) | Value::Float(_)) => {
                let f = value.as_f64()?;
                ColumnData::Float(v.iter().map(|c| c.or(Some(f))).collect())
            }
            (ColumnData::Text(v), _) => {
                let s = value.to_string();
                ColumnData::Text(v.iter().map(|c| c.clone().or_else(|| Some(s.clone()))).collect())
            }
            (ColumnData::Categorical(v), _) => {
                let s = value.to_string();
                ColumnData::Categorical(
                    v.iter().map(|c| c.clone().or_else(|| Some(s.clone()))).collect(),
                )
            }
            (ColumnData::Boolean(v), Value::Bool(b)) => {
                ColumnData::Boolean(v.iter().map(|c| c.or(Some(*b))).collect())
            }
            (ColumnData::DateTime(v), Value::DateTime(d)) => {
                ColumnData::DateTime(v.iter().map(|c| c.or(Some(*d))).collect())
            }
            _ => return None,
        };
        Some((Column::new(self.name.clone(), data), filled))
    }

    /// Apply `f` to every non-missing text value.
    ///
    /// Returns the new column and how many values changed, or `None` when
    /// the column is not a text column.
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> Option<(Column, usize)> {
        let values = self.text_values()?;
        let mut changed = 0;
        let mapped = values
            .iter()
            .map(|cell| {
                cell.as_deref().map(|s| {
                    let new = f(s);
                    if new != s {
                        changed += 1;
                    }
                    new
                })
            })
            .collect();
        Some((Column::new(self.name.clone(), ColumnData::Text(mapped)), changed))
    }
}

fn normalize_floats(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| v.filter(|f| !f.is_nan()))
        .collect()
}
