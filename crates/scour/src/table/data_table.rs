//! In-memory typed table.

use std::collections::HashSet;

use crate::error::{Result, ScourError};

use super::column::{CellKey, Column};
use super::stats;
use super::types::{ColumnType, Keep};

/// A typed, columnar, row-aligned table.
///
/// Column names are unique and every column has the same number of rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl DataTable {
    /// Create a table from columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ScourError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != row_count {
                return Err(ScourError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// All column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Get the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Get a column by name or fail with [`ScourError::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| ScourError::ColumnNotFound(name.to_string()))
    }

    /// Names of the columns with the given type tag.
    pub fn columns_of_type(&self, column_type: ColumnType) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.column_type() == column_type)
            .map(Column::name)
            .collect()
    }

    /// Missing mask for a column.
    pub fn is_missing(&self, name: &str) -> Result<Vec<bool>> {
        Ok(self.require_column(name)?.missing_mask())
    }

    /// Number of distinct non-missing values in a column.
    pub fn unique_count(&self, name: &str) -> Result<usize> {
        Ok(self.require_column(name)?.unique_count())
    }

    /// Quantile `q` (0.0-1.0) of a numeric column, `None` if it has no values.
    pub fn quantile(&self, name: &str, q: f64) -> Result<Option<f64>> {
        Ok(stats::quantile(&self.numeric(name)?, q))
    }

    /// Mean of a numeric column.
    pub fn mean(&self, name: &str) -> Result<Option<f64>> {
        Ok(stats::mean(&self.numeric(name)?))
    }

    /// Population standard deviation of a numeric column.
    pub fn std_population(&self, name: &str) -> Result<Option<f64>> {
        Ok(stats::std_population(&self.numeric(name)?))
    }

    /// Minimum of a numeric column.
    pub fn min(&self, name: &str) -> Result<Option<f64>> {
        Ok(stats::min(&self.numeric(name)?))
    }

    /// Maximum of a numeric column.
    pub fn max(&self, name: &str) -> Result<Option<f64>> {
        Ok(stats::max(&self.numeric(name)?))
    }

    /// Non-missing values of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.require_column(name)?;
        column
            .numeric_values()
            .ok_or_else(|| ScourError::ColumnTypeMismatch {
                column: name.to_string(),
                expected: ColumnType::Numeric,
                actual: column.column_type(),
            })
    }

    /// Flag rows that exactly repeat another row.
    ///
    /// With [`Keep::First`] the first occurrence is unflagged; with
    /// [`Keep::Last`] the last one is. Missing cells compare equal.
    pub fn duplicated_rows(&self, keep: Keep) -> Vec<bool> {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(self.row_count);
        let mut flags = vec![false; self.row_count];

        let order: Box<dyn Iterator<Item = usize>> = match keep {
            Keep::First => Box::new(0..self.row_count),
            Keep::Last => Box::new((0..self.row_count).rev()),
        };

        for row in order {
            if !seen.insert(self.row_key(row)) {
                flags[row] = true;
            }
        }

        flags
    }

    /// Number of rows that repeat an earlier row.
    pub fn duplicate_count(&self) -> usize {
        self.duplicated_rows(Keep::First).iter().filter(|d| **d).count()
    }

    /// Missing cells per row.
    pub fn missing_per_row(&self) -> Vec<usize> {
        (0..self.row_count)
            .map(|row| self.columns.iter().filter(|c| c.is_missing(row)).count())
            .collect()
    }

    /// Total missing cells.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// Copy of the table keeping only rows where `keep` is true.
    pub fn retain_rows(&self, keep: &[bool]) -> DataTable {
        let columns: Vec<Column> = self.columns.iter().map(|c| c.retain_rows(keep)).collect();
        let row_count = keep
            .iter()
            .take(self.row_count)
            .filter(|k| **k)
            .count();
        DataTable { columns, row_count }
    }

    /// Copy of the table with one column swapped for a same-named replacement.
    pub(crate) fn with_column(&self, column: Column) -> Result<DataTable> {
        let index = self
            .column_index(column.name())
            .ok_or_else(|| ScourError::ColumnNotFound(column.name().to_string()))?;
        if column.len() != self.row_count {
            return Err(ScourError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.row_count,
                actual: column.len(),
            });
        }
        let mut columns = self.columns.clone();
        columns[index] = column;
        Ok(DataTable {
            columns,
            row_count: self.row_count,
        })
    }

    fn row_key(&self, row: usize) -> Vec<CellKey<'_>> {
        self.columns.iter().map(|c| c.key(row)).collect()
    }
}
