//! Chainable table cleaner with an operation log.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{Result, ScourError};
use crate::table::{DataTable, Keep};

use super::log::{LogEntry, LogLevel, Operation, OperationLog};
use super::operations::{self, Step};
use super::options::{CleanerConfig, Columns, ConversionMode, MissingStrategy, StringNormalization};

/// Applies cleaning operations to a private copy of a table.
///
/// Every operation appends exactly one entry to the log, including failed
/// ones. A failing operation leaves the table as it was.
///
/// ```ignore
/// let mut cleaner = Cleaner::new(&table)?;
/// cleaner
///     .drop_duplicates(Keep::First)?
///     .handle_missing(MissingStrategy::Median, ["age", "salary"])?
///     .normalize_strings(StringNormalization::default(), Columns::Auto)?;
/// let cleaned = cleaner.into_table();
/// ```
#[derive(Debug, Clone)]
pub struct Cleaner {
    table: DataTable,
    config: CleanerConfig,
    log: OperationLog,
}

impl Cleaner {
    /// Start a session with the default configuration.
    pub fn new(table: &DataTable) -> Result<Self> {
        Self::with_config(table, CleanerConfig::default())
    }

    /// Start a session with a custom configuration.
    pub fn with_config(table: &DataTable, config: CleanerConfig) -> Result<Self> {
        if table.column_count() == 0 {
            return Err(ScourError::EmptySchema);
        }
        Ok(Self {
            table: table.clone(),
            config,
            log: OperationLog::default(),
        })
    }

    /// Remove exact duplicate rows.
    pub fn drop_duplicates(&mut self, keep: Keep) -> Result<&mut Self> {
        let step = operations::drop_duplicates(&self.table, keep);
        self.commit(Operation::DropDuplicates, step)
    }

    /// Drop or fill missing values.
    pub fn handle_missing(
        &mut self,
        strategy: MissingStrategy,
        columns: impl Into<Columns>,
    ) -> Result<&mut Self> {
        let step = operations::handle_missing(&self.table, &strategy, &columns.into());
        self.commit(Operation::HandleMissing, step)
    }

    /// Normalise case and whitespace in text columns.
    pub fn normalize_strings(
        &mut self,
        options: StringNormalization,
        columns: impl Into<Columns>,
    ) -> Result<&mut Self> {
        let step = operations::normalize_strings(&self.table, &options, &columns.into());
        self.commit(Operation::NormalizeStrings, step)
    }

    /// Remove diacritics from text columns.
    pub fn strip_accents(&mut self, columns: impl Into<Columns>) -> Result<&mut Self> {
        let step = operations::strip_accents(&self.table, &columns.into());
        self.commit(Operation::StripAccents, step)
    }

    /// Apply ordered literal replacements to text columns.
    pub fn replace_substrings(
        &mut self,
        rules: &[(&str, &str)],
        columns: impl Into<Columns>,
    ) -> Result<&mut Self> {
        let step = operations::replace_substrings(&self.table, rules, &columns.into());
        self.commit(Operation::ReplaceSubstrings, step)
    }

    /// Drop rows outside the IQR fences of each target column, in order.
    pub fn remove_outliers_iqr(
        &mut self,
        columns: impl Into<Columns>,
        multiplier: f64,
    ) -> Result<&mut Self> {
        let step = operations::remove_outliers_iqr(&self.table, &columns.into(), multiplier);
        self.commit(Operation::RemoveOutliers, step)
    }

    /// Convert columns using the configured [`ConversionMode`].
    pub fn convert_types(&mut self, conversions: &[(&str, &str)]) -> Result<&mut Self> {
        let mode = self.config.conversion_mode;
        self.convert_types_with(conversions, mode)
    }

    /// Convert columns with an explicit [`ConversionMode`].
    pub fn convert_types_with(
        &mut self,
        conversions: &[(&str, &str)],
        mode: ConversionMode,
    ) -> Result<&mut Self> {
        let step = operations::convert_types(&self.table, conversions, mode);
        self.commit(Operation::ConvertTypes, step)
    }

    /// Log lines, oldest first. Empty if nothing ran.
    pub fn log(&self) -> Vec<String> {
        self.log.lines()
    }

    /// Structured log entries.
    pub fn entries(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// Log as one block of text.
    pub fn log_text(&self) -> String {
        self.log.text()
    }

    /// The current state of the table.
    pub fn cleaned_view(&self) -> &DataTable {
        &self.table
    }

    /// Finish the session and take the cleaned table.
    pub fn into_table(self) -> DataTable {
        self.table
    }

    /// Session configuration.
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Emit the summary at info level. Does not touch the log.
    pub fn summary(&mut self) -> &mut Self {
        info!("\n{}", self.summary_text());
        self
    }

    /// Dimensions, what is left to clean, and the full log.
    pub fn summary_text(&self) -> String {
        self.to_string()
    }

    fn commit(&mut self, operation: Operation, step: Result<Step>) -> Result<&mut Self> {
        match step {
            Ok(step) => {
                match step.level {
                    LogLevel::Info => debug!(operation = operation.label(), "{}", step.message),
                    LogLevel::Warning | LogLevel::Error => {
                        warn!(operation = operation.label(), "{}", step.message)
                    }
                }
                if let Some(table) = step.table {
                    self.table = table;
                }
                self.log.push(LogEntry::new(operation, step.level, step.message));
                Ok(self)
            }
            Err(err) => {
                warn!(operation = operation.label(), error = %err, "operation failed");
                self.log.push(LogEntry::new(
                    operation,
                    LogLevel::Error,
                    format!("{} failed: {}", operation.label(), err),
                ));
                Err(err)
            }
        }
    }
}

impl fmt::Display for Cleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);

        writeln!(f, "{}", rule)?;
        writeln!(f, "CLEANING SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Dimensions         : {} rows × {} columns",
            self.table.row_count(),
            self.table.column_count()
        )?;
        writeln!(f, "Missing remaining  : {}", self.table.total_missing())?;
        writeln!(f, "Duplicates remaining: {}", self.table.duplicate_count())?;
        writeln!(f, "\nOperations:")?;
        writeln!(f, "{}", self.log.text())?;
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnType};

    fn people() -> DataTable {
        DataTable::new(vec![
            Column::integer("id", vec![Some(1), Some(2), Some(1), Some(4)]),
            Column::text("name", vec![Some("  José  "), Some("bob"), Some("  José  "), None]),
            Column::float("salary", vec![Some(2800.0), None, Some(2800.0), Some(3100.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_schema() {
        assert!(matches!(
            Cleaner::new(&DataTable::default()),
            Err(ScourError::EmptySchema)
        ));
    }

    #[test]
    fn test_chain_logs_one_entry_per_operation() {
        let table = people();
        let mut cleaner = Cleaner::new(&table).unwrap();
        cleaner
            .drop_duplicates(Keep::First)
            .unwrap()
            .handle_missing(MissingStrategy::Mean, Columns::Auto)
            .unwrap()
            .normalize_strings(StringNormalization::default(), Columns::Auto)
            .unwrap()
            .strip_accents(Columns::Auto)
            .unwrap();

        let log = cleaner.log();
        assert_eq!(log.len(), 4);
        assert!(log.iter().all(|line| !line.is_empty()));
        assert!(log[0].contains("Removed 1 duplicate rows (keep=first)"));
        assert_eq!(cleaner.entries()[3].operation, Operation::StripAccents);

        let cleaned = cleaner.cleaned_view();
        assert_eq!(cleaned.row_count(), 3);
        assert_eq!(cleaned.column("name").unwrap().display_at(0).as_deref(), Some("jose"));
        // Missing name replaced by the empty placeholder
        assert_eq!(cleaned.column("name").unwrap().display_at(2).as_deref(), Some(""));
        assert_eq!(cleaned.column("salary").unwrap().number_at(1), Some(2950.0));

        // Source untouched
        assert_eq!(table, people());
    }

    #[test]
    fn test_failure_is_logged_and_keeps_table() {
        let mut cleaner = Cleaner::new(&people()).unwrap();
        let result = cleaner.strip_accents("salary").map(|_| ());
        assert!(matches!(result, Err(ScourError::ColumnTypeMismatch { .. })));

        assert_eq!(cleaner.entries().len(), 1);
        assert_eq!(cleaner.entries()[0].level, LogLevel::Error);
        assert!(cleaner.log()[0].contains("ERROR: Strip accents failed"));
        assert_eq!(cleaner.cleaned_view(), &people());
    }

    #[test]
    fn test_fail_fast_conversion() {
        let config = CleanerConfig::default().with_conversion_mode(ConversionMode::FailFast);
        let mut cleaner = Cleaner::with_config(&people(), config).unwrap();
        let result = cleaner.convert_types(&[("salary", "int")]).map(|_| ());
        assert!(matches!(result, Err(ScourError::Conversion { .. })));
        assert_eq!(
            cleaner.cleaned_view().column("salary").unwrap().column_type(),
            ColumnType::Numeric
        );
    }

    #[test]
    fn test_summary_does_not_log() {
        let mut cleaner = Cleaner::new(&people()).unwrap();
        assert_eq!(cleaner.log_text(), "No operations performed.");
        cleaner.summary();
        assert!(cleaner.log().is_empty());

        let text = cleaner.summary_text();
        assert!(text.contains("Dimensions         : 4 rows × 3 columns"));
        assert!(text.contains("Missing remaining  : 2"));
        assert!(text.contains("Duplicates remaining: 1"));
        assert!(text.contains("No operations performed."));
        assert_eq!(text, cleaner.to_string());
        assert!(text.starts_with(&"=".repeat(60)));
        assert!(text.ends_with(&"=".repeat(60)));
    }
}
