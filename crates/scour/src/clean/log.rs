//! Append-only record of cleaning operations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cleaning operation that produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    DropDuplicates,
    HandleMissing,
    NormalizeStrings,
    StripAccents,
    ReplaceSubstrings,
    RemoveOutliers,
    ConvertTypes,
}

impl Operation {
    /// Get a human-readable label for the operation.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::DropDuplicates => "Drop duplicates",
            Operation::HandleMissing => "Handle missing",
            Operation::NormalizeStrings => "Normalize strings",
            Operation::StripAccents => "Strip accents",
            Operation::ReplaceSubstrings => "Replace substrings",
            Operation::RemoveOutliers => "Remove outliers",
            Operation::ConvertTypes => "Convert types",
        }
    }
}

/// Outcome class of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// The operation ran.
    Info,
    /// The operation ran as a no-op because a parameter was missing.
    Warning,
    /// The operation failed for at least one column.
    Error,
}

/// One timestamped log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub(crate) fn new(operation: Operation, level: LogLevel, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            level,
            message,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        if self.level == LogLevel::Error {
            f.write_str("ERROR: ")?;
        }
        f.write_str(&self.message)
    }
}

/// Ordered history of a cleaning session. Entries can only be appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationLog {
    entries: Vec<LogEntry>,
}

impl OperationLog {
    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries rendered as `[timestamp] message` lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Entries joined by newlines, or a placeholder when empty.
    pub fn text(&self) -> String {
        if self.entries.is_empty() {
            "No operations performed.".to_string()
        } else {
            self.lines().join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_format() {
        let entry = LogEntry::new(Operation::ConvertTypes, LogLevel::Error, "boom".to_string());
        let line = entry.to_string();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] ERROR: boom"));
        // [YYYY-MM-DD HH:MM:SS]
        assert_eq!(line.find(']'), Some(20));
    }

    #[test]
    fn test_empty_log_text() {
        let log = OperationLog::default();
        assert!(log.lines().is_empty());
        assert_eq!(log.text(), "No operations performed.");
    }
}
