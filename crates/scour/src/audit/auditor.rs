//! Read-only table auditor.

use std::fmt;

use tracing::debug;

use crate::error::{Result, ScourError};
use crate::table::DataTable;

use super::checks;
use super::config::AuditConfig;
use super::render::render;
use super::report::AuditReport;

/// Profiles a table for structural and statistical defects.
///
/// The auditor keeps its own copy of the table and computes the full
/// [`AuditReport`] once, at construction. There is no way to re-run it.
#[derive(Debug, Clone)]
pub struct Auditor {
    table: DataTable,
    config: AuditConfig,
    report: AuditReport,
}

impl Auditor {
    /// Audit a table with the default configuration.
    ///
    /// Fails with [`ScourError::EmptySchema`] if the table has no columns.
    pub fn new(table: &DataTable) -> Result<Self> {
        Self::with_config(table, AuditConfig::default())
    }

    /// Audit a table with a custom configuration.
    pub fn with_config(table: &DataTable, config: AuditConfig) -> Result<Self> {
        if table.column_count() == 0 {
            return Err(ScourError::EmptySchema);
        }

        let table = table.clone();
        let report = run_audit(&table, &config);

        Ok(Self {
            table,
            config,
            report,
        })
    }

    /// The full report.
    pub fn report(&self) -> &AuditReport {
        &self.report
    }

    /// The audited copy of the table.
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Thresholds the report was computed with.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Render the report as text.
    pub fn render(&self) -> String {
        render(&self.report)
    }
}

impl fmt::Display for Auditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.report, f)
    }
}

fn run_audit(table: &DataTable, config: &AuditConfig) -> AuditReport {
    let shape = checks::shape(table);
    let (dtypes_count, columns_by_type) = checks::types(table);

    let missing_values = checks::missing_values(table);
    debug!(total = missing_values.total, "missing value check done");

    let duplicates = checks::duplicates(table);
    debug!(count = duplicates.count, "duplicate check done");

    let (constants, low_variance) = checks::constants_and_low_variance(table, config);
    debug!(
        constants = constants.len(),
        low_variance = low_variance.len(),
        "variance check done"
    );

    let outliers = checks::outliers(table, config);
    debug!(columns = outliers.len(), "outlier check done");

    let high_cardinality = checks::high_cardinality(table, config);
    let string_problems = checks::string_problems(table, config);
    debug!(
        high_cardinality = high_cardinality.len(),
        string_problems = string_problems.len(),
        "text checks done"
    );

    let suspect_values = checks::suspect_values(table);
    debug!(
        clean_columns = suspect_values.iter().filter(|s| s.total == 0).count(),
        "suspect value check done"
    );

    AuditReport {
        shape,
        dtypes_count,
        columns_by_type,
        missing_values,
        duplicates,
        constants,
        low_variance,
        outliers,
        high_cardinality,
        string_problems,
        suspect_values,
    }
}
