//! Plain-text rendering of an audit report.

use std::fmt::{self, Write};

use super::report::AuditReport;

const WIDTH: usize = 80;

/// Render a report as a deterministic multi-section text block.
///
/// Sections with nothing to say are omitted, except shape, types,
/// duplicates and suspect values which always appear.
pub fn render(report: &AuditReport) -> String {
    report.to_string()
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self)
    }
}

fn write_report(out: &mut impl Write, report: &AuditReport) -> fmt::Result {
    let rule = "═".repeat(WIDTH);

    writeln!(out, "{}", rule)?;
    writeln!(out, "{:^width$}", " DATA QUALITY AUDIT ", width = WIDTH)?;
    writeln!(out, "{}", rule)?;

    writeln!(
        out,
        "\nShape: {} rows × {} columns",
        report.shape.row_count, report.shape.col_count
    )?;
    writeln!(out, "Column types:")?;
    for (column_type, names) in &report.columns_by_type {
        if !names.is_empty() {
            writeln!(out, "  • {:<12} {:3} columns", column_type.label(), names.len())?;
        }
    }

    let missing = &report.missing_values;
    if missing.total > 0 {
        writeln!(out, "\nMissing values:")?;
        writeln!(out, "  Total: {} ({:.1}%)", missing.total, missing.percentage)?;
        if let Some(ref worst) = missing.worst_column {
            writeln!(out, "  Worst column: {} ({} missing)", worst, missing.worst_count)?;
        }
    }

    writeln!(out, "\nDuplicates & constants:")?;
    writeln!(
        out,
        "  Exact duplicates: {} ({:.1}%)",
        report.duplicates.count, report.duplicates.percentage
    )?;
    if !report.constants.is_empty() {
        writeln!(out, "  Constant columns: {}", report.constants.join(", "))?;
    }
    if !report.low_variance.is_empty() {
        let names: Vec<String> = report
            .low_variance
            .iter()
            .map(|lv| format!("{} ({})", lv.column, lv.distinct))
            .collect();
        writeln!(out, "  Low variance: {}", names.join(", "))?;
    }

    let flagged: Vec<_> = report
        .outliers
        .iter()
        .filter(|(_, o)| o.iqr_count > 0 || o.z_score_count > 0)
        .collect();
    if !flagged.is_empty() {
        writeln!(out, "\nOutliers (IQR fences & z-score):")?;
        for (column, info) in flagged {
            writeln!(
                out,
                "  • {:<18} IQR: {:3} | z: {:3} | range: {:.2} → {:.2}",
                column, info.iqr_count, info.z_score_count, info.min, info.max
            )?;
        }
    }

    if !report.high_cardinality.is_empty() {
        writeln!(out, "\nHigh cardinality (likely identifiers):")?;
        for (column, info) in &report.high_cardinality {
            writeln!(
                out,
                "  • {:<20} {} unique ({:.1}%)",
                column,
                info.unique_count,
                info.ratio * 100.0
            )?;
        }
    }

    if !report.string_problems.is_empty() {
        writeln!(out, "\nString problems:")?;
        for (column, issues) in &report.string_problems {
            writeln!(
                out,
                "  • {:<20} empty: {:3} | very long: {:3} | very short: {:3}",
                column, issues.empty_or_whitespace, issues.very_long, issues.very_short
            )?;
        }
    }

    write_suspect_values(out, report)?;

    writeln!(out, "\n{}", rule)
}

fn write_suspect_values(out: &mut impl Write, report: &AuditReport) -> fmt::Result {
    writeln!(out, "\nSuspect values per column:")?;

    let clean = report.clean_columns();
    if clean.is_empty() {
        writeln!(out, "  Clean columns: none")?;
    } else {
        writeln!(out, "  Clean columns: {}", clean.join(", "))?;
    }

    for suspect in report.suspect_values.iter().filter(|s| s.total > 0) {
        writeln!(
            out,
            "  • {:<20} {:4} ({:5.1}%) missing: {} | empty: {} | none: {} | na/null: {} → {}",
            suspect.column,
            suspect.total,
            suspect.percentage,
            suspect.missing,
            suspect.empty,
            suspect.none_text,
            suspect.null_placeholders,
            suspect.grade.label()
        )?;
    }

    Ok(())
}
