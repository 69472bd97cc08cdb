//! Integration tests for scour.

use std::io::Write;
use tempfile::NamedTempFile;

use scour::audit::{AuditReport, Grade};
use scour::{
    Auditor, Cleaner, Column, ColumnType, Columns, DataTable, Keep, LogLevel, MissingStrategy,
    Parser, StringNormalization,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const CUSTOMERS: &str = "id,name,age,salary,city\n\
                         101,Alice ,25,2800,Paris\n\
                         102,bob,999,3200,paris\n\
                         101,Alice ,25,2800,Paris\n\
                         104,,30,NA,Lyon\n\
                         105,Élodie,31,3000,Lyon\n";

fn customers() -> DataTable {
    let file = create_test_file(CUSTOMERS);
    Parser::new()
        .parse_file(file.path())
        .expect("Failed to parse customers")
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_parse_infers_column_types() {
    let table = customers();

    assert_eq!(table.row_count(), 5);
    assert_eq!(table.column_names(), vec!["id", "name", "age", "salary", "city"]);
    assert_eq!(table.column("age").unwrap().column_type(), ColumnType::Numeric);
    assert_eq!(table.column("city").unwrap().column_type(), ColumnType::Text);
    assert!(table.column("salary").unwrap().is_missing(3));
    assert!(table.column("name").unwrap().is_missing(3));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Parser::new().parse_file("/nonexistent/customers.csv");
    assert!(matches!(result, Err(scour::ScourError::Io { .. })));
}

// =============================================================================
// Auditing
// =============================================================================

#[test]
fn test_audit_customers() {
    let auditor = Auditor::new(&customers()).expect("Audit failed");
    let report = auditor.report();

    assert_eq!(report.shape.row_count, 5);
    assert_eq!(report.shape.col_count, 5);
    assert_eq!(report.missing_values.total, 2);
    assert_eq!(report.missing_values.percentage, 8.0);
    assert_eq!(report.duplicates.count, 1);
    assert_eq!(report.duplicates.percentage, 20.0);
    assert!(report.high_cardinality.contains_key("name"));
    // Every present string has between 3 and 6 characters
    assert!(report.string_problems.is_empty());
}

#[test]
fn test_whitespace_cells_are_string_problems() {
    let file = create_test_file("s\n\"   \"\nhello\nok\n");
    let table = Parser::new().parse_file(file.path()).expect("Failed to parse");

    assert_eq!(table.column("s").unwrap().missing_count(), 0);
    let report = Auditor::new(&table).expect("Audit failed").report().clone();
    assert_eq!(report.missing_values.total, 0);
    assert_eq!(report.string_problems["s"].empty_or_whitespace, 1);
}

#[test]
fn test_suspect_values_report() {
    let file = create_test_file(
        "id,status,score\n\
         1,active,10\n\
         2,none,NA\n\
         3, N/A ,12\n\
         4,active,13\n",
    );
    let table = Parser::new().parse_file(file.path()).expect("Failed to parse");
    let report = Auditor::new(&table).expect("Audit failed").report().clone();

    assert_eq!(report.clean_columns(), vec!["id"]);
    let order: Vec<&str> = report.suspect_values.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(order, vec!["id", "score", "status"]);

    let score = &report.suspect_values[1];
    assert_eq!((score.missing, score.total, score.percentage), (1, 1, 25.0));
    let status = &report.suspect_values[2];
    assert_eq!((status.none_text, status.null_placeholders), (1, 1));
    assert_eq!(status.total, 2);
    assert_eq!(status.percentage, 50.0);
    assert_eq!(status.grade, Grade::Problematic);

    let text = Auditor::new(&table).unwrap().render();
    assert!(text.contains("Clean columns: id"));
    assert!(text.contains("→ problematic"));
}

#[test]
fn test_audit_zero_rows() {
    let table = Parser::new().parse_str("a,b\n").expect("Failed to parse header");
    assert_eq!(table.row_count(), 0);

    let report = Auditor::new(&table).expect("Audit failed").report().clone();
    assert_eq!(report.missing_values.percentage, 0.0);
    assert_eq!(report.duplicates.percentage, 0.0);
    assert!(report.high_cardinality.is_empty());
    assert!(report.outliers.is_empty());
    assert!(report.suspect_values.iter().all(|s| s.grade == Grade::Perfect));
}

#[test]
fn test_constant_and_low_variance_columns() {
    let rows = 25;
    let table = DataTable::new(vec![
        Column::integer("k", vec![Some(7); rows]),
        Column::text(
            "flag",
            (0..rows).map(|i| Some(if i % 2 == 0 { "yes-ish" } else { "no-ish" })),
        ),
        Column::integer("n", (0..rows as i64).map(Some)),
    ])
    .unwrap();

    let report = Auditor::new(&table).unwrap().report().clone();
    assert_eq!(report.constants, vec!["k"]);
    assert_eq!(report.low_variance.len(), 1);
    assert_eq!(report.low_variance[0].column, "flag");
    assert_eq!(report.low_variance[0].distinct, 2);
    assert!(!report.constants.contains(&"flag".to_string()));
}

#[test]
fn test_report_is_stable_and_serializable() {
    let auditor = Auditor::new(&customers()).unwrap();

    assert_eq!(auditor.render(), auditor.render());
    let json = auditor.report().to_json().unwrap();
    assert_eq!(json, auditor.report().to_json().unwrap());

    let parsed: AuditReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.duplicates.count, 1);
    assert_eq!(parsed.missing_values.worst_column.as_deref(), Some("name"));
}

// =============================================================================
// Cleaning
// =============================================================================

#[test]
fn test_iqr_drops_rows_with_missing_values() {
    let file = create_test_file("id,x\n1,1\n2,2\n3,3\n4,4\n5,5\n6,1000\n7,\n");
    let table = Parser::new().parse_file(file.path()).expect("Failed to parse");
    assert_eq!(table.row_count(), 7);

    let mut cleaner = Cleaner::new(&table).unwrap();
    cleaner.remove_outliers_iqr("x", 1.5).unwrap();
    let cleaned = cleaner.cleaned_view();
    assert_eq!(cleaned.row_count(), 5);
    assert_eq!(cleaned.total_missing(), 0);
}

#[test]
fn test_full_cleaning_chain() {
    let source = customers();
    let mut cleaner = Cleaner::new(&source).expect("Failed to start cleaner");

    cleaner
        .drop_duplicates(Keep::First)
        .unwrap()
        .handle_missing(MissingStrategy::Median, ["age", "salary"])
        .unwrap()
        .normalize_strings(StringNormalization::default(), Columns::Auto)
        .unwrap()
        .strip_accents(Columns::Auto)
        .unwrap()
        .replace_substrings(&[("paris", "Paris")], "city")
        .unwrap()
        .remove_outliers_iqr("age", scour::DEFAULT_IQR_MULTIPLIER)
        .unwrap()
        .convert_types(&[("city", "category"), ("age", "int")])
        .unwrap();

    let log = cleaner.log();
    assert_eq!(log.len(), 7);
    assert!(log.iter().all(|line| line.starts_with('[') && !line.is_empty()));
    assert!(cleaner.entries().iter().all(|e| e.level == LogLevel::Info));

    let table = cleaner.cleaned_view();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.total_missing(), 0);
    assert_eq!(table.duplicate_count(), 0);

    let names: Vec<_> = (0..3)
        .map(|row| table.column("name").unwrap().display_at(row).unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "", "elodie"]);
    assert_eq!(table.column("salary").unwrap().number_at(1), Some(3000.0));

    let city = table.column("city").unwrap();
    assert_eq!(city.column_type(), ColumnType::Categorical);
    assert_eq!(city.display_at(0).as_deref(), Some("Paris"));

    // The caller's table is untouched
    assert_eq!(source, customers());
}

#[test]
fn test_deduplicate_twice_removes_nothing_second_time() {
    let mut cleaner = Cleaner::new(&customers()).unwrap();
    cleaner
        .drop_duplicates(Keep::Last)
        .unwrap()
        .drop_duplicates(Keep::Last)
        .unwrap();

    let log = cleaner.log();
    assert!(log[0].contains("Removed 1 duplicate rows (keep=last)"));
    assert!(log[1].contains("Removed 0 duplicate rows"));
}

#[test]
fn test_conversion_error_is_logged_in_lenient_mode() {
    let mut cleaner = Cleaner::new(&customers()).unwrap();
    cleaner
        .convert_types(&[("salary", "int"), ("id", "category")])
        .unwrap();

    let entry = &cleaner.entries()[0];
    assert_eq!(entry.level, LogLevel::Error);
    assert!(entry.message.contains("salary"));
    assert!(cleaner.log()[0].contains("ERROR:"));

    let table = cleaner.into_table();
    assert_eq!(table.column("salary").unwrap().column_type(), ColumnType::Numeric);
    assert_eq!(table.column("id").unwrap().column_type(), ColumnType::Categorical);
}

#[test]
fn test_summary_reports_remaining_work() {
    let mut cleaner = Cleaner::new(&customers()).unwrap();
    cleaner.drop_duplicates(Keep::First).unwrap().summary();

    let summary = cleaner.summary_text();
    assert!(summary.contains("4 rows × 5 columns"));
    assert!(summary.contains("Missing remaining  : 2"));
    assert!(summary.contains("Duplicates remaining: 0"));
    assert!(summary.contains("Removed 1 duplicate rows"));
    assert_eq!(cleaner.log().len(), 1);
}
