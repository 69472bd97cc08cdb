//! Individual audit checks.
//!
//! Each check reads the table and produces one report section. Checks are
//! independent of each other; only the row count is shared.

use indexmap::IndexMap;

use crate::table::{Column, ColumnType, DataTable, stats};

use super::config::AuditConfig;
use super::report::{
    Cardinality, Duplicates, Grade, LowVariance, MissingValues, OutlierSummary, Shape,
    StringProblems, SuspectValues,
};

/// `part / whole * 100`, or 0 when `whole` is 0.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Whether outlier analysis applies to a column type.
fn supports_outliers(column_type: ColumnType) -> bool {
    match column_type {
        ColumnType::Numeric => true,
        ColumnType::Text | ColumnType::Boolean | ColumnType::DateTime | ColumnType::Categorical => {
            false
        }
    }
}

/// Whether cardinality analysis applies to a column type.
fn supports_cardinality(column_type: ColumnType) -> bool {
    match column_type {
        ColumnType::Text | ColumnType::Categorical => true,
        ColumnType::Numeric | ColumnType::Boolean | ColumnType::DateTime => false,
    }
}

/// Whether string heuristics apply to a column type.
fn supports_string_checks(column_type: ColumnType) -> bool {
    match column_type {
        ColumnType::Text => true,
        ColumnType::Numeric
        | ColumnType::Boolean
        | ColumnType::DateTime
        | ColumnType::Categorical => false,
    }
}

/// Table dimensions.
pub fn shape(table: &DataTable) -> Shape {
    Shape {
        row_count: table.row_count(),
        col_count: table.column_count(),
    }
}

/// Column counts and names per type tag.
pub fn types(
    table: &DataTable,
) -> (IndexMap<ColumnType, usize>, IndexMap<ColumnType, Vec<String>>) {
    let mut by_type: IndexMap<ColumnType, Vec<String>> = ColumnType::ALL
        .iter()
        .map(|t| (*t, Vec::new()))
        .collect();

    for column in table.columns() {
        by_type
            .entry(column.column_type())
            .or_default()
            .push(column.name().to_string());
    }

    let counts = by_type
        .iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(t, names)| (*t, names.len()))
        .collect();

    (counts, by_type)
}

/// Missing-value totals and per-column counts.
pub fn missing_values(table: &DataTable) -> MissingValues {
    let mut by_column: Vec<(String, usize)> = table
        .columns()
        .iter()
        .map(|c| (c.name().to_string(), c.missing_count()))
        .filter(|(_, count)| *count > 0)
        .collect();
    // Stable sort keeps column order among equal counts
    by_column.sort_by(|a, b| b.1.cmp(&a.1));

    let total = by_column.iter().map(|(_, count)| count).sum();
    let cells = table.row_count() * table.column_count();
    let (worst_column, worst_count) = by_column
        .first()
        .map(|(name, count)| (Some(name.clone()), *count))
        .unwrap_or((None, 0));

    MissingValues {
        total,
        percentage: percentage(total, cells),
        by_column: by_column.into_iter().collect(),
        worst_column,
        worst_count,
    }
}

/// Exact duplicate rows, first occurrence kept.
pub fn duplicates(table: &DataTable) -> Duplicates {
    let count = table.duplicate_count();
    Duplicates {
        count,
        percentage: percentage(count, table.row_count()),
    }
}

/// Constant and low-variance columns.
pub fn constants_and_low_variance(
    table: &DataTable,
    config: &AuditConfig,
) -> (Vec<String>, Vec<LowVariance>) {
    let mut constants = Vec::new();
    let mut low_variance = Vec::new();
    let enough_rows = table.row_count() > config.low_variance_min_rows;

    for column in table.columns() {
        let distinct = column.unique_count();
        if distinct <= 1 {
            constants.push(column.name().to_string());
        } else if enough_rows && distinct <= config.low_variance_max_distinct {
            low_variance.push(LowVariance {
                column: column.name().to_string(),
                distinct,
            });
        }
    }

    (constants, low_variance)
}

/// Number of values strictly outside `[Q1 - k*IQR, Q3 + k*IQR]`.
pub fn iqr_outlier_count(values: &[f64], multiplier: f64) -> usize {
    let Some((lower, upper)) = stats::iqr_bounds(values, multiplier) else {
        return 0;
    };
    values.iter().filter(|v| **v < lower || **v > upper).count()
}

/// Number of values whose population z-score exceeds `threshold` in magnitude.
pub fn z_score_outlier_count(values: &[f64], threshold: f64) -> usize {
    let (Some(mean), Some(std)) = (stats::mean(values), stats::std_population(values)) else {
        return 0;
    };
    if std == 0.0 {
        return 0;
    }
    values
        .iter()
        .filter(|v| ((**v - mean) / std).abs() > threshold)
        .count()
}

/// IQR and z-score outliers for numeric columns with enough distinct values.
pub fn outliers(table: &DataTable, config: &AuditConfig) -> IndexMap<String, OutlierSummary> {
    table
        .columns()
        .iter()
        .filter(|c| supports_outliers(c.column_type()))
        .filter(|c| c.unique_count() >= config.outlier_min_distinct)
        .filter_map(|c| {
            let values = c.numeric_values()?;
            let summary = OutlierSummary {
                iqr_count: iqr_outlier_count(&values, config.iqr_multiplier),
                z_score_count: z_score_outlier_count(&values, config.z_score_threshold),
                min: stats::min(&values)?,
                max: stats::max(&values)?,
            };
            Some((c.name().to_string(), summary))
        })
        .collect()
}

/// Text and categorical columns whose distinct/row ratio exceeds the threshold.
pub fn high_cardinality(table: &DataTable, config: &AuditConfig) -> IndexMap<String, Cardinality> {
    let rows = table.row_count();
    if rows == 0 {
        return IndexMap::new();
    }

    table
        .columns()
        .iter()
        .filter(|c| supports_cardinality(c.column_type()))
        .filter_map(|c| {
            let unique_count = c.unique_count();
            let ratio = unique_count as f64 / rows as f64;
            (ratio > config.high_cardinality_ratio).then(|| {
                (
                    c.name().to_string(),
                    Cardinality {
                        unique_count,
                        ratio: round3(ratio),
                    },
                )
            })
        })
        .collect()
}

/// Empty, very long and very short strings in text columns.
pub fn string_problems(
    table: &DataTable,
    config: &AuditConfig,
) -> IndexMap<String, StringProblems> {
    table
        .columns()
        .iter()
        .filter(|c| supports_string_checks(c.column_type()))
        .filter_map(|c| {
            let problems = column_string_problems(c, config);
            problems.any().then(|| (c.name().to_string(), problems))
        })
        .collect()
}

fn column_string_problems(column: &Column, config: &AuditConfig) -> StringProblems {
    let mut problems = StringProblems::default();

    for row in 0..column.len() {
        let Some(value) = column.display_at(row) else {
            continue;
        };
        let chars = value.chars().count();
        if value.trim().is_empty() {
            problems.empty_or_whitespace += 1;
        }
        if chars > config.long_string_chars {
            problems.very_long += 1;
        }
        if chars > 0 && chars <= config.short_string_chars {
            problems.very_short += 1;
        }
    }

    problems
}

/// Missing cells and placeholder strings per column, fewest first.
///
/// Ties keep column order.
pub fn suspect_values(table: &DataTable) -> Vec<SuspectValues> {
    let rows = table.row_count();
    let mut suspects: Vec<SuspectValues> = table
        .columns()
        .iter()
        .map(|column| {
            let mut suspect = SuspectValues {
                column: column.name().to_string(),
                missing: column.missing_count(),
                empty: 0,
                none_text: 0,
                null_placeholders: 0,
                total: 0,
                percentage: 0.0,
                grade: Grade::Perfect,
            };
            if supports_string_checks(column.column_type()) {
                count_placeholders(column, &mut suspect);
            }
            suspect.total =
                suspect.missing + suspect.empty + suspect.none_text + suspect.null_placeholders;
            suspect.percentage = round1(percentage(suspect.total, rows));
            suspect.grade = Grade::from_suspects(suspect.total, suspect.percentage);
            suspect
        })
        .collect();

    suspects.sort_by(|a, b| {
        a.total
            .cmp(&b.total)
            .then(a.percentage.total_cmp(&b.percentage))
    });
    suspects
}

fn count_placeholders(column: &Column, suspect: &mut SuspectValues) {
    for row in 0..column.len() {
        let Some(value) = column.display_at(row) else {
            continue;
        };
        match value.trim().to_lowercase().as_str() {
            "" => suspect.empty += 1,
            "none" => suspect.none_text += 1,
            "na" | "n/a" | "null" => suspect.null_placeholders += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of_zero_is_zero() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn test_missing_values_ties_keep_column_order() {
        let table = DataTable::new(vec![
            Column::integer("a", vec![Some(1), None]),
            Column::integer("b", vec![None, None]),
            Column::integer("c", vec![None, Some(2)]),
        ])
        .unwrap();
        let missing = missing_values(&table);

        assert_eq!(missing.total, 4);
        assert!((missing.percentage - 66.666_666).abs() < 1e-3);
        let order: Vec<&str> = missing.by_column.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(missing.worst_column.as_deref(), Some("b"));
        assert_eq!(missing.worst_count, 2);
    }

    #[test]
    fn test_no_missing_values() {
        let table = DataTable::new(vec![Column::integer("a", vec![Some(1)])]).unwrap();
        let missing = missing_values(&table);
        assert_eq!(missing, MissingValues::default());
    }

    #[test]
    fn test_iqr_count() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 1000.0];
        assert_eq!(iqr_outlier_count(&values, 1.5), 1);
        assert_eq!(iqr_outlier_count(&[], 1.5), 0);
    }

    #[test]
    fn test_z_score_uses_population_std() {
        let mut values = vec![0.0; 19];
        values.push(100.0);
        // mean 5, population std ~21.79, z(100) ~4.36
        assert_eq!(z_score_outlier_count(&values, 3.0), 1);
        assert_eq!(z_score_outlier_count(&[4.0, 4.0, 4.0], 3.0), 0);
    }

    #[test]
    fn test_string_problems_counts() {
        let long = "x".repeat(201);
        let table = DataTable::new(vec![Column::text(
            "s",
            vec![Some("   "), Some(""), Some("ab"), Some(long.as_str()), Some("fine"), None],
        )])
        .unwrap();
        let problems = string_problems(&table, &AuditConfig::default());
        assert_eq!(
            problems["s"],
            StringProblems {
                empty_or_whitespace: 2,
                very_long: 1,
                very_short: 1,
            }
        );
    }

    #[test]
    fn test_cardinality_ratio_rounds_to_three_decimals() {
        let table = DataTable::new(vec![
            Column::text("third", vec![Some("a"), Some("a"), Some("a")]),
            Column::text("two_thirds", vec![Some("a"), Some("b"), Some("b")]),
        ])
        .unwrap();
        let config = AuditConfig::default().with_high_cardinality_ratio(0.0);
        let cardinality = high_cardinality(&table, &config);

        assert_eq!(cardinality["third"].ratio, 0.333);
        assert_eq!(cardinality["two_thirds"].ratio, 0.667);
    }

    #[test]
    fn test_suspect_values_counts_and_grades() {
        let table = DataTable::new(vec![
            Column::text(
                "s",
                vec![Some(" None"), Some("N/a "), Some("NULL"), Some("  "), Some("ok"), None],
            ),
            Column::integer("n", vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]),
            Column::float("x", vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0), Some(6.0)]),
        ])
        .unwrap();
        let suspects = suspect_values(&table);

        let order: Vec<&str> = suspects.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(order, vec!["n", "x", "s"]);

        assert_eq!(suspects[0].total, 0);
        assert_eq!(suspects[0].grade, Grade::Perfect);

        assert_eq!(suspects[1].missing, 1);
        assert_eq!(suspects[1].percentage, 16.7);
        assert_eq!(suspects[1].grade, Grade::Problematic);

        let s = &suspects[2];
        assert_eq!(
            (s.missing, s.empty, s.none_text, s.null_placeholders),
            (1, 1, 1, 2)
        );
        assert_eq!(s.total, 5);
        assert_eq!(s.percentage, 83.3);
    }

    #[test]
    fn test_suspect_placeholders_only_in_text_columns() {
        let table =
            DataTable::new(vec![Column::categorical("c", vec![Some("none"), Some("na")])]).unwrap();
        let suspects = suspect_values(&table);
        assert_eq!(suspects[0].total, 0);
    }

    #[test]
    fn test_suspect_values_on_zero_rows() {
        let table = DataTable::new(vec![Column::text("s", Vec::<Option<&str>>::new())]).unwrap();
        let suspects = suspect_values(&table);
        assert_eq!(suspects[0].percentage, 0.0);
        assert_eq!(suspects[0].grade, Grade::Perfect);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_suspects(0, 0.0), Grade::Perfect);
        assert_eq!(Grade::from_suspects(1, 3.0), Grade::Excellent);
        assert_eq!(Grade::from_suspects(1, 3.1), Grade::VeryGood);
        assert_eq!(Grade::from_suspects(1, 6.0), Grade::VeryGood);
        assert_eq!(Grade::from_suspects(1, 10.0), Grade::Good);
        assert_eq!(Grade::from_suspects(1, 15.0), Grade::Fair);
        assert_eq!(Grade::from_suspects(1, 15.1), Grade::Problematic);
    }

    #[test]
    fn test_string_checks_skip_categorical() {
        let table = DataTable::new(vec![Column::categorical("c", vec![Some("a"), Some("b")])])
            .unwrap();
        assert!(string_problems(&table, &AuditConfig::default()).is_empty());
    }
}
