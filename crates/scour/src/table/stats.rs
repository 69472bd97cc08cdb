//! Aggregate primitives over numeric samples.
//!
//! All functions take the non-missing values of a column. Quantiles use
//! linear interpolation between closest ranks, so results match the usual
//! dataframe defaults.

use std::cmp::Ordering;

/// Sort a sample in ascending order (total order over floats).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile `q` (0.0-1.0) of an already sorted sample.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let q = q.clamp(0.0, 1.0);
    let position = q * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let low = *sorted.get(lower)?;
    let high = *sorted.get(upper)?;
    Some(low + (high - low) * (position - lower as f64))
}

/// Quantile `q` (0.0-1.0) of an unsorted sample.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

/// Median of a sample.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation (divisor n).
pub fn std_population(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Smallest value.
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(f64::total_cmp)
}

/// Largest value.
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(f64::total_cmp)
}

/// Most frequent value; ties resolve to the smallest value.
pub fn mode(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    let mut best: Option<(f64, usize)> = None;
    let mut index = 0;

    while let Some(&current) = sorted.get(index) {
        let run = sorted[index..]
            .iter()
            .take_while(|v| v.total_cmp(&current) == Ordering::Equal)
            .count();
        // Strictly greater keeps the earliest (smallest) value on ties
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((current, run));
        }
        index += run;
    }

    best.map(|(value, _)| value)
}

/// Inclusive IQR fences `[Q1 - k*IQR, Q3 + k*IQR]`.
pub fn iqr_bounds(values: &[f64], multiplier: f64) -> Option<(f64, f64)> {
    let sorted = sorted(values);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 0.75), Some(3.25));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_median_of_known_values() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 100.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
    }

    #[test]
    fn test_population_std() {
        let std = std_population(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]), Some(1.0));
        assert_eq!(mode(&[5.0, 2.0, 5.0]), Some(5.0));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_iqr_bounds() {
        let (lower, upper) = iqr_bounds(&[1.0, 2.0, 3.0, 4.0, 5.0, 1000.0], 1.5).unwrap();
        assert!(lower < 1.0);
        assert!(upper > 5.0 && upper < 1000.0);
    }
}
