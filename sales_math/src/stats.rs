//! Summary statistics over sales quantities
//!
//! NaN inputs are skipped the way a dataframe median skips missing values.
//! Percentages guard their denominators and never divide by zero.

/// Median of the non-NaN values, averaging the two middle values for even counts.
///
/// Returns `None` when there is nothing to take the median of.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Arithmetic mean of the non-NaN values
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Share of `part` in `total` as a percentage, 0 when the total is zero.
pub fn share_pct(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        100.0 * part / total
    }
}

/// Percentage change from `baseline` to `current`.
///
/// Only defined for a positive baseline; callers decide what an undefined
/// change means for them.
pub fn pct_change(current: f64, baseline: f64) -> Option<f64> {
    if baseline > 0.0 {
        Some(100.0 * (current - baseline) / baseline)
    } else {
        None
    }
}
