//! # Deli Dashboard
//!
//! Umbrella crate for the delicatessen sales dashboard workspace.
//!
//! - [`analytics`]: loading, period selection, BCG matrix, basket mining
//! - [`math`]: medians, means and percentages used by the analytics
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use deli_dashboard_workspace::analytics::utils::generate_sample_sales;
//! use deli_dashboard_workspace::analytics::{BcgAnalyzer, Period};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let sales = generate_sample_sales(start, 31, 1);
//!
//! let matrix = BcgAnalyzer::new().analyze_period(&sales, Period::AllData);
//! let share: f64 = matrix.records.iter().map(|r| r.participation).sum();
//! assert!((share - 100.0).abs() < 1e-9);
//! ```

pub use sales_analytics as analytics;
pub use sales_math as math;

#[cfg(test)]
mod tests {
    use super::analytics::{list_periods, Period, SalesTable};
    use super::math::median;

    #[test]
    fn test_reexports() {
        assert_eq!(list_periods(&SalesTable::empty()), vec![Period::AllData]);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }
}
