//! Product performance analysis on a BCG growth-share matrix
//!
//! Each product of the analysis subset gets its share of the period's units
//! (participation) and a growth rate against the comparison baseline. Both
//! axes are split at their per-period median; a value exactly on a median
//! counts as high.

use crate::data::SalesTable;
use crate::period::{comparison_period, select_period, ComparisonLabel, ComparisonWindow, Period};
use sales_math::{median, pct_change, share_pct};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Growth assigned to a product with no baseline sales.
///
/// A fixed policy value, not the result of a division.
pub const NEW_PRODUCT_GROWTH: f64 = 100.0;

/// Quadrant of the growth-share matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BcgCategory {
    Star,
    CashCow,
    QuestionMark,
    Dog,
}

impl BcgCategory {
    pub const ALL: [BcgCategory; 4] = [
        BcgCategory::Star,
        BcgCategory::CashCow,
        BcgCategory::QuestionMark,
        BcgCategory::Dog,
    ];

    /// Quadrant from the two axis comparisons (`true` = at or above the median)
    pub fn classify(high_share: bool, high_growth: bool) -> Self {
        match (high_share, high_growth) {
            (true, true) => BcgCategory::Star,
            (true, false) => BcgCategory::CashCow,
            (false, true) => BcgCategory::QuestionMark,
            (false, false) => BcgCategory::Dog,
        }
    }
}

impl fmt::Display for BcgCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BcgCategory::Star => "Star",
            BcgCategory::CashCow => "Cash-Cow",
            BcgCategory::QuestionMark => "Question-Mark",
            BcgCategory::Dog => "Dog",
        };
        f.write_str(name)
    }
}

/// One product's position on the matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BcgRecord {
    pub product: String,
    pub quantity: i64,
    /// Percentage of the period's units
    pub participation: f64,
    /// Percentage change against the baseline
    pub growth_rate: f64,
    pub category: BcgCategory,
}

/// Result of a BCG analysis for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BcgMatrix {
    /// One row per product, in product-name order
    pub records: Vec<BcgRecord>,
    pub comparison: ComparisonLabel,
    pub participation_median: f64,
    pub growth_median: f64,
}

impl BcgMatrix {
    fn empty(comparison: ComparisonLabel) -> Self {
        Self {
            records: Vec::new(),
            comparison,
            participation_median: 0.0,
            growth_median: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, product: &str) -> Option<&BcgRecord> {
        self.records.iter().find(|r| r.product == product)
    }

    pub fn by_category(&self, category: BcgCategory) -> Vec<&BcgRecord> {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Number of products per quadrant, including empty quadrants
    pub fn category_counts(&self) -> BTreeMap<BcgCategory, usize> {
        let mut counts: BTreeMap<BcgCategory, usize> =
            BcgCategory::ALL.iter().map(|c| (*c, 0)).collect();
        for record in &self.records {
            *counts.entry(record.category).or_insert(0) += 1;
        }
        counts
    }

    /// Products by units sold, best first; ties keep product-name order.
    pub fn ranked_by_quantity(&self, limit: Option<usize>) -> Vec<&BcgRecord> {
        let mut ranked: Vec<&BcgRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
}

/// Growth rate of every product sold in `current`, keyed by product.
///
/// Products with baseline sales get the percentage change; the rest get
/// [`NEW_PRODUCT_GROWTH`]. Products only in the baseline are left out.
pub fn growth_rates(baseline: &SalesTable, current: &SalesTable) -> BTreeMap<String, f64> {
    let before = baseline.quantity_by_product();
    current
        .quantity_by_product()
        .into_iter()
        .map(|(product, now)| {
            let then = before.get(&product).copied().unwrap_or(0);
            let growth = pct_change(now as f64, then as f64).unwrap_or(NEW_PRODUCT_GROWTH);
            (product, growth)
        })
        .collect()
}

/// Builds BCG matrices
#[derive(Debug, Clone, Copy, Default)]
pub struct BcgAnalyzer;

impl BcgAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Select `period` from the full snapshot and analyze it against its comparison window
    pub fn analyze_period(&self, full: &SalesTable, period: Period) -> BcgMatrix {
        let analysis = select_period(full, period);
        let window = comparison_period(&analysis, full, period);
        self.analyze(&analysis, &window)
    }

    /// Classify the products of `analysis` using a prepared comparison window
    pub fn analyze(&self, analysis: &SalesTable, window: &ComparisonWindow) -> BcgMatrix {
        let quantities = analysis.quantity_by_product();
        if quantities.is_empty() {
            return BcgMatrix::empty(window.label);
        }

        let total = quantities.values().sum::<i64>() as f64;
        let growth = growth_rates(&window.baseline, &window.current);

        // Products sold in the analysis subset but not in the current half default to 0
        let rows: Vec<(String, i64, f64, f64)> = quantities
            .into_iter()
            .map(|(product, quantity)| {
                let participation = share_pct(quantity as f64, total);
                let growth_rate = growth.get(&product).copied().unwrap_or(0.0);
                (product, quantity, participation, growth_rate)
            })
            .collect();

        let shares: Vec<f64> = rows.iter().map(|r| r.2).collect();
        let rates: Vec<f64> = rows.iter().map(|r| r.3).collect();
        let participation_median = median(&shares).unwrap_or(0.0);
        let growth_median = median(&rates).unwrap_or(0.0);

        let records = rows
            .into_iter()
            .map(|(product, quantity, participation, growth_rate)| BcgRecord {
                category: BcgCategory::classify(
                    participation >= participation_median,
                    growth_rate >= growth_median,
                ),
                product,
                quantity,
                participation,
                growth_rate,
            })
            .collect::<Vec<_>>();

        debug!(
            products = records.len(),
            participation_median,
            growth_median,
            "classified products"
        );

        BcgMatrix {
            records,
            comparison: window.label,
            participation_median,
            growth_median,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SaleRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sale(ts: &str, product: &str, quantity: i64) -> SaleRecord {
        SaleRecord::new(
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            product,
            quantity,
        )
    }

    #[rstest]
    #[case(true, true, BcgCategory::Star)]
    #[case(true, false, BcgCategory::CashCow)]
    #[case(false, true, BcgCategory::QuestionMark)]
    #[case(false, false, BcgCategory::Dog)]
    fn test_classify(#[case] share: bool, #[case] growth: bool, #[case] expected: BcgCategory) {
        assert_eq!(BcgCategory::classify(share, growth), expected);
    }

    #[test]
    fn test_no_baseline_gives_sentinel_growth() {
        let full = SalesTable::new(vec![
            sale("2024-04-01 10:00:00", "A", 50),
            sale("2024-04-02 10:00:00", "B", 30),
            sale("2024-04-03 10:00:00", "C", 20),
        ]);

        let matrix = BcgAnalyzer::new().analyze_period(&full, Period::month(2024, 4).unwrap());

        let categories: Vec<_> = matrix.records.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![BcgCategory::Star, BcgCategory::Star, BcgCategory::QuestionMark]
        );
        assert!(matrix.records.iter().all(|r| r.growth_rate == NEW_PRODUCT_GROWTH));
        assert_relative_eq!(matrix.participation_median, 30.0);
        assert_relative_eq!(matrix.growth_median, 100.0);
        assert_relative_eq!(matrix.get("A").unwrap().participation, 50.0);
    }

    #[test]
    fn test_growth_rates() {
        let baseline = SalesTable::new(vec![
            sale("2024-03-01 10:00:00", "A", 10),
            sale("2024-03-01 10:00:00", "Gone", 7),
        ]);
        let current = SalesTable::new(vec![
            sale("2024-04-01 10:00:00", "A", 5),
            sale("2024-04-01 10:00:00", "New", 1),
        ]);

        let rates = growth_rates(&baseline, &current);
        assert_eq!(rates.len(), 2);
        assert_relative_eq!(rates["A"], -50.0);
        assert_relative_eq!(rates["New"], NEW_PRODUCT_GROWTH);
        assert!(!rates.contains_key("Gone"));
    }

    #[test]
    fn test_empty_period_returns_empty_matrix() {
        let full = SalesTable::new(vec![sale("2024-03-01 10:00:00", "A", 1)]);
        let matrix = BcgAnalyzer::new().analyze_period(&full, Period::month(2024, 6).unwrap());

        assert!(matrix.is_empty());
        assert_eq!(
            matrix.comparison,
            ComparisonLabel::PreviousMonth { year: 2024, month: 5 }
        );
    }

    #[test]
    fn test_zero_quantity_period_has_no_division_errors() {
        let full = SalesTable::new(vec![
            sale("2024-03-01 10:00:00", "A", 0),
            sale("2024-03-02 10:00:00", "B", 0),
        ]);
        let matrix = BcgAnalyzer::new().analyze_period(&full, Period::month(2024, 3).unwrap());

        assert_eq!(matrix.len(), 2);
        assert!(matrix
            .records
            .iter()
            .all(|r| r.participation == 0.0 && r.growth_rate.is_finite()));
    }

    #[test]
    fn test_all_data_product_missing_from_second_half() {
        let full = SalesTable::new(vec![
            sale("2024-03-01 10:00:00", "Early", 4),
            sale("2024-03-01 10:00:00", "Both", 2),
            sale("2024-03-11 10:00:00", "Both", 6),
        ]);
        let matrix = BcgAnalyzer::new().analyze_period(&full, Period::AllData);

        assert_relative_eq!(matrix.get("Both").unwrap().growth_rate, 200.0);
        assert_relative_eq!(matrix.get("Early").unwrap().growth_rate, 0.0);
        assert_eq!(matrix.comparison, ComparisonLabel::Halves);
    }

    #[test]
    fn test_ranking_and_counts() {
        let full = SalesTable::new(vec![
            sale("2024-03-01 10:00:00", "A", 5),
            sale("2024-03-01 10:00:00", "B", 9),
            sale("2024-03-01 10:00:00", "C", 1),
        ]);
        let matrix = BcgAnalyzer::new().analyze_period(&full, Period::month(2024, 3).unwrap());

        let top: Vec<&str> = matrix
            .ranked_by_quantity(Some(2))
            .iter()
            .map(|r| r.product.as_str())
            .collect();
        assert_eq!(top, vec!["B", "A"]);
        assert_eq!(matrix.category_counts().values().sum::<usize>(), 3);
        assert_eq!(matrix.category_counts()[&BcgCategory::Dog], 0);
    }
}
