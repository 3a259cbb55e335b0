//! One-call analysis of a period, driven by [`AnalyticsConfig`]

use crate::basket::{BasketAnalysis, BasketMiner};
use crate::bcg::{BcgAnalyzer, BcgMatrix};
use crate::config::AnalyticsConfig;
use crate::data::{SalesLoader, SalesTable};
use crate::error::Result;
use crate::overview::{HalfHourHeatmap, ProductDetail, SalesOverview};
use crate::period::{comparison_period, list_periods, select_period, Period};
use crate::special_dates::{compare_date, ComparisonBaseline, DateComparison};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Everything computed for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub period: Period,
    pub period_label: String,
    pub comparison_label: String,
    pub rows: usize,
    pub overview: Option<SalesOverview>,
    pub heatmap: HalfHourHeatmap,
    pub bcg: BcgMatrix,
    pub baskets: BasketAnalysis,
}

/// A loaded sales snapshot together with its configuration
#[derive(Debug, Clone)]
pub struct SalesAnalysis {
    config: AnalyticsConfig,
    table: SalesTable,
}

impl SalesAnalysis {
    pub fn new(config: AnalyticsConfig, table: SalesTable) -> Self {
        Self { config, table }
    }

    /// Load a CSV export using the configured column names
    pub fn from_csv<P: AsRef<Path>>(config: AnalyticsConfig, path: P) -> Result<Self> {
        let table = SalesLoader::with_columns(config.columns.clone()).load_csv(path)?;
        Ok(Self::new(config, table))
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    /// Periods offered for selection, all-data first
    pub fn periods(&self) -> Vec<Period> {
        list_periods(&self.table)
    }

    pub fn bcg(&self, period: Period) -> BcgMatrix {
        BcgAnalyzer::new().analyze_period(&self.table, period)
    }

    /// Basket mining over `period`, with configured exclusions and cut-off
    pub fn baskets(&self, period: Period) -> BasketAnalysis {
        self.miner().mine(&select_period(&self.table, period))
    }

    pub fn product_detail(&self, period: Period, product: &str) -> Option<ProductDetail> {
        let analysis = select_period(&self.table, period);
        let matrix = self.bcg(period);
        ProductDetail::compute(&analysis, &matrix, product)
    }

    /// Compare one date to its baseline using the configured threshold
    pub fn special_date(
        &self,
        date: NaiveDate,
        baseline: ComparisonBaseline,
    ) -> Option<DateComparison> {
        compare_date(
            &self.table,
            date,
            baseline,
            self.config.special_dates.threshold_pct,
        )
    }

    /// Run every period-scoped analysis
    pub fn report(&self, period: Period) -> AnalysisReport {
        let locale = self.config.locale;
        let analysis = select_period(&self.table, period);
        let window = comparison_period(&analysis, &self.table, period);
        let bcg = BcgAnalyzer::new().analyze(&analysis, &window);
        let baskets = self.miner().mine(&analysis);

        info!(
            %period,
            rows = analysis.len(),
            products = bcg.len(),
            baskets = baskets.stats.total_transactions,
            "analyzed period"
        );

        AnalysisReport {
            period,
            period_label: period.label(locale),
            comparison_label: window.label.describe(locale),
            rows: analysis.len(),
            overview: SalesOverview::compute(&analysis),
            heatmap: HalfHourHeatmap::compute(&analysis),
            bcg,
            baskets,
        }
    }

    fn miner(&self) -> BasketMiner {
        BasketMiner::new()
            .with_exclusions(self.config.basket.exclude.iter().cloned())
            .with_top_n(self.config.basket.top_n)
    }
}
