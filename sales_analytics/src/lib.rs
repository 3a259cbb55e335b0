//! # Sales Analytics
//!
//! Analysis core of a delicatessen point-of-sale dashboard.
//!
//! ## Features
//!
//! - Loading point-of-sale exports (CSV or an in-memory DataFrame)
//! - Period selection: all data or a single calendar month, with the
//!   matching comparison window for growth
//! - BCG growth-share classification of products (Star, Cash-Cow,
//!   Question-Mark, Dog)
//! - Basket mining: co-purchased pairs and triples from same-timestamp sales
//! - Weekday/hour overviews, half-hour heatmaps and special-date comparison
//! - CSV and JSON export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_analytics::{load_config, Period, SalesAnalysis};
//!
//! let config = load_config(None)?;
//! let analysis = SalesAnalysis::from_csv(config, "ventas.csv")?;
//!
//! for period in analysis.periods() {
//!     let report = analysis.report(period);
//!     println!("{}: {} products", report.period_label, report.bcg.len());
//! }
//! # Ok::<(), sales_analytics::AnalyticsError>(())
//! ```

pub mod analysis;
pub mod basket;
pub mod bcg;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod locale;
pub mod overview;
pub mod period;
pub mod special_dates;
pub mod utils;

// Re-export commonly used types
pub use crate::analysis::{AnalysisReport, SalesAnalysis};
pub use crate::basket::{BasketAnalysis, BasketMiner, BasketStats, ItemsetFrequency};
pub use crate::bcg::{BcgAnalyzer, BcgCategory, BcgMatrix, BcgRecord};
pub use crate::config::{load_config, AnalyticsConfig};
pub use crate::data::{SaleRecord, SalesLoader, SalesTable};
pub use crate::error::{AnalyticsError, Result};
pub use crate::locale::Locale;
pub use crate::overview::{HalfHourHeatmap, ProductDetail, SalesOverview};
pub use crate::period::{
    comparison_period, list_periods, select_period, ComparisonLabel, ComparisonWindow, Period,
};
pub use crate::special_dates::{compare_date, ComparisonBaseline, DateComparison, DayActivity};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
