//! Compare a single calendar date against typical days
//!
//! Used for holidays, promotions and other dates that are suspected to sell
//! differently from the rest of the calendar.

use crate::data::SalesTable;
use crate::error::{AnalyticsError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How many gainers a report shows by default
pub const DEFAULT_TOP_GAINERS: usize = 15;

/// Which days form the baseline of a date comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonBaseline {
    /// Other dates falling on the same weekday
    #[default]
    SameWeekday,
    /// Every other date in the table
    OverallAverage,
}

impl ComparisonBaseline {
    fn includes(self, candidate: NaiveDate, weekday: Weekday, date: NaiveDate) -> bool {
        match self {
            Self::SameWeekday => candidate != date && candidate.weekday() == weekday,
            Self::OverallAverage => candidate != date,
        }
    }
}

impl fmt::Display for ComparisonBaseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameWeekday => write!(f, "same-weekday"),
            Self::OverallAverage => write!(f, "overall"),
        }
    }
}

impl FromStr for ComparisonBaseline {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "same-weekday" | "weekday" => Ok(Self::SameWeekday),
            "overall" | "overall-average" | "all" => Ok(Self::OverallAverage),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "Unknown comparison baseline '{}'",
                other
            ))),
        }
    }
}

/// Verdict on how a date performed against its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayActivity {
    Special,
    Slow,
    Typical,
}

impl DayActivity {
    /// `Special` above `threshold_pct`, `Slow` below `-threshold_pct`
    pub fn from_difference(difference_pct: f64, threshold_pct: f64) -> Self {
        if difference_pct > threshold_pct {
            Self::Special
        } else if difference_pct < -threshold_pct {
            Self::Slow
        } else {
            Self::Typical
        }
    }
}

impl fmt::Display for DayActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Special => write!(f, "special date"),
            Self::Slow => write!(f, "slow day"),
            Self::Typical => write!(f, "typical day"),
        }
    }
}

/// One product's sales on the date against its daily average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductComparison {
    pub product: String,
    pub quantity_on_date: i64,
    pub daily_average: f64,
    pub difference: f64,
    /// 0 when the product has no baseline average
    pub difference_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateComparison {
    pub date: NaiveDate,
    pub baseline: ComparisonBaseline,
    pub total_on_date: i64,
    /// Mean of the baseline's per-date totals, truncated
    pub baseline_average: i64,
    pub baseline_days: usize,
    pub difference_pct: f64,
    /// Products sold on the date or in the baseline, by name
    pub products: Vec<ProductComparison>,
    pub activity: DayActivity,
}

impl DateComparison {
    /// Products sold on the date, largest relative gain first
    pub fn top_gainers(&self, limit: usize) -> Vec<&ProductComparison> {
        let mut gainers: Vec<&ProductComparison> = self
            .products
            .iter()
            .filter(|p| p.quantity_on_date > 0)
            .collect();
        gainers.sort_by(|a, b| b.difference_pct.total_cmp(&a.difference_pct));
        gainers.truncate(limit);
        gainers
    }

    /// Units above (or below) the baseline average
    pub fn unit_difference(&self) -> i64 {
        self.total_on_date - self.baseline_average
    }
}

fn relative_difference(value: f64, reference: f64) -> f64 {
    let pct = (value - reference) / reference * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

/// Compare `date` against the chosen baseline days.
///
/// Returns `None` when the table has no rows on `date`.
pub fn compare_date(
    table: &SalesTable,
    date: NaiveDate,
    baseline: ComparisonBaseline,
    threshold_pct: f64,
) -> Option<DateComparison> {
    let on_date = table.filter(|r| r.calendar().date == date);
    if on_date.is_empty() {
        return None;
    }
    let weekday = date.weekday();
    let reference = table.filter(|r| baseline.includes(r.calendar().date, weekday, date));

    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for record in &reference {
        *per_day.entry(record.calendar().date).or_insert(0) += record.quantity();
    }
    let baseline_days = per_day.len();

    let total_on_date = on_date.total_quantity();
    let baseline_average = if baseline_days > 0 {
        (per_day.values().sum::<i64>() as f64 / baseline_days as f64).trunc() as i64
    } else {
        0
    };
    let difference_pct = if baseline_average > 0 {
        (total_on_date - baseline_average) as f64 / baseline_average as f64 * 100.0
    } else {
        0.0
    };

    let sold = on_date.quantity_by_product();
    let usual = reference.quantity_by_product();
    let names: BTreeSet<&String> = sold.keys().chain(usual.keys()).collect();
    let products = names
        .into_iter()
        .map(|product| {
            let quantity_on_date = sold.get(product).copied().unwrap_or(0);
            let daily_average = match (usual.get(product), baseline_days) {
                (Some(sum), days) if days > 0 => *sum as f64 / days as f64,
                _ => 0.0,
            };
            ProductComparison {
                product: product.clone(),
                quantity_on_date,
                daily_average,
                difference: quantity_on_date as f64 - daily_average,
                difference_pct: relative_difference(quantity_on_date as f64, daily_average),
            }
        })
        .collect();

    let activity = DayActivity::from_difference(difference_pct, threshold_pct);
    debug!(%date, %baseline, baseline_days, difference_pct, ?activity, "compared date");

    Some(DateComparison {
        date,
        baseline,
        total_on_date,
        baseline_average,
        baseline_days,
        difference_pct,
        products,
        activity,
    })
}
