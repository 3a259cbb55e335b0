//! Period selection
//!
//! A period is either the whole snapshot or one calendar month. Selecting a
//! period yields the analysis subset; the comparison window pairs it with
//! the baseline growth is measured against.

use crate::data::{SaleRecord, SalesTable};
use crate::error::{AnalyticsError, Result};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The slice of the snapshot under analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    AllData,
    SpecificMonth { year: i32, month: u32 },
}

impl Period {
    /// A calendar month, validated to 1..=12
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Period::SpecificMonth { year, month })
    }

    /// The calendar month before this one, wrapping January to the previous December
    pub fn previous_month(&self) -> Option<(i32, u32)> {
        match *self {
            Period::AllData => None,
            Period::SpecificMonth { year, month } => Some(month_before(year, month)),
        }
    }

    /// Whether a record falls inside this period
    pub fn contains(&self, record: &SaleRecord) -> bool {
        match *self {
            Period::AllData => true,
            Period::SpecificMonth { year, month } => {
                let cal = record.calendar();
                cal.year == year && cal.month == month
            }
        }
    }

    /// Human-facing label, e.g. "Marzo 2024"
    pub fn label(&self, locale: Locale) -> String {
        match *self {
            Period::AllData => locale.all_data_label().to_string(),
            Period::SpecificMonth { year, month } => match locale.month_name(month) {
                Some(name) => format!("{} {}", name, year),
                None => format!("{} {}", month, year),
            },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::AllData => write!(f, "all"),
            Period::SpecificMonth { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl FromStr for Period {
    type Err = AnalyticsError;

    /// Parses `all` or `YYYY-MM`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Period::AllData);
        }
        let (year, month) = s.split_once('-').ok_or_else(|| {
            AnalyticsError::ParseError(format!("Expected 'all' or YYYY-MM, got '{}'", s))
        })?;
        Period::month(year.parse()?, month.parse()?)
    }
}

fn month_before(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// All selectable periods: `AllData` first, then every (year, month) with a
/// positive total quantity, in chronological order.
pub fn list_periods(table: &SalesTable) -> Vec<Period> {
    let mut totals: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for record in table {
        let cal = record.calendar();
        *totals.entry((cal.year, cal.month)).or_insert(0) += record.quantity();
    }

    let mut periods = vec![Period::AllData];
    periods.extend(
        totals
            .into_iter()
            .filter(|(_, total)| *total > 0)
            .map(|((year, month), _)| Period::SpecificMonth { year, month }),
    );
    debug!(months = periods.len() - 1, "listed periods");
    periods
}

/// Rows of `table` inside `period`. An empty result is a valid empty state.
pub fn select_period(table: &SalesTable, period: Period) -> SalesTable {
    match period {
        Period::AllData => table.clone(),
        _ => table.filter(|r| period.contains(r)),
    }
}

/// Describes what the current subset is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonLabel {
    /// First half of the time range vs second half
    Halves,
    /// The calendar month preceding the selected one
    PreviousMonth { year: i32, month: u32 },
}

impl ComparisonLabel {
    pub fn describe(&self, locale: Locale) -> String {
        match *self {
            ComparisonLabel::Halves => locale.halves_label().to_string(),
            ComparisonLabel::PreviousMonth { year, month } => {
                Period::SpecificMonth { year, month }.label(locale)
            }
        }
    }
}

impl fmt::Display for ComparisonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe(Locale::English))
    }
}

/// Baseline and current subsets for growth measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonWindow {
    pub baseline: SalesTable,
    pub current: SalesTable,
    pub label: ComparisonLabel,
}

/// Build the comparison window for `period`.
///
/// * `AllData`: the analysis subset is split at the midpoint of its time
///   range; rows before the midpoint are the baseline, rows at or after it
///   are current.
/// * A month: the baseline is the preceding calendar month taken from
///   `full` and the current subset is `analysis` itself.
pub fn comparison_period(
    analysis: &SalesTable,
    full: &SalesTable,
    period: Period,
) -> ComparisonWindow {
    let window = match period {
        Period::AllData => match analysis.time_bounds() {
            Some((min, max)) => {
                let mid = min + (max - min) / 2;
                ComparisonWindow {
                    baseline: analysis.filter(|r| r.timestamp() < mid),
                    current: analysis.filter(|r| r.timestamp() >= mid),
                    label: ComparisonLabel::Halves,
                }
            }
            None => ComparisonWindow {
                baseline: SalesTable::empty(),
                current: SalesTable::empty(),
                label: ComparisonLabel::Halves,
            },
        },
        Period::SpecificMonth { year, month } => {
            let (prev_year, prev_month) = month_before(year, month);
            let previous = Period::SpecificMonth {
                year: prev_year,
                month: prev_month,
            };
            ComparisonWindow {
                baseline: select_period(full, previous),
                current: analysis.clone(),
                label: ComparisonLabel::PreviousMonth {
                    year: prev_year,
                    month: prev_month,
                },
            }
        }
    };

    debug!(
        baseline_rows = window.baseline.len(),
        current_rows = window.current.len(),
        label = %window.label,
        "built comparison window"
    );
    window
}
