//! Time-of-day and day-of-week aggregates, product detail
//!
//! Weekdays are always ordered Monday first. Cells that have no sales are
//! filled with zero.

use crate::bcg::BcgMatrix;
use crate::data::{HalfHourSlot, SalesTable};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Monday-first week
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The busiest (weekday, hour) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakSlot {
    pub weekday: Weekday,
    pub hour: u32,
    pub quantity: i64,
}

/// Headline numbers for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOverview {
    pub peak: PeakSlot,
    pub total_quantity: i64,
    /// All seven days, Monday first
    pub by_weekday: Vec<(Weekday, i64)>,
    /// Hours that had sales, ascending
    pub by_hour: Vec<(u32, i64)>,
}

impl SalesOverview {
    /// `None` for an empty table
    pub fn compute(table: &SalesTable) -> Option<Self> {
        Some(Self {
            peak: peak_slot(table)?,
            total_quantity: table.total_quantity(),
            by_weekday: weekday_totals(table),
            by_hour: hourly_totals(table),
        })
    }
}

/// Quantity grid: weekdays (rows) by half-hour slots (columns)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfHourHeatmap {
    /// Weekdays that had sales, Monday first
    pub weekdays: Vec<Weekday>,
    /// Slots that had sales, ascending
    pub slots: Vec<HalfHourSlot>,
    /// `values[row][column]`
    pub values: Vec<Vec<i64>>,
}

impl HalfHourHeatmap {
    pub fn compute(table: &SalesTable) -> Self {
        let mut cells: BTreeMap<(usize, HalfHourSlot), i64> = BTreeMap::new();
        for record in table {
            let cal = record.calendar();
            let day = cal.weekday.num_days_from_monday() as usize;
            *cells.entry((day, cal.half_hour)).or_insert(0) += record.quantity();
        }

        let days: BTreeSet<usize> = cells.keys().map(|(day, _)| *day).collect();
        let slots: Vec<HalfHourSlot> = cells
            .keys()
            .map(|(_, slot)| *slot)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let values = days
            .iter()
            .map(|day| {
                slots
                    .iter()
                    .map(|slot| cells.get(&(*day, *slot)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            weekdays: days.into_iter().map(|day| WEEK[day]).collect(),
            slots,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weekdays.is_empty()
    }
}

/// Busiest (weekday, hour); ties go to the earliest cell in the week.
pub fn peak_slot(table: &SalesTable) -> Option<PeakSlot> {
    let mut cells: BTreeMap<(u32, u32), i64> = BTreeMap::new();
    for record in table {
        let cal = record.calendar();
        *cells
            .entry((cal.weekday.num_days_from_monday(), cal.hour))
            .or_insert(0) += record.quantity();
    }

    let mut peak: Option<PeakSlot> = None;
    for ((day, hour), quantity) in cells {
        if peak.map_or(true, |p| quantity > p.quantity) {
            peak = Some(PeakSlot {
                weekday: WEEK[day as usize],
                hour,
                quantity,
            });
        }
    }
    peak
}

/// Units per weekday, Monday first, zero-filled
pub fn weekday_totals(table: &SalesTable) -> Vec<(Weekday, i64)> {
    let mut totals = [0i64; 7];
    for record in table {
        totals[record.calendar().weekday.num_days_from_monday() as usize] += record.quantity();
    }
    WEEK.iter().copied().zip(totals).collect()
}

/// Units per hour of day, for hours with sales
pub fn hourly_totals(table: &SalesTable) -> Vec<(u32, i64)> {
    let mut totals: BTreeMap<u32, i64> = BTreeMap::new();
    for record in table {
        *totals.entry(record.calendar().hour).or_insert(0) += record.quantity();
    }
    totals.into_iter().collect()
}

/// Units of one product per calendar date
pub fn product_daily_series(table: &SalesTable, product: &str) -> Vec<(NaiveDate, i64)> {
    let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for record in table.iter().filter(|r| r.product() == product) {
        *totals.entry(record.calendar().date).or_insert(0) += record.quantity();
    }
    totals.into_iter().collect()
}

/// Everything known about one product in a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: String,
    pub total_quantity: i64,
    pub participation: f64,
    pub growth_rate: f64,
    pub daily: Vec<(NaiveDate, i64)>,
}

impl ProductDetail {
    /// `None` when the product has no rows in `table`.
    /// Participation and growth come from `matrix`, 0 if the product is not on it.
    pub fn compute(table: &SalesTable, matrix: &BcgMatrix, product: &str) -> Option<Self> {
        let daily = product_daily_series(table, product);
        if daily.is_empty() {
            return None;
        }

        let position = matrix.get(product);
        Some(Self {
            product: product.to_string(),
            total_quantity: daily.iter().map(|(_, q)| q).sum(),
            participation: position.map_or(0.0, |r| r.participation),
            growth_rate: position.map_or(0.0, |r| r.growth_rate),
            daily,
        })
    }
}
