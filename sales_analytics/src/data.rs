//! Sale records, the sales snapshot table and its loader

use crate::config::ColumnNames;
use crate::error::{AnalyticsError, Result};
use crate::utils::date_parser;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// A half-hour bucket of the day, `0` = 00:00-00:29 up to `47` = 23:30-23:59
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HalfHourSlot(u8);

impl HalfHourSlot {
    /// Slot containing the given wall-clock time
    pub fn from_time(hour: u32, minute: u32) -> Self {
        Self((hour.min(23) * 2 + u32::from(minute >= 30)) as u8)
    }

    /// Slot from its index within the day
    pub fn new(index: u8) -> Result<Self> {
        if index >= 48 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "Half-hour slot must be below 48, got {}",
                index
            )));
        }
        Ok(Self(index))
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.0) / 2
    }

    /// Fractional hour, e.g. `9.5` for 09:30
    pub fn as_hours(&self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl fmt::Display for HalfHourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = if self.0 % 2 == 0 { "00" } else { "30" };
        write!(f, "{}:{}", self.hour(), minutes)
    }
}

/// Calendar attributes derived from a sale timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFields {
    pub hour: u32,
    pub half_hour: HalfHourSlot,
    pub weekday: Weekday,
    pub month: u32,
    pub year: i32,
    /// `(day - 1) / 7 + 1`, so days 1-7 are week 1
    pub week_of_month: u32,
    pub date: NaiveDate,
}

impl CalendarFields {
    pub fn from_timestamp(timestamp: &NaiveDateTime) -> Self {
        Self {
            hour: timestamp.hour(),
            half_hour: HalfHourSlot::from_time(timestamp.hour(), timestamp.minute()),
            weekday: timestamp.weekday(),
            month: timestamp.month(),
            year: timestamp.year(),
            week_of_month: (timestamp.day() - 1) / 7 + 1,
            date: timestamp.date(),
        }
    }
}

/// One unit-sale event from the point-of-sale export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    timestamp: NaiveDateTime,
    product: String,
    quantity: i64,
    calendar: CalendarFields,
}

impl SaleRecord {
    /// Create a record, deriving its calendar attributes once
    pub fn new(timestamp: NaiveDateTime, product: impl Into<String>, quantity: i64) -> Self {
        Self {
            calendar: CalendarFields::from_timestamp(&timestamp),
            timestamp,
            product: product.into(),
            quantity,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn calendar(&self) -> &CalendarFields {
        &self.calendar
    }
}

/// An immutable snapshot of sale records
///
/// Every analysis takes a snapshot explicitly; refreshing it is up to
/// whoever loads the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    records: Vec<SaleRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SaleRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SaleRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows matching `predicate`, in their original order
    pub fn filter<F>(&self, predicate: F) -> SalesTable
    where
        F: Fn(&SaleRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub fn total_quantity(&self) -> i64 {
        self.records.iter().map(|r| r.quantity).sum()
    }

    /// Summed quantity per product, keyed in product-name order
    pub fn quantity_by_product(&self) -> BTreeMap<String, i64> {
        let mut totals = BTreeMap::new();
        for record in &self.records {
            *totals.entry(record.product.clone()).or_insert(0) += record.quantity;
        }
        totals
    }

    /// Distinct product names, sorted
    pub fn products(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.product.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct calendar dates, sorted
    pub fn dates(&self) -> BTreeSet<NaiveDate> {
        self.records.iter().map(|r| r.calendar.date).collect()
    }

    /// Earliest and latest timestamps
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.records.iter().map(|r| r.timestamp).min()?;
        let max = self.records.iter().map(|r| r.timestamp).max()?;
        Some((min, max))
    }
}

impl FromIterator<SaleRecord> for SalesTable {
    fn from_iter<I: IntoIterator<Item = SaleRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SaleRecord;
    type IntoIter = std::slice::Iter<'a, SaleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Data loader for point-of-sale exports
///
/// Rows missing a timestamp, product or quantity are dropped, as are rows
/// whose timestamp cannot be parsed. Non-numeric quantities count as zero.
#[derive(Debug, Clone, Default)]
pub struct SalesLoader {
    columns: ColumnNames,
}

impl SalesLoader {
    /// Loader reading the given column names
    pub fn with_columns(columns: ColumnNames) -> Self {
        Self { columns }
    }

    /// Load a snapshot from a CSV file with the default column names
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        Self::default().load_csv(path)
    }

    /// Load a snapshot from an existing DataFrame with the default column names
    pub fn from_dataframe(df: &DataFrame) -> Result<SalesTable> {
        Self::default().load_dataframe(df)
    }

    /// Build a snapshot directly from records
    pub fn from_records(records: Vec<SaleRecord>) -> SalesTable {
        info!(rows = records.len(), "loaded sales snapshot");
        SalesTable::new(records)
    }

    /// Load a snapshot from a CSV file
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<SalesTable> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading sales export");
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        self.load_dataframe(&df)
    }

    /// Load a snapshot from a DataFrame
    pub fn load_dataframe(&self, df: &DataFrame) -> Result<SalesTable> {
        let timestamps = timestamp_values(self.column(df, &self.columns.timestamp)?)?;
        let products = product_values(self.column(df, &self.columns.product)?)?;
        let quantities = quantity_values(self.column(df, &self.columns.quantity)?)?;

        let records: Vec<SaleRecord> = timestamps
            .into_iter()
            .zip(products)
            .zip(quantities)
            .filter_map(|((timestamp, product), quantity)| {
                Some(SaleRecord::new(timestamp?, product?, quantity?))
            })
            .collect();

        let dropped = df.height() - records.len();
        if dropped > 0 {
            warn!(dropped, "dropped rows with a missing or unparseable field");
        }
        info!(rows = records.len(), "loaded sales snapshot");

        Ok(SalesTable::new(records))
    }

    fn column<'a>(&self, df: &'a DataFrame, name: &str) -> Result<&'a Series> {
        df.column(name)
            .map_err(|_| AnalyticsError::MissingColumn(name.to_string()))
    }
}

fn timestamp_values(series: &Series) -> Result<Vec<Option<NaiveDateTime>>> {
    match series.dtype() {
        DataType::Utf8 => Ok(series
            .utf8()?
            .into_iter()
            .map(|value| value.and_then(|s| date_parser::parse_datetime(s).ok()))
            .collect()),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let values: &Int64Chunked = series.datetime()?;
            Ok(values
                .into_iter()
                .map(|value| value.and_then(|ts| from_epoch(ts, unit)))
                .collect())
        }
        DataType::Date => {
            let values: &Int32Chunked = series.date()?;
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1);
            Ok(values
                .into_iter()
                .map(|value| {
                    let days = value?;
                    epoch?
                        .checked_add_signed(Duration::days(i64::from(days)))?
                        .and_hms_opt(0, 0, 0)
                })
                .collect())
        }
        other => Err(AnalyticsError::DataError(format!(
            "Column '{}' of type {} cannot hold timestamps",
            series.name(),
            other
        ))),
    }
}

fn from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let secs = value.div_euclid(per_second);
    let nanos = value.rem_euclid(per_second) * (1_000_000_000 / per_second);
    DateTime::from_timestamp(secs, u32::try_from(nanos).ok()?).map(|dt| dt.naive_utc())
}

fn product_values(series: &Series) -> Result<Vec<Option<String>>> {
    let as_text = series.cast(&DataType::Utf8)?;
    Ok(as_text
        .utf8()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn quantity_values(series: &Series) -> Result<Vec<Option<i64>>> {
    match series.dtype() {
        DataType::Utf8 => Ok(series
            .utf8()?
            .into_iter()
            .map(|value| value.map(coerce_quantity))
            .collect()),
        dtype if dtype.is_numeric() || *dtype == DataType::Boolean => {
            let as_float = series.cast(&DataType::Float64)?;
            Ok(as_float
                .f64()?
                .into_iter()
                .map(|value| value.filter(|v| !v.is_nan()).map(|v| v as i64))
                .collect())
        }
        other => Err(AnalyticsError::DataError(format!(
            "Column '{}' of type {} cannot hold quantities",
            series.name(),
            other
        ))),
    }
}

/// Numeric text becomes its integer part; anything else counts as zero.
fn coerce_quantity(value: &str) -> i64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v as i64,
        _ => 0,
    }
}
