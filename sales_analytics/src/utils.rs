//! Utility functions for the sales_analytics crate

use crate::data::{SaleRecord, SalesTable};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Timestamp parsing for point-of-sale exports
pub mod date_parser {
    use crate::error::{AnalyticsError, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    const DATETIME_FORMATS: [&str; 8] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

    /// Parse a timestamp; offsets are dropped and date-only values map to midnight.
    ///
    /// Slashed dates are read day-first (`31/01/2024`).
    pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.naive_local());
        }
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(dt);
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                    return Ok(dt);
                }
            }
        }

        Err(AnalyticsError::ParseError(format!(
            "Unrecognized timestamp: '{}'",
            value
        )))
    }

    /// Parse a calendar date
    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        let value = value.trim();
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Ok(date);
            }
        }
        Err(AnalyticsError::ParseError(format!(
            "Unrecognized date: '{}'",
            value
        )))
    }
}

const SAMPLE_PRODUCTS: [&str; 10] = [
    "Jamón cocido",
    "Queso tybo",
    "Salame milán",
    "Mortadela",
    "Queso cremoso",
    "Pan de campo",
    "Aceitunas verdes",
    "Bondiola",
    "Provoleta",
    "Matambre",
];

/// Generate a deterministic synthetic sales snapshot for demos and tests.
///
/// Each day has 20 to 59 checkouts between 08:00 and 20:59, each with one
/// to four lines of one to three units.
pub fn generate_sample_sales(start: NaiveDate, days: u32, seed: u64) -> SalesTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();

    for day in 0..days {
        let date = start + Duration::days(i64::from(day));
        let Some(opening) = date.and_hms_opt(8, 0, 0) else {
            continue;
        };

        let checkouts = rng.gen_range(20..60);
        for _ in 0..checkouts {
            let timestamp = opening + Duration::seconds(rng.gen_range(0..13 * 3600));
            let lines = rng.gen_range(1..=4);
            for _ in 0..lines {
                let product = SAMPLE_PRODUCTS[rng.gen_range(0..SAMPLE_PRODUCTS.len())];
                let quantity = rng.gen_range(1..=3);
                records.push(SaleRecord::new(timestamp, product, quantity));
            }
        }
    }

    SalesTable::new(records)
}
