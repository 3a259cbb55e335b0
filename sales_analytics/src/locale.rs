//! Month and weekday names for labels
//!
//! The analytics work on numbers and `chrono` types; names only appear in
//! human-facing labels such as the comparison window description.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const MONTHS_ES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

/// Language used for labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    English,
    #[default]
    Spanish,
}

impl Locale {
    /// Name of a calendar month (1 = January)
    pub fn month_name(self, month: u32) -> Option<&'static str> {
        let idx = usize::try_from(month).ok()?.checked_sub(1)?;
        match self {
            Locale::English => MONTHS_EN.get(idx).copied(),
            Locale::Spanish => MONTHS_ES.get(idx).copied(),
        }
    }

    /// Name of a day of the week
    pub fn weekday_name(self, weekday: Weekday) -> &'static str {
        match (self, weekday) {
            (Locale::English, Weekday::Mon) => "Monday",
            (Locale::English, Weekday::Tue) => "Tuesday",
            (Locale::English, Weekday::Wed) => "Wednesday",
            (Locale::English, Weekday::Thu) => "Thursday",
            (Locale::English, Weekday::Fri) => "Friday",
            (Locale::English, Weekday::Sat) => "Saturday",
            (Locale::English, Weekday::Sun) => "Sunday",
            (Locale::Spanish, Weekday::Mon) => "Lunes",
            (Locale::Spanish, Weekday::Tue) => "Martes",
            (Locale::Spanish, Weekday::Wed) => "Miércoles",
            (Locale::Spanish, Weekday::Thu) => "Jueves",
            (Locale::Spanish, Weekday::Fri) => "Viernes",
            (Locale::Spanish, Weekday::Sat) => "Sábado",
            (Locale::Spanish, Weekday::Sun) => "Domingo",
        }
    }

    /// Label of the whole-range period option
    pub fn all_data_label(self) -> &'static str {
        match self {
            Locale::English => "All data",
            Locale::Spanish => "Todos los datos",
        }
    }

    /// Label of the first-half/second-half comparison
    pub fn halves_label(self) -> &'static str {
        match self {
            Locale::English => "first half vs second half",
            Locale::Spanish => "Primera mitad vs Segunda mitad",
        }
    }
}
