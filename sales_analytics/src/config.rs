//! Analytics configuration
//!
//! Settings come from an optional TOML file layered with `SALES__*`
//! environment variables. Every field has a default, so an empty
//! configuration is valid.

use crate::error::{AnalyticsError, Result};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Names of the three input columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub timestamp: String,
    pub product: String,
    pub quantity: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            timestamp: "fecha_hora".to_string(),
            product: "producto".to_string(),
            quantity: "cantidad".to_string(),
        }
    }
}

/// Basket mining settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasketSettings {
    /// Keep only the most frequent pairs/triples; `None` keeps all of them.
    pub top_n: Option<usize>,
    /// Products left out of basket mining
    pub exclude: Vec<String>,
}

impl Default for BasketSettings {
    fn default() -> Self {
        Self {
            top_n: Some(20),
            exclude: Vec::new(),
        }
    }
}

/// Special-date comparison settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialDateSettings {
    /// Percentage above (or below) the baseline that marks a special (or slow) day
    pub threshold_pct: f64,
}

impl Default for SpecialDateSettings {
    fn default() -> Self {
        Self {
            threshold_pct: 20.0,
        }
    }
}

/// The root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub columns: ColumnNames,
    pub basket: BasketSettings,
    pub special_dates: SpecialDateSettings,
    pub locale: Locale,
}

impl AnalyticsConfig {
    /// Check values the type system cannot
    pub fn validate(&self) -> Result<()> {
        if self.basket.top_n == Some(0) {
            return Err(AnalyticsError::InvalidParameter(
                "basket.top_n must be greater than zero".to_string(),
            ));
        }
        if !self.special_dates.threshold_pct.is_finite() || self.special_dates.threshold_pct < 0.0
        {
            return Err(AnalyticsError::InvalidParameter(format!(
                "special_dates.threshold_pct must be a non-negative number, got {}",
                self.special_dates.threshold_pct
            )));
        }
        let columns = &self.columns;
        if columns.timestamp.is_empty() || columns.product.is_empty() || columns.quantity.is_empty()
        {
            return Err(AnalyticsError::InvalidParameter(
                "column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads the configuration from `path` (if given) and the environment.
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        debug!(path = %path.display(), "reading configuration file");
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix("SALES").separator("__"))
        .build()?;

    let config = settings.try_deserialize::<AnalyticsConfig>()?;
    config.validate()?;

    Ok(config)
}
