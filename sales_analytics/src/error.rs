//! Error types for the sales_analytics crate
//!
//! Empty inputs are never errors here: an empty period or basket set
//! degrades to an empty result. These variants cover malformed input
//! files, bad parameters and I/O.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_analytics crate
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A required column is absent from the input table
    #[error("Missing column: '{0}'")]
    MissingColumn(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A value could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error while writing CSV output
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error while encoding JSON output
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl From<PolarsError> for AnalyticsError {
    fn from(err: PolarsError) -> Self {
        AnalyticsError::PolarsError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AnalyticsError {
    fn from(err: std::num::ParseIntError) -> Self {
        AnalyticsError::ParseError(err.to_string())
    }
}

impl From<chrono::ParseError> for AnalyticsError {
    fn from(err: chrono::ParseError) -> Self {
        AnalyticsError::ParseError(err.to_string())
    }
}
