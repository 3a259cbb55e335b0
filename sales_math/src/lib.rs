//! # Sales Math
//!
//! Numeric building blocks for the sales analytics crates: medians,
//! means and percentages, with every denominator guarded.

pub mod stats;

pub use stats::{mean, median, pct_change, share_pct};
