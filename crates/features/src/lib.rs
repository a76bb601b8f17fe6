//! Feature computation for daily OHLCV series.
//!
//! This crate handles:
//! - Rolling window statistics (mean, sample standard deviation)
//! - Daily price change, momentum and range
//! - Rolling volume mean, deviation and z-score
//! - Rolling volatility of daily price change

pub mod engine;
pub mod rolling;

pub use engine::FeatureEngine;
pub use rolling::RollingStats;
