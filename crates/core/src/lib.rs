//! Core types and configuration for the OHLCV behavior analysis system.
//!
//! This crate provides shared types used across all other crates:
//! - Raw tabular input (cells, tables) and canonical field names
//! - Cleaned, enriched and classified daily records
//! - The per-run cleaning report
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod report;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use report::{CleaningReport, PriceIssue, PriceIssueKind, QualityRating};
pub use types::*;
