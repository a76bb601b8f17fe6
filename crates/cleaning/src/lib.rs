//! Data-quality pipeline for daily OHLCV series.
//!
//! This crate handles:
//! - Missing-value imputation (forward fill, interpolation, drop, mean)
//! - Same-date duplicate removal
//! - Outlier detection and removal (IQR, z-score)
//! - Non-fatal price-logic checks
//! - Composite data quality scoring
//! - The end-to-end cleaning pipeline

pub mod duplicates;
pub mod missing;
pub mod outliers;
pub mod pipeline;
pub mod price_logic;
pub mod quality;

pub use duplicates::DuplicateResolver;
pub use missing::MissingValueResolver;
pub use outliers::OutlierDetector;
pub use pipeline::{CleanedDataset, CleaningPipeline};
pub use price_logic::PriceLogicValidator;
pub use quality::{compute_quality_score, score_report};
