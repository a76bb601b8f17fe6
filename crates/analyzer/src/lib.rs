//! End-to-end behavior analysis.
//!
//! Wires the cleaning pipeline, feature engine and behavior classifier into
//! a single call per dataset, plus sequential batch analysis over several
//! named datasets.

pub mod analyzer;
pub mod batch;
pub mod sentiment;

pub use analyzer::{analyze, Analysis, BehaviorAnalyzer};
pub use batch::{analyze_batch, BatchReport, BatchRow, BatchUnit};
pub use sentiment::SentimentSource;
