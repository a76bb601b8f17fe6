//! Rule-based investor behavior classification.
//!
//! This crate handles:
//! - The ordered behavior rule table
//! - Per-day labelling and batch-normalized confidence
//! - Whole-series behavior summaries and recent-window insights

pub mod classifier;
pub mod rules;
pub mod summary;

pub use classifier::{BehaviorClassifier, ClassificationStats};
pub use rules::{BehaviorRule, PriceCondition};
pub use summary::{BehaviorCount, BehaviorSummary, Incident, Insight, RecentTrend, RiskLevel};
