//! Whole-series behavior summaries and recent-window insights.

use crate::classifier::ClassificationStats;
use behavior_core::{config::SummaryConfig, Behavior, ClassifiedRecord};
use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::fmt;

/// Share of non-`Normal` days, bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    LowModerate,
    Moderate,
    High,
}

impl RiskLevel {
    /// Bucket a risk percentage (strict lower bounds 30, 20, 10).
    pub fn from_pct(pct: f64) -> Self {
        if pct > 30.0 {
            RiskLevel::High
        } else if pct > 20.0 {
            RiskLevel::Moderate
        } else if pct > 10.0 {
            RiskLevel::LowModerate
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low",
            RiskLevel::LowModerate => "Low-Moderate",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        })
    }
}

/// A single signal day worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Incident {
    pub date: NaiveDate,
    pub price_change_pct: Option<f64>,
    pub volume_zscore: f64,
    pub volatility: Option<f64>,
    pub confidence_score: f64,
}

impl Incident {
    fn from_record(record: &ClassifiedRecord) -> Self {
        let features = record.features();
        Self {
            date: record.date(),
            price_change_pct: features.price_change_pct,
            volume_zscore: features.volume_zscore,
            volatility: features.volatility,
            confidence_score: record.confidence_score,
        }
    }

    /// Ranking key: overconfidence days rank by volume spike, the others
    /// by confidence.
    fn strength(&self, behavior: Behavior) -> f64 {
        match behavior {
            Behavior::Overconfidence => self.volume_zscore,
            _ => self.confidence_score,
        }
    }
}

/// Days and share of one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorCount {
    pub behavior: Behavior,
    pub days: usize,
    /// Percentage of all days.
    pub pct: f64,
    /// Mean confidence of the label's days, `None` when it never occurs.
    pub avg_confidence: Option<f64>,
    /// Strongest days first. Always empty for `Normal`.
    pub top_incidents: Vec<Incident>,
}

impl BehaviorCount {
    fn from_records(
        behavior: Behavior,
        records: &[ClassifiedRecord],
        days: usize,
        limit: usize,
    ) -> Self {
        let labelled = || records.iter().filter(|r| r.behavior == behavior);

        let mut top_incidents: Vec<Incident> = if behavior.is_signal() {
            labelled().map(Incident::from_record).collect()
        } else {
            Vec::new()
        };
        // stable, so equally strong days stay in date order
        top_incidents.sort_by_key(|i| std::cmp::Reverse(OrderedFloat(i.strength(behavior))));
        top_incidents.truncate(limit);

        Self {
            behavior,
            days,
            pct: days as f64 / records.len().max(1) as f64 * 100.0,
            avg_confidence: mean(labelled().map(|r| r.confidence_score)),
            top_incidents,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.map(OrderedFloat).max().map(OrderedFloat::into_inner)
}

fn min(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.map(OrderedFloat).min().map(OrderedFloat::into_inner)
}

/// Aggregate view of a classified series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorSummary {
    pub total_days: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// One entry per label, in reporting order.
    pub counts: Vec<BehaviorCount>,
    /// Percent change from first to last close.
    pub total_return_pct: f64,
    pub avg_volatility: Option<f64>,
    pub max_volatility: Option<f64>,
    /// Days whose volatility exceeds the configured threshold.
    pub high_volatility_days: usize,
    /// Percentage of non-`Normal` days.
    pub risk_pct: f64,
    pub risk_level: RiskLevel,
    /// Highest high.
    pub max_price: f64,
    /// Lowest low.
    pub min_price: f64,
    /// First open.
    pub start_price: f64,
    /// Last close.
    pub end_price: f64,
}

impl BehaviorSummary {
    /// Summarize a date-ordered classified series. `None` when empty.
    pub fn from_records(records: &[ClassifiedRecord], config: &SummaryConfig) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;
        let stats = ClassificationStats::from_records(records);
        let total = records.len() as f64;

        let counts = Behavior::ALL
            .iter()
            .map(|&behavior| {
                BehaviorCount::from_records(
                    behavior,
                    records,
                    stats.count(behavior),
                    config.top_incidents,
                )
            })
            .collect();

        let volatility = || records.iter().filter_map(|r| r.features().volatility);
        let risk_pct = stats.signal_days() as f64 / total * 100.0;

        Some(Self {
            total_days: records.len(),
            start_date: first.date(),
            end_date: last.date(),
            counts,
            total_return_pct: (last.record().close - first.record().close) / first.record().close
                * 100.0,
            avg_volatility: mean(volatility()),
            max_volatility: max(volatility()),
            high_volatility_days: volatility().filter(|&v| v > config.high_volatility).count(),
            risk_pct,
            risk_level: RiskLevel::from_pct(risk_pct),
            max_price: max(records.iter().map(|r| r.record().high)).unwrap_or(f64::NAN),
            min_price: min(records.iter().map(|r| r.record().low)).unwrap_or(f64::NAN),
            start_price: first.record().open,
            end_price: last.record().close,
        })
    }

    /// Entry for a given label.
    pub fn behavior(&self, behavior: Behavior) -> Option<&BehaviorCount> {
        self.counts.iter().find(|c| c.behavior == behavior)
    }

    /// Days carrying a given label.
    pub fn count(&self, behavior: Behavior) -> usize {
        self.behavior(behavior).map_or(0, |c| c.days)
    }
}

/// A signal raised from the recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Insight {
    RecentPanicSelling { days: usize },
    RecentFomoBuying { days: usize },
    /// Repeated overconfidence days.
    Overtrading { days: usize },
    StableConditions { days: usize },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::RecentPanicSelling { days } => {
                write!(f, "Recent panic selling detected ({} days)", days)
            }
            Insight::RecentFomoBuying { days } => {
                write!(f, "Recent FOMO buying detected ({} days)", days)
            }
            Insight::Overtrading { days } => write!(f, "Overtrading detected ({} days)", days),
            Insight::StableConditions { days } => {
                write!(f, "Stable market conditions ({} normal days)", days)
            }
        }
    }
}

/// Behavior over the trailing window of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTrend {
    /// Rows actually inspected (at most the configured window).
    pub days: usize,
    pub avg_price_change: Option<f64>,
    pub avg_volatility: Option<f64>,
    /// Most frequent label; ties go to the earlier label in reporting order.
    pub dominant: Behavior,
    pub insights: Vec<Insight>,
}

impl RecentTrend {
    /// Inspect the last `config.recent_window` rows. `None` when empty.
    pub fn from_records(records: &[ClassifiedRecord], config: &SummaryConfig) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let start = records.len().saturating_sub(config.recent_window);
        let recent = &records[start..];
        let stats = ClassificationStats::from_records(recent);

        let mut dominant = Behavior::Normal;
        for behavior in Behavior::ALL {
            if stats.count(behavior) > stats.count(dominant) {
                dominant = behavior;
            }
        }

        let mut insights = Vec::new();
        let signals = [
            (stats.panic_days, Insight::RecentPanicSelling { days: stats.panic_days }),
            (stats.fomo_days, Insight::RecentFomoBuying { days: stats.fomo_days }),
            (
                stats.overconfidence_days,
                Insight::Overtrading { days: stats.overconfidence_days },
            ),
        ];
        for (days, insight) in signals {
            if days >= config.signal_min_days {
                insights.push(insight);
            }
        }
        if stats.normal_days >= config.stable_min_days {
            insights.push(Insight::StableConditions { days: stats.normal_days });
        }

        Some(Self {
            days: recent.len(),
            avg_price_change: mean(recent.iter().filter_map(|r| r.features().price_change_pct)),
            avg_volatility: mean(recent.iter().filter_map(|r| r.features().volatility)),
            dominant,
            insights,
        })
    }
}
