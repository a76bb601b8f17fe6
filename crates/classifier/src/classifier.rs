//! Behavior classification.
//!
//! Every day is checked against the whole rule table; when several rules
//! match, the last one in table order wins. Confidence is then rescaled
//! across the batch so the strongest signal scores 100.

use crate::rules::BehaviorRule;
use behavior_core::{
    config::BehaviorConfig, Behavior, ClassifiedRecord, Config, EnrichedRecord, Features,
};
use ordered_float::OrderedFloat;
use tracing::{debug, info};

/// Label counts for one classified batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Days classified.
    pub total_days: usize,
    pub normal_days: usize,
    pub panic_days: usize,
    pub fomo_days: usize,
    pub overconfidence_days: usize,
}

impl ClassificationStats {
    /// Tally the labels of a classified batch.
    pub fn from_records(records: &[ClassifiedRecord]) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.record(record.behavior);
        }
        stats
    }

    fn record(&mut self, behavior: Behavior) {
        self.total_days += 1;
        match behavior {
            Behavior::Normal => self.normal_days += 1,
            Behavior::PanicSelling => self.panic_days += 1,
            Behavior::FomoBuying => self.fomo_days += 1,
            Behavior::Overconfidence => self.overconfidence_days += 1,
        }
    }

    /// Days carrying a given label.
    pub fn count(&self, behavior: Behavior) -> usize {
        match behavior {
            Behavior::Normal => self.normal_days,
            Behavior::PanicSelling => self.panic_days,
            Behavior::FomoBuying => self.fomo_days,
            Behavior::Overconfidence => self.overconfidence_days,
        }
    }

    /// Days with any label other than `Normal`.
    pub fn signal_days(&self) -> usize {
        self.total_days - self.normal_days
    }
}

/// Labels days with investor behaviors from their features.
#[derive(Debug, Clone)]
pub struct BehaviorClassifier {
    rules: Vec<BehaviorRule>,
}

impl Default for BehaviorClassifier {
    fn default() -> Self {
        Self::with_config(&BehaviorConfig::default())
    }
}

impl BehaviorClassifier {
    /// Create a classifier from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_config(&config.behavior)
    }

    /// Create a classifier from the behavior thresholds alone.
    pub fn with_config(config: &BehaviorConfig) -> Self {
        Self::from_rules(BehaviorRule::table(config))
    }

    /// Create a classifier from an explicit rule table.
    pub fn from_rules(rules: Vec<BehaviorRule>) -> Self {
        Self { rules }
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[BehaviorRule] {
        &self.rules
    }

    /// Label one day and return its raw confidence.
    pub fn classify_day(&self, features: &Features) -> (Behavior, f64) {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(features))
            .map(|rule| (rule.behavior, rule.raw_confidence(features)))
            .unwrap_or((Behavior::Normal, 0.0))
    }

    /// Classify a whole series and normalize confidence across it.
    pub fn classify(&self, records: Vec<EnrichedRecord>) -> Vec<ClassifiedRecord> {
        let mut classified: Vec<ClassifiedRecord> = records
            .into_iter()
            .map(|enriched| {
                let (behavior, confidence_score) = self.classify_day(&enriched.features);
                ClassifiedRecord {
                    enriched,
                    behavior,
                    confidence_score,
                    sentiment: None,
                }
            })
            .collect();

        normalize_confidence(&mut classified);

        let stats = ClassificationStats::from_records(&classified);
        for behavior in Behavior::ALL {
            debug!("{}: {} days", behavior, stats.count(behavior));
        }
        info!(
            "Classified {} days: {} panic, {} FOMO, {} overconfidence",
            stats.total_days, stats.panic_days, stats.fomo_days, stats.overconfidence_days
        );
        classified
    }
}

/// Rescale scores to `score / max * 100` when the batch maximum is positive.
fn normalize_confidence(records: &mut [ClassifiedRecord]) {
    let max = records
        .iter()
        .map(|r| OrderedFloat(r.confidence_score))
        .max()
        .map(OrderedFloat::into_inner)
        .unwrap_or(0.0);

    for record in records.iter_mut() {
        let score = if record.behavior == Behavior::Normal {
            0.0
        } else if max > 0.0 {
            record.confidence_score / max * 100.0
        } else {
            record.confidence_score
        };
        record.confidence_score = score.clamp(0.0, 100.0);
    }
}
