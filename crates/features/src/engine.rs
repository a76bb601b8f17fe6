//! Feature computation engine.
//!
//! Streams a date-ordered series one day at a time and derives the daily
//! features from rolling state.

use crate::rolling::RollingStats;
use behavior_core::{config::FeatureConfig, Config, EnrichedRecord, Features, OhlcvRecord};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Midpoint used when a day has no high-low range.
const NEUTRAL_PRICE_POSITION: f64 = 50.0;

/// Percent change from `base` to `value`, if defined.
fn pct_change(value: f64, base: f64) -> Option<f64> {
    let pct = (value / base - 1.0) * 100.0;
    pct.is_finite().then_some(pct)
}

/// Feature computation engine.
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    /// Rolling volume statistics.
    volume: RollingStats,
    /// Rolling statistics of daily price change.
    changes: RollingStats,
    /// Recent closes, newest last, for change and momentum.
    closes: VecDeque<f64>,
    momentum_period: usize,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::with_config(&FeatureConfig::default())
    }
}

impl FeatureEngine {
    /// Create a new feature engine from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_config(&config.features)
    }

    /// Create a feature engine from the feature section alone.
    pub fn with_config(config: &FeatureConfig) -> Self {
        let momentum_period = config.momentum_period.max(1);
        Self {
            volume: RollingStats::new(config.volume_window),
            changes: RollingStats::new(config.volatility_window),
            closes: VecDeque::with_capacity(momentum_period + 1),
            momentum_period,
        }
    }

    /// Feed the next day and return its features.
    pub fn add_record(&mut self, record: &OhlcvRecord) -> Features {
        let price_change_pct = self
            .closes
            .back()
            .and_then(|&prev| pct_change(record.close, prev));

        let momentum_5d = if self.closes.len() >= self.momentum_period {
            let base = self.closes[self.closes.len() - self.momentum_period];
            pct_change(record.close, base)
        } else {
            None
        };

        self.closes.push_back(record.close);
        while self.closes.len() > self.momentum_period {
            self.closes.pop_front();
        }

        self.volume.push(Some(record.volume));
        let volume_mean = self.volume.mean().unwrap_or(record.volume);
        let volume_std = self.volume.std_dev();
        let volume_zscore = volume_std
            .map(|std| (record.volume - volume_mean) / std)
            .filter(|z| z.is_finite())
            .unwrap_or(0.0);

        self.changes.push(price_change_pct);
        let volatility = self.changes.std_dev();

        let range = record.high - record.low;
        let daily_range = Some(range / record.low * 100.0).filter(|v| v.is_finite());
        let price_position = Some((record.close - record.low) / range * 100.0)
            .filter(|v| v.is_finite())
            .unwrap_or(NEUTRAL_PRICE_POSITION);

        Features {
            price_change_pct,
            volume_ma20: volume_mean,
            volume_mean,
            volume_std,
            volume_zscore,
            volatility,
            momentum_5d,
            daily_range,
            price_position,
        }
    }

    /// Compute features for a whole series.
    ///
    /// The input must be sorted ascending by date; state from any earlier
    /// calls is discarded first.
    pub fn compute(&mut self, records: &[OhlcvRecord]) -> Vec<EnrichedRecord> {
        self.clear();
        if records.windows(2).any(|w| w[0].date > w[1].date) {
            warn!("Feature input is not sorted by date; results are order-dependent");
        }

        let enriched: Vec<EnrichedRecord> = records
            .iter()
            .map(|record| EnrichedRecord {
                record: *record,
                features: self.add_record(record),
            })
            .collect();

        let undefined_vol = enriched.iter().filter(|r| r.features.volatility.is_none()).count();
        debug!("{} rows without defined volatility", undefined_vol);
        info!("Features computed for {} rows", enriched.len());
        enriched
    }

    /// Check if every rolling window is full.
    pub fn is_ready(&self) -> bool {
        self.volume.is_ready() && self.changes.is_ready()
    }

    /// Clear all state.
    pub fn clear(&mut self) {
        self.volume.clear();
        self.changes.clear();
        self.closes.clear();
    }
}
