//! Configuration structures for the behavior analysis system.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Main configuration for a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cleaning pipeline configuration.
    pub cleaning: CleaningConfig,
    /// Outlier detection configuration.
    pub outliers: OutlierConfig,
    /// Feature engine windows.
    pub features: FeatureConfig,
    /// Behavior rule thresholds.
    pub behavior: BehaviorConfig,
    /// Batch summary configuration.
    pub summary: SummaryConfig,
}

impl Config {
    /// Parse a configuration from JSON. Absent sections take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> Result<()> {
        let t = self.outliers.threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(Error::config(format!(
                "outlier threshold must be a finite non-negative number, got {}",
                t
            )));
        }

        let windows = [
            ("features.volume_window", self.features.volume_window),
            ("features.volatility_window", self.features.volatility_window),
            ("features.momentum_period", self.features.momentum_period),
            ("summary.recent_window", self.summary.recent_window),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(Error::config(format!("{} must be at least 1", name)));
            }
        }

        for (name, rule) in [
            ("panic", &self.behavior.panic),
            ("fomo", &self.behavior.fomo),
            ("overconfidence", &self.behavior.overconfidence),
        ] {
            if !(rule.price_change.is_finite()
                && rule.volume_zscore.is_finite()
                && rule.volatility.is_finite())
            {
                return Err(Error::config(format!(
                    "behavior.{} thresholds must be finite",
                    name
                )));
            }
        }

        if !self.summary.high_volatility.is_finite() {
            return Err(Error::config("summary.high_volatility must be finite"));
        }

        Ok(())
    }
}

/// Imputation strategy for missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Carry the last known price forward; missing volume becomes 0.
    #[default]
    ForwardFill,
    /// Linear interpolation between known neighbors.
    Interpolate,
    /// Remove rows with any missing value.
    Drop,
    /// Replace with the whole-series mean of the field.
    Mean,
}

impl MissingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MissingStrategy::ForwardFill => "forward_fill",
            MissingStrategy::Interpolate => "interpolate",
            MissingStrategy::Drop => "drop",
            MissingStrategy::Mean => "mean",
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward_fill" | "ffill" => Ok(MissingStrategy::ForwardFill),
            "interpolate" => Ok(MissingStrategy::Interpolate),
            "drop" => Ok(MissingStrategy::Drop),
            "mean" => Ok(MissingStrategy::Mean),
            other => Err(Error::config(format!(
                "unknown missing-value strategy '{}', expected one of forward_fill, interpolate, drop, mean",
                other
            ))),
        }
    }
}

/// Cleaning pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Strategy for missing values.
    pub missing_strategy: MissingStrategy,
    /// Delete rows flagged by the outlier detector.
    pub remove_outliers: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            missing_strategy: MissingStrategy::ForwardFill,
            remove_outliers: true,
        }
    }
}

/// Outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Interquartile range fences.
    #[default]
    Iqr,
    /// Absolute z-score against the column mean.
    Zscore,
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutlierMethod::Iqr => "iqr",
            OutlierMethod::Zscore => "zscore",
        })
    }
}

impl FromStr for OutlierMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(OutlierMethod::Iqr),
            "zscore" | "z-score" | "z_score" => Ok(OutlierMethod::Zscore),
            other => Err(Error::config(format!(
                "unknown outlier method '{}', expected iqr or zscore",
                other
            ))),
        }
    }
}

/// Outlier detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    /// Detection method.
    pub method: OutlierMethod,
    /// Multiplier k: IQR fence width or z-score cutoff.
    pub threshold: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            method: OutlierMethod::Iqr,
            threshold: 3.0,
        }
    }
}

/// Feature engine window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Rolling window for volume mean / std / z-score.
    pub volume_window: usize,
    /// Rolling window for volatility of daily price change.
    pub volatility_window: usize,
    /// Lookback for momentum.
    pub momentum_period: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            volume_window: 20,
            volatility_window: 7,
            momentum_period: 5,
        }
    }
}

/// Thresholds for a single behavior rule.
///
/// `price_change` is read per rule: an upper bound for panic selling, a lower
/// bound for FOMO buying and a bound on the absolute change for overconfidence.
/// The volume and volatility thresholds are strict lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    pub price_change: f64,
    pub volume_zscore: f64,
    pub volatility: f64,
}

/// Behavior classification thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub panic: RuleThresholds,
    pub fomo: RuleThresholds,
    pub overconfidence: RuleThresholds,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            panic: RuleThresholds {
                price_change: -2.5,
                volume_zscore: 1.5,
                volatility: 2.0,
            },
            fomo: RuleThresholds {
                price_change: 2.5,
                volume_zscore: 1.5,
                volatility: 1.5,
            },
            overconfidence: RuleThresholds {
                price_change: 1.0,
                volume_zscore: 2.0,
                volatility: 1.8,
            },
        }
    }
}

/// Behavior summary configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Trailing rows considered "recent".
    pub recent_window: usize,
    /// Occurrences of a signal label in the recent window that raise an insight.
    pub signal_min_days: usize,
    /// Occurrences of `Normal` in the recent window that mark stable conditions.
    pub stable_min_days: usize,
    /// Volatility above which a day counts as highly volatile.
    pub high_volatility: f64,
    /// Strongest incidents kept per signal label.
    pub top_incidents: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            recent_window: 10,
            signal_min_days: 2,
            stable_min_days: 7,
            high_volatility: 2.0,
            top_incidents: 3,
        }
    }
}
