//! Rolling window statistics.
//!
//! The window spans the last `window` observations. Undefined observations
//! occupy a slot but are skipped by every statistic, and a statistic is
//! produced as soon as one defined value is available.

use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Rolling mean and sample standard deviation over a fixed window.
#[derive(Debug, Clone)]
pub struct RollingStats {
    /// Window size in periods.
    window: usize,
    /// Recent observations, oldest first.
    values: VecDeque<Option<f64>>,
}

impl RollingStats {
    /// Create a new rolling calculator.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Add an observation. Non-finite values count as undefined.
    pub fn push(&mut self, value: Option<f64>) {
        if self.values.len() >= self.window {
            self.values.pop_front();
        }
        self.values.push_back(value.filter(|v| v.is_finite()));
    }

    fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }

    /// Mean of the defined values in the window.
    pub fn mean(&self) -> Option<f64> {
        if self.count() == 0 {
            return None;
        }
        Some(self.defined().mean())
    }

    /// Sample standard deviation (n - 1) of the defined values.
    ///
    /// Needs at least two defined values.
    pub fn std_dev(&self) -> Option<f64> {
        if self.count() < 2 {
            return None;
        }
        let std = self.defined().std_dev();
        std.is_finite().then_some(std)
    }

    /// Number of defined values in the window.
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.values.len() >= self.window
    }

    /// Clear all data.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
