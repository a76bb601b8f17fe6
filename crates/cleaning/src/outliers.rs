//! Outlier detection and removal.
//!
//! Each numeric column is screened independently; a row is an outlier if any
//! column flags it. Detection never mutates the data, removal is a separate
//! step the caller opts into.

use behavior_core::{
    config::{OutlierConfig, OutlierMethod},
    CleaningReport, Field, OhlcvRecord,
};
use ordered_float::OrderedFloat;
use statrs::statistics::Statistics;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Linear-interpolated quantile of an ascending slice (`pos = q * (n - 1)`).
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Flags extreme values per column with IQR fences or z-scores.
#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    method: OutlierMethod,
    threshold: f64,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::from_config(&OutlierConfig::default())
    }
}

impl OutlierDetector {
    /// Create a detector with an explicit method and multiplier.
    pub fn new(method: OutlierMethod, threshold: f64) -> Self {
        Self { method, threshold }
    }

    /// Create a detector from configuration.
    pub fn from_config(config: &OutlierConfig) -> Self {
        Self::new(config.method, config.threshold)
    }

    pub fn method(&self) -> OutlierMethod {
        self.method
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Indices of the flagged values in one column.
    pub fn flag_column(&self, values: &[f64]) -> Vec<usize> {
        match self.method {
            OutlierMethod::Iqr => self.flag_iqr(values),
            OutlierMethod::Zscore => self.flag_zscore(values),
        }
    }

    fn flag_iqr(&self, values: &[f64]) -> Vec<usize> {
        let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
        sorted.sort();
        let sorted: Vec<f64> = sorted.into_iter().map(|v| v.into_inner()).collect();

        let (Some(q1), Some(q3)) = (quantile(&sorted, 0.25), quantile(&sorted, 0.75)) else {
            return Vec::new();
        };
        let iqr = q3 - q1;
        let lower = q1 - self.threshold * iqr;
        let upper = q3 + self.threshold * iqr;

        values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v < lower || v > upper)
            .map(|(i, _)| i)
            .collect()
    }

    fn flag_zscore(&self, values: &[f64]) -> Vec<usize> {
        let mean = values.iter().mean();
        let std = values.iter().std_dev();
        // undefined or zero spread flags nothing
        if !(std.is_finite() && std > 0.0) {
            return Vec::new();
        }

        values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| ((v - mean) / std).abs() > self.threshold)
            .map(|(i, _)| i)
            .collect()
    }

    /// Union of flagged row indices across all numeric columns, ascending.
    pub fn detect(&self, records: &[OhlcvRecord], report: &mut CleaningReport) -> Vec<usize> {
        let mut flagged = BTreeSet::new();

        for field in Field::NUMERIC {
            let column: Vec<f64> = records.iter().map(|r| r.value(field)).collect();
            let hits = self.flag_column(&column);
            if !hits.is_empty() {
                debug!("{}: {} outliers detected", field, hits.len());
            }
            flagged.extend(hits);
        }

        report.outliers_detected = flagged.len();
        info!(
            "Total outliers detected: {} (method: {}, k = {})",
            flagged.len(),
            self.method,
            self.threshold
        );
        flagged.into_iter().collect()
    }

    /// Delete the rows at `indices`, preserving the order of the rest.
    pub fn remove(
        &self,
        records: Vec<OhlcvRecord>,
        indices: &[usize],
        report: &mut CleaningReport,
    ) -> Vec<OhlcvRecord> {
        if indices.is_empty() {
            return records;
        }

        let drop: BTreeSet<usize> = indices.iter().copied().collect();
        let before = records.len();
        let kept: Vec<OhlcvRecord> = records
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !drop.contains(i))
            .map(|(_, r)| r)
            .collect();

        let removed = before - kept.len();
        report.outliers_removed = removed;
        info!("Removed {} outlier rows", removed);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    const HIGHS: [f64; 10] = [102.0, 104.0, 106.0, 107.0, 500.0, 109.0, 112.0, 110.0, 114.0, 117.0];

    fn series() -> Vec<OhlcvRecord> {
        HIGHS
            .iter()
            .enumerate()
            .map(|(i, &high)| {
                let base = 100.0 + i as f64 * 1.5;
                OhlcvRecord {
                    date: NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap(),
                    open: base,
                    high,
                    low: base - 1.0,
                    close: base + 0.5,
                    volume: 1_000_000.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_quantile_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&sorted, 0.25).unwrap(), 1.75);
        assert_relative_eq!(quantile(&sorted, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile(&sorted, 1.0).unwrap(), 4.0);
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn test_iqr_flags_spike_and_removes_it() {
        let detector = OutlierDetector::new(OutlierMethod::Iqr, 3.0);
        let records = series();
        let mut report = CleaningReport::new(records.len());

        let flagged = detector.detect(&records, &mut report);
        assert_eq!(flagged, vec![4]);
        assert_eq!(report.outliers_detected, 1);

        let cleaned = detector.remove(records, &flagged, &mut report);
        assert_eq!(cleaned.len(), 9);
        assert!(cleaned.iter().all(|r| r.high != 500.0));
        assert_eq!(report.outliers_removed, 1);
    }

    #[test]
    fn test_detection_does_not_remove() {
        let detector = OutlierDetector::default();
        let records = series();
        let mut report = CleaningReport::new(records.len());
        let _ = detector.detect(&records, &mut report);
        assert_eq!(report.outliers_removed, 0);
    }

    #[test]
    fn test_union_across_columns() {
        let mut records = series();
        records[7].volume = 90_000_000.0;
        let detector = OutlierDetector::new(OutlierMethod::Iqr, 3.0);
        let mut report = CleaningReport::new(records.len());
        assert_eq!(detector.detect(&records, &mut report), vec![4, 7]);
    }

    #[test]
    fn test_zscore() {
        let mut values = vec![10.0; 20];
        values[13] = 100.0;
        let detector = OutlierDetector::new(OutlierMethod::Zscore, 3.0);
        assert_eq!(detector.flag_column(&values), vec![13]);
    }

    #[test]
    fn test_zscore_constant_column_flags_nothing() {
        let detector = OutlierDetector::new(OutlierMethod::Zscore, 3.0);
        assert!(detector.flag_column(&[5.0; 8]).is_empty());
        assert!(detector.flag_column(&[5.0]).is_empty());
        assert!(detector.flag_column(&[]).is_empty());
    }

    #[test]
    fn test_remove_nothing_is_noop() {
        let detector = OutlierDetector::default();
        let records = series();
        let mut report = CleaningReport::new(records.len());
        let out = detector.remove(records.clone(), &[], &mut report);
        assert_eq!(out, records);
        assert_eq!(report.outliers_removed, 0);
    }
}
