//! Missing-value resolution.
//!
//! Applies one imputation strategy to the numeric fields, then drops any row
//! that still has a gap (including rows whose date could not be parsed).

use behavior_core::{config::MissingStrategy, CleaningReport, Field, OhlcvRecord, PartialRecord};
use tracing::{debug, info, warn};

/// Imputes missing values with a fixed strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValueResolver {
    strategy: MissingStrategy,
}

impl MissingValueResolver {
    /// Create a resolver for the given strategy.
    pub fn new(strategy: MissingStrategy) -> Self {
        Self { strategy }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> MissingStrategy {
        self.strategy
    }

    /// Resolve gaps and return the complete rows, in their original order.
    pub fn resolve(
        &self,
        mut rows: Vec<PartialRecord>,
        report: &mut CleaningReport,
    ) -> Vec<OhlcvRecord> {
        let total_missing: usize = rows.iter().map(PartialRecord::missing_numeric_count).sum();
        let undated = rows.iter().filter(|r| r.date.is_none()).count();

        report.missing_values_found = total_missing;
        report.missing_dates = undated;
        if undated > 0 {
            warn!("{} rows without a valid date will be dropped", undated);
        }
        if total_missing == 0 {
            report.missing_values_handled = 0;
            info!("No missing values found");
            return rows.iter().filter_map(PartialRecord::to_record).collect();
        }

        for field in Field::NUMERIC {
            let count = rows.iter().filter(|r| r.is_missing(field)).count();
            if count > 0 {
                debug!("{}: {} missing", field, count);
            }
        }

        match self.strategy {
            MissingStrategy::ForwardFill => forward_fill(&mut rows),
            MissingStrategy::Interpolate => {
                for field in Field::NUMERIC {
                    interpolate(&mut rows, field);
                }
            }
            MissingStrategy::Drop => {}
            MissingStrategy::Mean => {
                for field in Field::NUMERIC {
                    fill_mean(&mut rows, field);
                }
            }
        }

        let dated = rows.len() - undated;
        let complete: Vec<OhlcvRecord> = rows.iter().filter_map(PartialRecord::to_record).collect();
        let dropped = dated.saturating_sub(complete.len());
        if dropped > 0 {
            match self.strategy {
                MissingStrategy::Drop => debug!("Dropped {} incomplete rows", dropped),
                _ => warn!("Dropped {} rows still incomplete after {}", dropped, self.strategy),
            }
        }

        // Nothing is left missing once incomplete rows are gone.
        report.missing_values_handled = total_missing;
        info!(
            "Handled {} missing values (strategy: {})",
            total_missing, self.strategy
        );
        complete
    }
}

/// Carry the last known price forward; missing volume becomes zero.
fn forward_fill(rows: &mut [PartialRecord]) {
    for field in Field::PRICES {
        let mut last: Option<f64> = None;
        for row in rows.iter_mut() {
            match row.value(field) {
                Some(v) => last = Some(v),
                None => row.set_value(field, last),
            }
        }
    }
    for row in rows.iter_mut() {
        if row.volume.is_none() {
            row.volume = Some(0.0);
        }
    }
}

/// Linear interpolation by row position.
///
/// Interior gaps are filled on the line between their known neighbors,
/// trailing gaps repeat the last known value, leading gaps stay missing.
fn interpolate(rows: &mut [PartialRecord], field: Field) {
    let mut prev: Option<(usize, f64)> = None;
    for idx in 0..rows.len() {
        if let Some(v) = rows[idx].value(field) {
            if let Some((p, pv)) = prev {
                let span = (idx - p) as f64;
                for k in (p + 1)..idx {
                    let t = (k - p) as f64 / span;
                    rows[k].set_value(field, Some(pv + (v - pv) * t));
                }
            }
            prev = Some((idx, v));
        }
    }

    if let Some((p, pv)) = prev {
        for row in rows.iter_mut().skip(p + 1) {
            row.set_value(field, Some(pv));
        }
    }
}

/// Replace gaps with the mean of the known values of the field.
fn fill_mean(rows: &mut [PartialRecord], field: Field) {
    let (sum, n) = rows
        .iter()
        .filter_map(|r| r.value(field))
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return;
    }
    let mean = sum / n as f64;
    for row in rows.iter_mut().filter(|r| r.value(field).is_none()) {
        row.set_value(field, Some(mean));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, d)
    }

    /// The 10-row demo series with Open[2] and Volume[3] missing.
    fn sample() -> Vec<PartialRecord> {
        let open = [Some(100.0), Some(102.0), None, Some(105.0), Some(103.0), Some(107.0), Some(110.0), Some(108.0), Some(112.0), Some(115.0)];
        let high = [102.0, 104.0, 106.0, 107.0, 105.0, 109.0, 112.0, 110.0, 114.0, 117.0];
        let low = [99.0, 101.0, 103.0, 104.0, 102.0, 106.0, 109.0, 107.0, 111.0, 114.0];
        let close = [101.0, 103.0, 105.0, 106.0, 104.0, 108.0, 111.0, 109.0, 113.0, 116.0];
        let volume = [Some(1.0e6), Some(1.2e6), Some(1.1e6), None, Some(1.3e6), Some(1.5e6), Some(1.4e6), Some(1.6e6), Some(1.7e6), Some(1.8e6)];
        (0..10)
            .map(|i| PartialRecord {
                date: day(i as u32 + 1),
                open: open[i],
                high: Some(high[i]),
                low: Some(low[i]),
                close: Some(close[i]),
                volume: volume[i],
            })
            .collect()
    }

    #[test]
    fn test_no_missing_is_noop() {
        let mut rows = sample();
        rows[2].open = Some(104.0);
        rows[3].volume = Some(1.25e6);
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::default().resolve(rows, &mut report);
        assert_eq!(out.len(), 10);
        assert_eq!(report.missing_values_found, 0);
        assert_eq!(report.missing_values_handled, 0);
    }

    #[test]
    fn test_forward_fill_close() {
        let mut rows = sample();
        rows[2].close = None;
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::new(MissingStrategy::ForwardFill).resolve(rows, &mut report);

        assert_eq!(out.len(), 10);
        assert_eq!(out[2].close, out[1].close);
        assert_eq!(out[2].close, 103.0);
        assert_eq!(out[2].open, 102.0);
        assert_eq!(out[3].volume, 0.0);
        assert_eq!(report.missing_values_found, 3);
        assert_eq!(report.missing_values_handled, 3);
    }

    #[test]
    fn test_forward_fill_leading_gap_dropped() {
        let mut rows = sample();
        rows[0].high = None;
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::new(MissingStrategy::ForwardFill).resolve(rows, &mut report);
        assert_eq!(out.len(), 9);
        assert_eq!(out[0].date, day(2).unwrap());
    }

    #[test]
    fn test_interpolate() {
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::new(MissingStrategy::Interpolate).resolve(sample(), &mut report);
        assert_eq!(out.len(), 10);
        assert_relative_eq!(out[2].open, 103.5);
        assert_relative_eq!(out[3].volume, 1.2e6);
    }

    #[test]
    fn test_interpolate_trailing_and_leading() {
        let mut rows = sample();
        rows[0].close = None;
        rows[8].close = None;
        rows[9].close = None;
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::new(MissingStrategy::Interpolate).resolve(rows, &mut report);
        // leading gap cannot be interpolated
        assert_eq!(out.len(), 9);
        assert_eq!(out.last().unwrap().close, 109.0);
        assert_eq!(out[7].close, 109.0);
    }

    #[test]
    fn test_drop_strategy() {
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::new(MissingStrategy::Drop).resolve(sample(), &mut report);
        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|r| r.date != day(3).unwrap() && r.date != day(4).unwrap()));
        assert_eq!(report.missing_values_handled, 2);
    }

    #[test]
    fn test_mean_strategy() {
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::new(MissingStrategy::Mean).resolve(sample(), &mut report);
        assert_eq!(out.len(), 10);
        let expected_open = (100.0 + 102.0 + 105.0 + 103.0 + 107.0 + 110.0 + 108.0 + 112.0 + 115.0) / 9.0;
        assert_relative_eq!(out[2].open, expected_open);
        let expected_volume = (1.0 + 1.2 + 1.1 + 1.3 + 1.5 + 1.4 + 1.6 + 1.7 + 1.8) * 1.0e6 / 9.0;
        assert_relative_eq!(out[3].volume, expected_volume, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_date_always_dropped() {
        let mut rows = sample();
        rows[5].date = None;
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::new(MissingStrategy::Mean).resolve(rows, &mut report);
        assert_eq!(out.len(), 9);
        assert_eq!(report.missing_values_found, 2);
        assert_eq!(report.missing_dates, 1);
    }

    #[test]
    fn test_undated_row_dropped_without_numeric_gaps() {
        let mut rows = sample();
        rows[2].open = Some(104.0);
        rows[3].volume = Some(1.25e6);
        rows[7].date = None;
        let mut report = CleaningReport::new(10);
        let out = MissingValueResolver::default().resolve(rows, &mut report);
        assert_eq!(out.len(), 9);
        assert_eq!(report.missing_values_found, 0);
        assert_eq!(report.missing_dates, 1);
    }

    #[test]
    fn test_handled_never_exceeds_numeric_cells() {
        let rows = vec![PartialRecord::default(); 4];
        let mut report = CleaningReport::new(4);
        let out = MissingValueResolver::new(MissingStrategy::Drop).resolve(rows, &mut report);
        assert!(out.is_empty());
        assert_eq!(report.missing_values_handled, 20);
        assert_eq!(report.missing_values_handled, report.original_cells());
        assert_eq!(report.missing_dates, 4);
    }
}
