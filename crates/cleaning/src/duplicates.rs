//! Same-date duplicate removal.

use behavior_core::{CleaningReport, OhlcvRecord};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::info;

/// Keeps the first row seen for every date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateResolver;

impl DuplicateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Drop later rows sharing a date with an earlier one, preserving order.
    pub fn resolve(
        &self,
        records: Vec<OhlcvRecord>,
        report: &mut CleaningReport,
    ) -> Vec<OhlcvRecord> {
        let before = records.len();
        let mut seen: HashSet<NaiveDate> = HashSet::with_capacity(before);
        let kept: Vec<OhlcvRecord> = records
            .into_iter()
            .filter(|r| seen.insert(r.date))
            .collect();

        let removed = before - kept.len();
        report.duplicates_found = removed;
        report.duplicates_removed = removed;

        if removed == 0 {
            info!("No duplicates found");
        } else {
            info!("Removed {} duplicate rows", removed);
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(d: u32, close: f64) -> OhlcvRecord {
        OhlcvRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn test_keeps_first_occurrence() {
        let records = vec![rec(4, 100.0), rec(5, 101.0), rec(5, 150.0), rec(6, 102.0)];
        let mut report = CleaningReport::new(4);
        let out = DuplicateResolver::new().resolve(records, &mut report);

        assert_eq!(out.len(), 3);
        let jan5: Vec<_> = out
            .iter()
            .filter(|r| r.date == NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
            .collect();
        assert_eq!(jan5.len(), 1);
        assert_eq!(jan5[0].close, 101.0);
        assert_eq!(report.duplicates_found, 1);
        assert_eq!(report.duplicates_removed, 1);
    }

    #[test]
    fn test_non_adjacent_duplicates() {
        let records = vec![rec(5, 1.0), rec(6, 2.0), rec(5, 3.0), rec(5, 4.0)];
        let mut report = CleaningReport::new(4);
        let out = DuplicateResolver::new().resolve(records, &mut report);
        assert_eq!(out, vec![rec(5, 1.0), rec(6, 2.0)]);
        assert_eq!(report.duplicates_removed, 2);
    }

    #[test]
    fn test_no_duplicates() {
        let records = vec![rec(1, 1.0), rec(2, 2.0)];
        let mut report = CleaningReport::new(2);
        let out = DuplicateResolver::new().resolve(records.clone(), &mut report);
        assert_eq!(out, records);
        assert_eq!(report.duplicates_found, 0);
    }
}
