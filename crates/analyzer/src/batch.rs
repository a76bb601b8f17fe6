//! Sequential analysis of several named datasets.

use crate::analyzer::{Analysis, BehaviorAnalyzer};
use crate::sentiment::SentimentSource;
use behavior_core::{Behavior, Config, Error, RawTable, Result};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome for one dataset of a batch.
#[derive(Debug)]
pub struct BatchUnit {
    /// Instrument or file name.
    pub name: String,
    pub result: Result<Analysis>,
}

/// One line of the batch comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Days")]
    pub days: usize,
    #[serde(rename = "Panic_Days")]
    pub panic_days: usize,
    #[serde(rename = "FOMO_Days")]
    pub fomo_days: usize,
    /// Percentage of non-`Normal` days.
    #[serde(rename = "Risk_Score")]
    pub risk_score: f64,
}

/// Results of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub units: Vec<BatchUnit>,
}

impl BatchReport {
    /// Comparison rows for every unit that produced a non-empty analysis.
    pub fn rows(&self) -> Vec<BatchRow> {
        self.units
            .iter()
            .filter_map(|unit| {
                let analysis = unit.result.as_ref().ok()?;
                let summary = analysis.summary.as_ref()?;
                Some(BatchRow {
                    ticker: unit.name.clone(),
                    days: summary.total_days,
                    panic_days: summary.count(Behavior::PanicSelling),
                    fomo_days: summary.count(Behavior::FomoBuying),
                    risk_score: summary.risk_pct,
                })
            })
            .collect()
    }

    /// Units that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.units
            .iter()
            .filter_map(|unit| unit.result.as_ref().err().map(|e| (unit.name.as_str(), e)))
    }

    pub fn succeeded(&self) -> usize {
        self.units.iter().filter(|unit| unit.result.is_ok()).count()
    }
}

/// Analyze each named dataset in order.
///
/// Units share only the configuration; a failing unit is recorded and the
/// batch moves on.
pub fn analyze_batch<I, S>(
    datasets: I,
    config: &Config,
    sentiment: Option<&dyn SentimentSource>,
) -> BatchReport
where
    I: IntoIterator<Item = (S, RawTable)>,
    S: Into<String>,
{
    let analyzer = BehaviorAnalyzer::new(config.clone());
    let mut report = BatchReport::default();

    for (name, table) in datasets {
        let name = name.into();
        info!("Analyzing {}", name);
        let result = analyzer.analyze(table, sentiment);
        if let Err(e) = &result {
            warn!("Skipping {}: {}", name, e);
        }
        report.units.push(BatchUnit { name, result });
    }

    info!(
        "Batch complete: {} of {} datasets analyzed",
        report.succeeded(),
        report.units.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use behavior_core::RawCell;

    fn table(columns: &[&str], days: u32) -> RawTable {
        let rows = (1..=days)
            .map(|d| {
                let close = 50.0 + d as f64;
                vec![
                    RawCell::from(format!("2024-04-{:02}", d)),
                    RawCell::from(close - 0.5),
                    RawCell::from(close + 1.0),
                    RawCell::from(close - 1.0),
                    RawCell::from(close),
                    RawCell::from(5000.0),
                ]
            })
            .collect();
        RawTable::new(columns.iter().map(|s| s.to_string()).collect(), rows)
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let good = table(&["Date", "Open", "High", "Low", "Close", "Volume"], 12);
        let bad = table(&["Date", "Open", "High", "Low", "Close", "Turnover"], 12);
        let also_good = table(&["timestamp", "o", "h", "l", "c", "v"], 8);

        let report = analyze_batch(
            vec![("AAA", good), ("BBB", bad), ("CCC", also_good)],
            &Config::default(),
            None,
        );

        assert_eq!(report.units.len(), 3);
        assert_eq!(report.succeeded(), 2);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "BBB");
        assert!(failures[0].1.is_schema());

        let rows = report.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker, "AAA");
        assert_eq!(rows[0].days, 12);
        assert_eq!(rows[1].ticker, "CCC");
        assert_eq!(rows[1].days, 8);
        assert!(rows.iter().all(|r| r.panic_days == 0 && r.risk_score == 0.0));
    }

    #[test]
    fn test_empty_batch() {
        let report = analyze_batch(Vec::<(String, RawTable)>::new(), &Config::default(), None);
        assert!(report.units.is_empty());
        assert!(report.rows().is_empty());
    }
}
