//! Non-fatal price consistency checks.

use behavior_core::{OhlcvRecord, PriceIssue, PriceIssueKind};
use tracing::{info, warn};

/// Reports rows whose prices contradict each other. Never mutates data.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceLogicValidator;

impl PriceLogicValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run every check and collect one issue per violated rule.
    pub fn validate(&self, records: &[OhlcvRecord]) -> Vec<PriceIssue> {
        let checks: [(PriceIssueKind, fn(&OhlcvRecord) -> bool); 4] = [
            (PriceIssueKind::HighBelowLow, |r| r.high < r.low),
            (PriceIssueKind::CloseOutsideRange, |r| r.close > r.high || r.close < r.low),
            (PriceIssueKind::OpenOutsideRange, |r| r.open > r.high || r.open < r.low),
            (PriceIssueKind::NegativeVolume, |r| r.volume < 0.0),
        ];

        let issues: Vec<PriceIssue> = checks
            .iter()
            .filter_map(|&(kind, violates)| {
                let rows = records.iter().filter(|r| violates(r)).count();
                (rows > 0).then_some(PriceIssue { kind, rows })
            })
            .collect();

        if issues.is_empty() {
            info!("All price logic checks passed");
        } else {
            for issue in &issues {
                warn!("Price logic issue: {}", issue);
            }
        }
        issues
    }
}
