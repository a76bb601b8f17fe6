//! Per-run cleaning report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of numeric cells per row used as the quality-score denominator.
pub const SCORED_CELLS_PER_ROW: usize = 5;

/// Category of a non-fatal price consistency violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceIssueKind {
    HighBelowLow,
    CloseOutsideRange,
    OpenOutsideRange,
    NegativeVolume,
}

/// A price-logic issue and how many rows exhibit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceIssue {
    pub kind: PriceIssueKind,
    pub rows: usize,
}

impl fmt::Display for PriceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            PriceIssueKind::HighBelowLow => "High < Low",
            PriceIssueKind::CloseOutsideRange => "Close outside High-Low range",
            PriceIssueKind::OpenOutsideRange => "Open outside High-Low range",
            PriceIssueKind::NegativeVolume => "Negative volume",
        };
        write!(f, "{} in {} rows", what, self.rows)
    }
}

/// Coarse rating bucket for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl QualityRating {
    /// Bucket a 0-100 score.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            QualityRating::Excellent
        } else if score >= 75.0 {
            QualityRating::Good
        } else if score >= 60.0 {
            QualityRating::Fair
        } else {
            QualityRating::NeedsImprovement
        }
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityRating::Excellent => "Excellent",
            QualityRating::Good => "Good",
            QualityRating::Fair => "Fair",
            QualityRating::NeedsImprovement => "Needs Improvement",
        })
    }
}

/// Accumulator owned by a single pipeline run.
///
/// Each stage receives `&mut CleaningReport` and records its own counts;
/// the score is filled in once all cleaning stages have run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub total_rows_original: usize,
    pub total_rows_cleaned: usize,
    /// Missing numeric cells; these are the cells the quality score charges for.
    pub missing_values_found: usize,
    pub missing_values_handled: usize,
    /// Rows dropped because their date was missing or unparsable.
    pub missing_dates: usize,
    pub duplicates_found: usize,
    pub duplicates_removed: usize,
    pub outliers_detected: usize,
    pub outliers_removed: usize,
    pub data_quality_score: f64,
    /// Non-fatal price-logic warnings.
    pub price_issues: Vec<PriceIssue>,
}

impl CleaningReport {
    /// Fresh report for a dataset of `original_rows` rows.
    pub fn new(original_rows: usize) -> Self {
        Self {
            total_rows_original: original_rows,
            ..Self::default()
        }
    }

    /// Numeric cells in the original dataset.
    pub fn original_cells(&self) -> usize {
        self.total_rows_original * SCORED_CELLS_PER_ROW
    }

    /// Rows dropped by all cleaning stages combined.
    pub fn rows_removed(&self) -> usize {
        self.total_rows_original.saturating_sub(self.total_rows_cleaned)
    }

    /// Rating bucket of the current score.
    pub fn rating(&self) -> QualityRating {
        QualityRating::from_score(self.data_quality_score)
    }

    /// Whether the price-logic validator raised anything.
    pub fn has_price_issues(&self) -> bool {
        !self.price_issues.is_empty()
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DATA CLEANING REPORT")?;
        writeln!(f, "Original data:")?;
        writeln!(f, "  Total rows: {}", self.total_rows_original)?;
        writeln!(f, "Cleaning actions:")?;
        writeln!(f, "  Missing values found: {}", self.missing_values_found)?;
        writeln!(f, "  Missing values handled: {}", self.missing_values_handled)?;
        if self.missing_dates > 0 {
            writeln!(f, "  Rows without a valid date: {}", self.missing_dates)?;
        }
        writeln!(f, "  Duplicates removed: {}", self.duplicates_removed)?;
        writeln!(f, "  Outliers detected: {}", self.outliers_detected)?;
        writeln!(f, "  Outliers removed: {}", self.outliers_removed)?;
        for issue in &self.price_issues {
            writeln!(f, "  Warning: {}", issue)?;
        }
        writeln!(f, "Cleaned data:")?;
        writeln!(f, "  Total rows: {}", self.total_rows_cleaned)?;
        writeln!(f, "  Rows removed: {}", self.rows_removed())?;
        writeln!(f, "Data quality score: {:.1}/100", self.data_quality_score)?;
        write!(f, "  Rating: {}", self.rating())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_buckets() {
        assert_eq!(QualityRating::from_score(100.0), QualityRating::Excellent);
        assert_eq!(QualityRating::from_score(90.0), QualityRating::Excellent);
        assert_eq!(QualityRating::from_score(89.9), QualityRating::Good);
        assert_eq!(QualityRating::from_score(60.0), QualityRating::Fair);
        assert_eq!(QualityRating::from_score(12.0), QualityRating::NeedsImprovement);
    }

    #[test]
    fn test_original_cells_and_rows_removed() {
        let mut report = CleaningReport::new(100);
        report.total_rows_cleaned = 92;
        assert_eq!(report.original_cells(), 500);
        assert_eq!(report.rows_removed(), 8);
    }

    #[test]
    fn test_price_issue_display() {
        let issue = PriceIssue {
            kind: PriceIssueKind::CloseOutsideRange,
            rows: 3,
        };
        assert_eq!(issue.to_string(), "Close outside High-Low range in 3 rows");
    }

    #[test]
    fn test_report_display_includes_score_and_rating() {
        let mut report = CleaningReport::new(10);
        report.total_rows_cleaned = 9;
        report.data_quality_score = 88.0;
        let text = report.to_string();
        assert!(text.contains("Data quality score: 88.0/100"));
        assert!(text.contains("Rating: Good"));
        assert!(text.contains("Rows removed: 1"));
    }
}
