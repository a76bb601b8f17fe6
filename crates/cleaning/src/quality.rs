//! Composite data quality score.
//!
//! `100 - 30 * missing - 20 * duplicate - 15 * outlier`, each fraction taken
//! against the original dataset, clamped to [0, 100].

use behavior_core::CleaningReport;

const MISSING_WEIGHT: f64 = 30.0;
const DUPLICATE_WEIGHT: f64 = 20.0;
const OUTLIER_WEIGHT: f64 = 15.0;

/// Score the counts accumulated in a report.
pub fn compute_quality_score(report: &CleaningReport) -> f64 {
    let rows = report.total_rows_original.max(1) as f64;
    let cells = report.original_cells().max(1) as f64;

    let missing_ratio = report.missing_values_handled as f64 / cells;
    let duplicate_ratio = report.duplicates_removed as f64 / rows;
    let outlier_ratio = report.outliers_removed as f64 / rows;

    let score = 100.0
        - MISSING_WEIGHT * missing_ratio
        - DUPLICATE_WEIGHT * duplicate_ratio
        - OUTLIER_WEIGHT * outlier_ratio;
    score.clamp(0.0, 100.0)
}

/// Compute the score and store it on the report.
pub fn score_report(report: &mut CleaningReport) -> f64 {
    let score = compute_quality_score(report);
    report.data_quality_score = score;
    score
}
