//! End-to-end cleaning pipeline.
//!
//! Stage order is fixed: schema, types, missing values, duplicates,
//! outliers, price logic, chronological sort, quality score.

use crate::{
    duplicates::DuplicateResolver, missing::MissingValueResolver, outliers::OutlierDetector,
    price_logic::PriceLogicValidator, quality::score_report,
};
use behavior_core::{CleaningReport, Config, OhlcvRecord, RawTable, Result};
use behavior_ingestion::{SchemaValidator, TypeNormalizer};
use serde::Serialize;
use tracing::{info, warn};

/// Output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedDataset {
    /// Complete rows with unique dates, ascending by date.
    pub records: Vec<OhlcvRecord>,
    pub report: CleaningReport,
}

impl CleanedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Runs every cleaning stage over one raw table.
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    schema: SchemaValidator,
    missing: MissingValueResolver,
    duplicates: DuplicateResolver,
    outliers: OutlierDetector,
    price_logic: PriceLogicValidator,
    remove_outliers: bool,
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl CleaningPipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            schema: SchemaValidator::new(),
            missing: MissingValueResolver::new(config.cleaning.missing_strategy),
            duplicates: DuplicateResolver::new(),
            outliers: OutlierDetector::from_config(&config.outliers),
            price_logic: PriceLogicValidator::new(),
            remove_outliers: config.cleaning.remove_outliers,
        }
    }

    /// Clean a raw table.
    ///
    /// Fails only when the table is malformed or a required field cannot be
    /// resolved; every data-level defect is repaired or counted instead.
    pub fn run(&self, mut table: RawTable) -> Result<CleanedDataset> {
        let mut report = CleaningReport::new(table.len());
        info!(
            "Cleaning {} rows (missing: {}, outliers: {} k = {}, remove: {})",
            table.len(),
            self.missing.strategy(),
            self.outliers.method(),
            self.outliers.threshold(),
            self.remove_outliers
        );

        let mapping = self.schema.validate(&mut table)?;
        let rows = TypeNormalizer::new(mapping).normalize(&table);

        let records = self.missing.resolve(rows, &mut report);
        let records = self.duplicates.resolve(records, &mut report);

        let flagged = self.outliers.detect(&records, &mut report);
        let mut records = if self.remove_outliers {
            self.outliers.remove(records, &flagged, &mut report)
        } else {
            records
        };

        report.price_issues = self.price_logic.validate(&records);

        // stable, so equal dates keep their relative order
        records.sort_by_key(|r| r.date);

        report.total_rows_cleaned = records.len();
        let score = score_report(&mut report);
        if records.is_empty() && report.total_rows_original > 0 {
            warn!("No rows survived cleaning");
        }
        info!(
            "Cleaning complete: {} -> {} rows, quality {:.1}/100 ({})",
            report.total_rows_original,
            report.total_rows_cleaned,
            score,
            report.rating()
        );

        Ok(CleanedDataset { records, report })
    }
}
