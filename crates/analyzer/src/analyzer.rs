//! Single-dataset analysis: raw table in, classified series out.

use crate::sentiment::SentimentSource;
use behavior_classifier::{BehaviorClassifier, BehaviorSummary, RecentTrend};
use behavior_cleaning::CleaningPipeline;
use behavior_core::{ClassifiedRecord, CleaningReport, Config, RawTable, Result};
use behavior_features::FeatureEngine;
use serde::Serialize;
use tracing::{info, warn};

/// Everything produced for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Classified days, ascending by date with unique dates.
    pub records: Vec<ClassifiedRecord>,
    pub report: CleaningReport,
    /// `None` when no rows survived cleaning.
    pub summary: Option<BehaviorSummary>,
    pub recent: Option<RecentTrend>,
}

impl Analysis {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the whole analysis as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Runs clean -> features -> classify with a fixed configuration.
#[derive(Debug, Clone)]
pub struct BehaviorAnalyzer {
    config: Config,
    pipeline: CleaningPipeline,
    classifier: BehaviorClassifier,
}

impl Default for BehaviorAnalyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl BehaviorAnalyzer {
    /// Create an analyzer from configuration.
    pub fn new(config: Config) -> Self {
        let pipeline = CleaningPipeline::new(&config);
        let classifier = BehaviorClassifier::new(&config);
        Self {
            config,
            pipeline,
            classifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze one raw dataset.
    ///
    /// Only a structural failure (schema, malformed rows) is returned as an
    /// error. Sentiment, when supplied, is attached after classification.
    pub fn analyze(
        &self,
        table: RawTable,
        sentiment: Option<&dyn SentimentSource>,
    ) -> Result<Analysis> {
        let cleaned = self.pipeline.run(table)?;
        if cleaned.report.has_price_issues() {
            warn!(
                "{} price logic issue kinds left in cleaned data",
                cleaned.report.price_issues.len()
            );
        }

        let enriched = FeatureEngine::new(&self.config).compute(&cleaned.records);
        let mut records = self.classifier.classify(enriched);

        if let Some(source) = sentiment {
            for record in records.iter_mut() {
                record.sentiment = source.score(record.date());
            }
        }

        let summary = BehaviorSummary::from_records(&records, &self.config.summary);
        let recent = RecentTrend::from_records(&records, &self.config.summary);
        if let Some(summary) = &summary {
            info!(
                "Analysis complete: {} days, risk {:.1}% ({})",
                summary.total_days, summary.risk_pct, summary.risk_level
            );
        }

        Ok(Analysis {
            records,
            report: cleaned.report,
            summary,
            recent,
        })
    }
}

/// Analyze one raw dataset with the given configuration.
pub fn analyze(
    table: RawTable,
    config: &Config,
    sentiment: Option<&dyn SentimentSource>,
) -> Result<Analysis> {
    BehaviorAnalyzer::new(config.clone()).analyze(table, sentiment)
}
