//! Error types for the behavior analysis system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the behavior analysis system.
///
/// Only structural failures are represented here. Data-level defects
/// (unparsable cells, gaps, outliers, price-logic violations) are repaired
/// or counted in the [`CleaningReport`](crate::CleaningReport) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Required fields are absent after column normalization.
    #[error("Schema error: missing required columns {missing:?} (available: {available:?})")]
    Schema {
        /// Canonical names of the fields that could not be resolved.
        missing: Vec<String>,
        /// Column names present in the input.
        available: Vec<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (structurally malformed input).
    #[error("Data error: {0}")]
    Data(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a schema error.
    pub fn schema(missing: Vec<String>, available: Vec<String>) -> Self {
        Error::Schema { missing, available }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Whether this error aborted a run at the schema stage.
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema { .. })
    }
}
