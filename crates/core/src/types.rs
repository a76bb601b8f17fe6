//! Core data types for the behavior analysis system.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical logical field of a daily OHLCV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    /// Every field a dataset must provide, in canonical column order.
    pub const REQUIRED: [Field; 6] = [
        Field::Date,
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
    ];

    /// The numeric fields.
    pub const NUMERIC: [Field; 5] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
    ];

    /// The price fields (everything numeric except volume).
    pub const PRICES: [Field; 4] = [Field::Open, Field::High, Field::Low, Field::Close];

    /// Canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::Volume => "Volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell as handed over by a file or network adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    /// Empty cell / null.
    Missing,
    /// Numeric cell.
    Number(f64),
    /// Textual cell (dates, numbers stored as text, garbage).
    Text(String),
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

impl From<&str> for RawCell {
    fn from(v: &str) -> Self {
        RawCell::Text(v.to_string())
    }
}

impl From<String> for RawCell {
    fn from(v: String) -> Self {
        RawCell::Text(v)
    }
}

impl<T: Into<RawCell>> From<Option<T>> for RawCell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawCell::Missing)
    }
}

/// Raw tabular dataset with arbitrary column naming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column headers as supplied.
    pub columns: Vec<String>,
    /// Row-major cells; each row should have one cell per column.
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Create a table from headers and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row after type normalization: every field may still be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialRecord {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl PartialRecord {
    /// Get a numeric field. `Field::Date` always yields `None`.
    #[inline]
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::Date => None,
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
    }

    /// Set a numeric field. Setting `Field::Date` is a no-op.
    #[inline]
    pub fn set_value(&mut self, field: Field, value: Option<f64>) {
        match field {
            Field::Date => {}
            Field::Open => self.open = value,
            Field::High => self.high = value,
            Field::Low => self.low = value,
            Field::Close => self.close = value,
            Field::Volume => self.volume = value,
        }
    }

    /// Whether a field (including the date) is missing.
    #[inline]
    pub fn is_missing(&self, field: Field) -> bool {
        match field {
            Field::Date => self.date.is_none(),
            other => self.value(other).is_none(),
        }
    }

    /// Number of missing fields in this row.
    pub fn missing_count(&self) -> usize {
        Field::REQUIRED.iter().filter(|&&f| self.is_missing(f)).count()
    }

    /// Number of missing numeric fields in this row.
    pub fn missing_numeric_count(&self) -> usize {
        Field::NUMERIC.iter().filter(|&&f| self.is_missing(f)).count()
    }

    /// Whether every field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }

    /// Convert to a complete record, if no field is missing.
    pub fn to_record(&self) -> Option<OhlcvRecord> {
        Some(OhlcvRecord {
            date: self.date?,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume?,
        })
    }
}

impl From<OhlcvRecord> for PartialRecord {
    fn from(r: OhlcvRecord) -> Self {
        Self {
            date: Some(r.date),
            open: Some(r.open),
            high: Some(r.high),
            low: Some(r.low),
            close: Some(r.close),
            volume: Some(r.volume),
        }
    }
}

/// One cleaned trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OhlcvRecord {
    /// Calendar date (UTC-normalized).
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvRecord {
    /// Get a numeric field. `Field::Date` yields NaN.
    #[inline]
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Date => f64::NAN,
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
    }
}

/// Derived statistics for one trading day.
///
/// `None` marks a value that is undefined at the series boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(rename = "Price_Change_Pct")]
    pub price_change_pct: Option<f64>,
    #[serde(rename = "Volume_MA20")]
    pub volume_ma20: f64,
    #[serde(rename = "Volume_Mean")]
    pub volume_mean: f64,
    #[serde(rename = "Volume_Std")]
    pub volume_std: Option<f64>,
    /// Always defined; undefined ratios resolve to 0.
    #[serde(rename = "Volume_Zscore")]
    pub volume_zscore: f64,
    #[serde(rename = "Volatility")]
    pub volatility: Option<f64>,
    #[serde(rename = "Momentum_5d")]
    pub momentum_5d: Option<f64>,
    #[serde(rename = "Daily_Range")]
    pub daily_range: Option<f64>,
    /// Always defined; a zero-width day resolves to 50.
    #[serde(rename = "Price_Position")]
    pub price_position: f64,
}

/// A cleaned record plus its derived features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: OhlcvRecord,
    #[serde(flatten)]
    pub features: Features,
}

/// Behavioral category assigned to a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Behavior {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Panic Selling")]
    PanicSelling,
    #[serde(rename = "FOMO Buying")]
    FomoBuying,
    #[serde(rename = "Overconfidence")]
    Overconfidence,
}

impl Behavior {
    /// All labels in their fixed reporting order.
    pub const ALL: [Behavior; 4] = [
        Behavior::Normal,
        Behavior::PanicSelling,
        Behavior::FomoBuying,
        Behavior::Overconfidence,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Behavior::Normal => "Normal",
            Behavior::PanicSelling => "Panic Selling",
            Behavior::FomoBuying => "FOMO Buying",
            Behavior::Overconfidence => "Overconfidence",
        }
    }

    /// Is this anything other than `Normal`?
    pub fn is_signal(self) -> bool {
        self != Behavior::Normal
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::Normal
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final output row: enriched record, label and batch-normalized confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub enriched: EnrichedRecord,
    #[serde(rename = "Behavior")]
    pub behavior: Behavior,
    /// In [0, 100].
    #[serde(rename = "Confidence_Score")]
    pub confidence_score: f64,
    /// Score from an optional sentiment collaborator.
    #[serde(rename = "Sentiment", default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
}

impl ClassifiedRecord {
    /// Trading date.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.enriched.record.date
    }

    /// The cleaned OHLCV values.
    #[inline]
    pub fn record(&self) -> &OhlcvRecord {
        &self.enriched.record
    }

    /// The derived features.
    #[inline]
    pub fn features(&self) -> &Features {
        &self.enriched.features
    }
}
