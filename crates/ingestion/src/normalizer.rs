//! Type normalization.
//!
//! Coerces raw cells into calendar dates and finite numbers. Anything that
//! cannot be converted becomes missing; this stage never fails.

use crate::schema::ColumnMapping;
use behavior_core::{Field, PartialRecord, RawCell, RawTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

/// Datetime layouts tried after RFC 3339.
const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

/// Date-only layouts. Month-first wins for ambiguous slash dates.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Timestamps above this are taken as milliseconds rather than seconds.
const MILLIS_CUTOFF: u64 = 100_000_000_000;

/// Parse a textual date. Offsets are converted to UTC before taking the day.
fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_utc().date());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    s.parse::<i64>().ok().and_then(parse_epoch)
}

/// Unix epoch in seconds or milliseconds.
fn parse_epoch(ts: i64) -> Option<NaiveDate> {
    let dt = if ts.unsigned_abs() >= MILLIS_CUTOFF {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    };
    dt.map(|d| d.date_naive())
}

/// Whole numbers that fit an `i64` without saturating.
fn is_epoch_number(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64
}

/// Convert a cell into a calendar date.
pub fn parse_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Missing => None,
        RawCell::Text(s) => parse_date_str(s),
        RawCell::Number(n) if is_epoch_number(*n) => parse_epoch(*n as i64),
        RawCell::Number(_) => None,
    }
}

/// Convert a cell into a finite number.
pub fn parse_number(cell: &RawCell) -> Option<f64> {
    let value = match cell {
        RawCell::Missing => return None,
        RawCell::Number(n) => *n,
        RawCell::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Turns a validated raw table into typed rows.
#[derive(Debug, Clone, Copy)]
pub struct TypeNormalizer {
    mapping: ColumnMapping,
}

impl TypeNormalizer {
    /// Create a normalizer for a table resolved by the schema validator.
    pub fn new(mapping: ColumnMapping) -> Self {
        Self { mapping }
    }

    fn cell<'a>(&self, row: &'a [RawCell], field: Field) -> &'a RawCell {
        row.get(self.mapping.index(field)).unwrap_or(&RawCell::Missing)
    }

    /// Normalize a single raw row.
    pub fn normalize_row(&self, row: &[RawCell]) -> PartialRecord {
        let mut record = PartialRecord {
            date: parse_date(self.cell(row, Field::Date)),
            ..PartialRecord::default()
        };
        for field in Field::NUMERIC {
            record.set_value(field, parse_number(self.cell(row, field)));
        }
        record
    }

    /// Normalize every row of the table, preserving row order.
    pub fn normalize(&self, table: &RawTable) -> Vec<PartialRecord> {
        let records: Vec<PartialRecord> =
            table.rows.iter().map(|row| self.normalize_row(row)).collect();

        let coerced = table
            .rows
            .iter()
            .zip(&records)
            .map(|(row, rec)| {
                Field::REQUIRED
                    .iter()
                    .filter(|&&f| rec.is_missing(f) && *self.cell(row, f) != RawCell::Missing)
                    .count()
            })
            .sum::<usize>();
        if coerced > 0 {
            debug!("{} unparsable cells coerced to missing", coerced);
        }

        info!("Data types normalized ({} rows)", records.len());
        records
    }
}
