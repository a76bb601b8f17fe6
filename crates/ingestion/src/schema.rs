//! Schema validation.
//!
//! Resolves arbitrary column headers to the canonical OHLCV fields through a
//! static alias table and rejects datasets that cannot supply all of them.

use behavior_core::{Error, Field, RawTable, Result};
use tracing::{debug, info, warn};

/// Accepted header spellings (compared trimmed and lowercased).
pub const COLUMN_ALIASES: &[(&str, Field)] = &[
    ("date", Field::Date),
    ("datetime", Field::Date),
    ("timestamp", Field::Date),
    ("time", Field::Date),
    ("open", Field::Open),
    ("o", Field::Open),
    ("high", Field::High),
    ("h", Field::High),
    ("low", Field::Low),
    ("l", Field::Low),
    ("close", Field::Close),
    ("c", Field::Close),
    ("adj close", Field::Close),
    ("adjusted close", Field::Close),
    ("volume", Field::Volume),
    ("vol", Field::Volume),
    ("v", Field::Volume),
];

/// Look up the canonical field for a header, if it is a known alias.
pub fn canonical_field(column: &str) -> Option<Field> {
    let key = column.trim().to_lowercase();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|&(_, field)| field)
}

/// Column position of every canonical field in a raw table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    indices: [usize; 6],
}

impl ColumnMapping {
    /// Column index holding `field`.
    #[inline]
    pub fn index(&self, field: Field) -> usize {
        self.indices[slot(field)]
    }
}

#[inline]
fn slot(field: Field) -> usize {
    match field {
        Field::Date => 0,
        Field::Open => 1,
        Field::High => 2,
        Field::Low => 3,
        Field::Close => 4,
        Field::Volume => 5,
    }
}

/// Validates table shape and resolves the required columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the required fields from a header list.
    ///
    /// Exact canonical names win; otherwise the first column (in header
    /// order) whose alias maps to the field is used.
    pub fn resolve(&self, columns: &[String]) -> Result<ColumnMapping> {
        let mut resolved: [Option<usize>; 6] = [None; 6];

        for field in Field::REQUIRED {
            resolved[slot(field)] = columns.iter().position(|c| c == field.name());
        }

        for (idx, column) in columns.iter().enumerate() {
            let Some(field) = canonical_field(column) else {
                continue;
            };
            let entry = &mut resolved[slot(field)];
            match *entry {
                None => *entry = Some(idx),
                Some(existing) if existing != idx => {
                    debug!(
                        "Ignoring column '{}': {} already mapped from '{}'",
                        column, field, columns[existing]
                    );
                }
                Some(_) => {}
            }
        }

        let missing: Vec<String> = Field::REQUIRED
            .iter()
            .filter(|&&f| resolved[slot(f)].is_none())
            .map(|f| f.name().to_string())
            .collect();

        if !missing.is_empty() {
            warn!("Missing required columns: {:?} (available: {:?})", missing, columns);
            return Err(Error::schema(missing, columns.to_vec()));
        }

        let mut indices = [0usize; 6];
        for (out, found) in indices.iter_mut().zip(resolved) {
            // every slot was checked above
            *out = found.unwrap_or_default();
        }
        Ok(ColumnMapping { indices })
    }

    /// Validate a table in place.
    ///
    /// Checks that every row has one cell per column, resolves the required
    /// fields and renames the resolved headers to their canonical names.
    pub fn validate(&self, table: &mut RawTable) -> Result<ColumnMapping> {
        let width = table.columns.len();
        if let Some((row, cells)) = table
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(Error::data(format!(
                "row {} has {} cells, expected {}",
                row,
                cells.len(),
                width
            )));
        }

        let mapping = self.resolve(&table.columns)?;
        for field in Field::REQUIRED {
            table.columns[mapping.index(field)] = field.name().to_string();
        }

        info!("All required columns present ({} rows)", table.len());
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use behavior_core::RawCell;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_headers_resolve_in_place() {
        let cols = headers(&["Date", "Open", "High", "Low", "Close", "Volume"]);
        let mapping = SchemaValidator::new().resolve(&cols).unwrap();
        for (i, field) in Field::REQUIRED.iter().enumerate() {
            assert_eq!(mapping.index(*field), i);
        }
    }

    #[test]
    fn test_lowercase_and_aliases() {
        let cols = headers(&["timestamp", "o", "HIGH", " low ", "Adj Close", "vol"]);
        let mapping = SchemaValidator::new().resolve(&cols).unwrap();
        assert_eq!(mapping.index(Field::Date), 0);
        assert_eq!(mapping.index(Field::High), 2);
        assert_eq!(mapping.index(Field::Low), 3);
        assert_eq!(mapping.index(Field::Close), 4);
        assert_eq!(mapping.index(Field::Volume), 5);
    }

    #[test]
    fn test_literal_name_beats_alias() {
        let cols = headers(&["date", "open", "high", "low", "adj close", "Close", "volume"]);
        let mapping = SchemaValidator::new().resolve(&cols).unwrap();
        assert_eq!(mapping.index(Field::Close), 5);
    }

    #[test]
    fn test_first_alias_wins() {
        let cols = headers(&["date", "open", "high", "low", "close", "adj close", "v", "volume"]);
        let mapping = SchemaValidator::new().resolve(&cols).unwrap();
        assert_eq!(mapping.index(Field::Close), 4);
        assert_eq!(mapping.index(Field::Volume), 6);
    }

    #[test]
    fn test_missing_fields_reported() {
        let cols = headers(&["date", "open", "close"]);
        let err = SchemaValidator::new().resolve(&cols).unwrap_err();
        match err {
            Error::Schema { missing, available } => {
                assert_eq!(missing, vec!["High", "Low", "Volume"]);
                assert_eq!(available, cols);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_renames_headers() {
        let mut table = RawTable::new(
            headers(&["date", "open", "high", "low", "close", "volume", "ticker"]),
            vec![vec![
                RawCell::from("2024-01-02"),
                RawCell::from(1.0),
                RawCell::from(2.0),
                RawCell::from(0.5),
                RawCell::from(1.5),
                RawCell::from(100.0),
                RawCell::from("AAPL"),
            ]],
        );
        SchemaValidator::new().validate(&mut table).unwrap();
        assert_eq!(
            table.columns,
            headers(&["Date", "Open", "High", "Low", "Close", "Volume", "ticker"])
        );
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut table = RawTable::new(
            headers(&["Date", "Open", "High", "Low", "Close", "Volume"]),
            vec![vec![RawCell::from("2024-01-02"), RawCell::from(1.0)]],
        );
        let err = SchemaValidator::new().validate(&mut table).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
    }
}
