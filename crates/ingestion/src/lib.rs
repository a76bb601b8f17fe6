//! Data ingestion and normalization for the behavior analysis system.
//!
//! This crate handles:
//! - Alias-tolerant column resolution (schema validation)
//! - Type normalization of raw cells into dated, numeric rows

pub mod normalizer;
pub mod schema;

pub use normalizer::{parse_date, parse_number, TypeNormalizer};
pub use schema::{canonical_field, ColumnMapping, SchemaValidator, COLUMN_ALIASES};
