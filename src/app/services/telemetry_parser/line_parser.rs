//! Individual telemetry line parsing
//!
//! A telemetry line has the shape
//! `timestamp,Label One=value,Label Two=value,...`. Fields may appear in any
//! order, unknown labels are reported rather than rejected, and a value that
//! is not numeric only drops that one field.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tracing::trace;

use super::catalog::FieldCatalog;
use crate::app::models::{FieldValue, ObdRecord};
use crate::constants::{FIELD_SEPARATOR, VALUE_SEPARATOR};

/// Structural problems that make a whole line unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("Invalid line format - must have timestamp and at least one data field")]
    MissingFields,

    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),
}

/// Outcome of parsing one structurally valid line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLine {
    /// Present when at least one known label carried a numeric value
    pub record: Option<ObdRecord>,

    /// Labels not found in the catalog, in line order
    pub unsupported: Vec<String>,
}

/// ISO-8601 layouts accepted after RFC 3339, all requiring an offset
///
/// `%#z` takes `+hh:mm`, `+hhmm` or a bare `+hh`.
const OFFSET_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y%m%dT%H%M%S%.f%#z",
    "%Y%m%d %H%M%S%.f%#z",
    "%Y%m%dT%H%M%#z",
];

/// Parse an ISO-8601 timestamp carrying a UTC offset
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    })
}

/// Split a `label=value` pair on the first `=`, trimming both sides
pub fn split_pair(part: &str) -> Option<(&str, &str)> {
    part.split_once(VALUE_SEPARATOR)
        .map(|(label, value)| (label.trim(), value.trim()))
}

/// Parse one non-empty telemetry line
pub fn parse_line(catalog: &FieldCatalog, line: &str) -> Result<ParsedLine, LineError> {
    let mut parts = line.trim().split(FIELD_SEPARATOR);
    let timestamp = parts.next().unwrap_or_default().trim();
    let fields: Vec<&str> = parts.collect();

    if fields.is_empty() {
        return Err(LineError::MissingFields);
    }

    if parse_timestamp(timestamp).is_none() {
        return Err(LineError::InvalidTimestamp(timestamp.to_string()));
    }

    let mut record = ObdRecord::new(timestamp);
    let mut unsupported = Vec::new();

    for part in fields {
        let Some((label, value)) = split_pair(part) else {
            continue;
        };

        match catalog.lookup(label) {
            Some(field) => match FieldValue::parse(value) {
                Some(parsed) => record.set(field, parsed),
                None => trace!("Dropping non-numeric value '{}' for '{}'", value, label),
            },
            None => unsupported.push(label.to_string()),
        }
    }

    Ok(ParsedLine {
        record: record.has_measurements().then_some(record),
        unsupported,
    })
}
