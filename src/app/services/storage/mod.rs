//! Persistence of parsed telemetry and user accounts
//!
//! The ingestion pipeline only depends on the narrow [`RecordStore`] trait.
//! [`SqliteStore`] is the production implementation and additionally owns
//! users and login sessions for the HTTP service.

pub mod accounts;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::models::{ObdField, ObdRecord};
use crate::constants::QUERY_DATE_FORMAT;
use crate::error::{ObdError, Result};

pub use accounts::validate_registration;
pub use sqlite::SqliteStore;

/// Identifiers clients may request when querying stored data
///
/// Narrower than the catalog: the five later additions are stored but not
/// yet queryable by name.
pub const QUERYABLE_FIELDS: [ObdField; 11] = [
    ObdField::Rpm,
    ObdField::Speed,
    ObdField::CoolTemp,
    ObdField::ThrottlePos,
    ObdField::IntakeManiPres,
    ObdField::IntakeAirTemp,
    ObdField::MafAirFlowRate,
    ObdField::RunTime,
    ObdField::BaroPressure,
    ObdField::CatalystTemp,
    ObdField::ControlModuleVoltage,
];

/// Filters for fetching stored records
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    /// Calendar day the records fall on
    pub date: Option<NaiveDate>,

    /// Columns to return; `None` returns every measurement
    pub fields: Option<Vec<ObdField>>,

    pub limit: usize,
}

impl RecordQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            date: None,
            fields: None,
            limit,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_fields(mut self, fields: Vec<ObdField>) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// A persisted record with its row id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: ObdRecord,
}

/// Storage seam used by the ingestion orchestrator and the query paths
pub trait RecordStore: Send + Sync {
    /// Persist a batch of records for a user
    ///
    /// The batch is atomic: either every record is stored or an error is
    /// returned and none are.
    fn insert_records(&self, user_id: i64, records: &[ObdRecord]) -> Result<usize>;

    /// Fetch records for a user, newest timestamp first
    fn fetch_records(&self, user_id: i64, query: &RecordQuery) -> Result<Vec<StoredRecord>>;

    /// Identifiers accepted in a query field filter
    fn allowed_fields(&self) -> &[ObdField];

    /// Remove every record of a user that falls on the given day
    fn delete_records_for_date(&self, user_id: i64, date: NaiveDate) -> Result<usize>;
}

/// Resolve requested field names against the allowed set
///
/// An empty request means no filter. Any name outside the allowed set
/// rejects the whole request, listing every offending name.
pub fn resolve_field_filter<S: AsRef<str>>(
    requested: &[S],
    allowed: &[ObdField],
) -> Result<Option<Vec<ObdField>>> {
    if requested.is_empty() {
        return Ok(None);
    }

    let mut fields = Vec::with_capacity(requested.len());
    let mut invalid = Vec::new();

    for name in requested {
        let name = name.as_ref();
        match name.parse::<ObdField>() {
            Ok(field) if allowed.contains(&field) => {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
            _ => invalid.push(name.to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(Some(fields))
    } else {
        Err(ObdError::InvalidFieldFilter {
            fields: invalid,
            supported: allowed.to_vec(),
        })
    }
}

/// Parse a `dd-mm-yyyy` query date; anything else means no date filter
pub fn parse_query_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), QUERY_DATE_FORMAT).ok()
}
