//! Parsing result structures for telemetry files
//!
//! This module provides the aggregate produced by parsing a whole file:
//! records, line diagnostics and unsupported labels.

use serde::Serialize;

use crate::app::models::ObdRecord;

/// Parsing result with records and diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    /// Successfully parsed records in line order
    pub records: Vec<ObdRecord>,

    /// Line-numbered structural errors, plus a file-level error if reading failed
    pub errors: Vec<String>,

    /// Deduplicated labels with no catalog entry, sorted
    pub unsupported_fields: Vec<String>,

    /// Number of non-blank lines examined
    pub lines_seen: usize,
}

impl ParseResult {
    /// Result for a file that could not be opened at all
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Whether any structural or file-level error was recorded
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Share of examined lines that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.lines_seen == 0 {
            0.0
        } else {
            (self.records.len() as f64 / self.lines_seen as f64) * 100.0
        }
    }
}
