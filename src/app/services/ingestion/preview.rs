//! Read-only inspection of a telemetry log before it is ingested

use serde::Serialize;
use std::path::Path;

use crate::app::models::ObdRecord;
use crate::app::services::telemetry_parser::{FieldCensus, TelemetryParser};
use crate::constants::{PREVIEW_PARSE_ERRORS, PREVIEW_SAMPLE_RECORDS};

/// Everything a client needs to decide whether to upload a file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewReport {
    pub filename: String,
    pub is_valid: bool,
    pub validation_errors: Vec<String>,

    /// Recognised label occurrences over the leading lines
    pub supported_fields_found: FieldCensus,

    pub unsupported_fields_found: Vec<String>,

    /// First parsed records
    pub sample_data: Vec<ObdRecord>,

    /// First line diagnostics
    pub parse_errors: Vec<String>,

    /// Number of records the full file would produce
    pub estimated_rows: usize,
}

/// Run census, validation and a full parse over one file without storing anything
pub fn build_preview(parser: &TelemetryParser, path: &Path, filename: &str) -> PreviewReport {
    let census = parser.census_file(path);
    let validation = parser.validate_file(path);
    let mut parsed = parser.parse_file(path);

    let estimated_rows = parsed.records.len();
    parsed.records.truncate(PREVIEW_SAMPLE_RECORDS);
    parsed.errors.truncate(PREVIEW_PARSE_ERRORS);

    PreviewReport {
        filename: filename.to_string(),
        is_valid: validation.is_valid,
        validation_errors: validation.errors,
        supported_fields_found: census,
        unsupported_fields_found: parsed.unsupported_fields,
        sample_data: parsed.records,
        parse_errors: parsed.errors,
        estimated_rows,
    }
}
