//! Test utilities for telemetry parser testing
//!
//! Shared fixtures and helpers used across the parser test modules.

use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::app::services::telemetry_parser::{FieldCatalog, TelemetryParser};

mod census_tests;

/// Only catalog labels
pub const KNOWN_FIELDS_LINE: &str = "2025-10-21T23:20:20+10:00,Vehicle Speed=0,Engine Coolant Temperature=74,Throttle Position=21.96";

/// Catalog labels interleaved with unknown ones
pub const MIXED_LABELS_LINE: &str = "2025-10-21T23:20:27+10:00,Custom Field=123,Vehicle Speed=16,Another Custom=456,Engine Coolant Temperature=74";

/// Parser over the standard catalog
pub fn standard_parser() -> TelemetryParser {
    TelemetryParser::new(Arc::new(FieldCatalog::standard()))
}

/// Four valid lines with one structurally broken line in the middle
pub fn create_log_with_broken_line() -> String {
    [
        "2025-10-21T23:20:20+10:00,Vehicle Speed=0,Engine Coolant Temperature=74",
        "2025-10-21T23:20:21+10:00,Vehicle Speed=3,Engine Coolant Temperature=74",
        "yesterday at noon,Vehicle Speed=5",
        "2025-10-21T23:20:22+10:00,Vehicle Speed=7,Engine RPM=1450",
    ]
    .join("\n")
}

/// Small well-formed log covering integer and float values
pub fn create_valid_log() -> String {
    [
        KNOWN_FIELDS_LINE,
        "2025-10-21T23:20:21+10:00,Vehicle Speed=4,Engine RPM=910,Fuel Level=63.5",
        "2025-10-21T23:20:22+10:00,Vehicle Speed=9,Calculated Engine Load=31.4",
    ]
    .join("\n")
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{}", content).unwrap();
    temp_file
}

/// Helper to create a temporary file from raw bytes
pub fn create_temp_file_bytes(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file
}
