//! Fast structural validation of telemetry files
//!
//! Only the first few non-blank lines are inspected so that obviously wrong
//! uploads (wrong file type, corrupted encoding) are rejected before the
//! full parse and before storage is touched.

use serde::Serialize;
use std::io::BufRead;

use super::catalog::FieldCatalog;
use super::line_parser::{parse_timestamp, split_pair};
use super::prefix::{NonBlankLines, PrefixLine};
use crate::constants::{FIELD_SEPARATOR, VALIDATION_SCAN_LINES};

/// Outcome of validating a file's leading lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Report for a file that could not be read
    pub fn unreadable(reason: impl std::fmt::Display) -> Self {
        Self {
            is_valid: false,
            errors: vec![format!("File read error: {}", reason)],
        }
    }
}

/// Problems found on a single line, in check order
fn check_line(catalog: &FieldCatalog, line: usize, text: &str) -> Vec<String> {
    if !text.contains(FIELD_SEPARATOR) {
        return vec![format!("Line {}: Missing comma separator", line)];
    }

    let parts: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    if parts.len() < 2 {
        return vec![format!(
            "Line {}: Must have timestamp and at least one data field",
            line
        )];
    }

    let mut problems = Vec::new();

    let timestamp = parts[0].trim();
    if parse_timestamp(timestamp).is_none() {
        problems.push(format!("Line {}: Invalid timestamp format: {}", line, timestamp));
    }

    let has_supported_field = parts[1..]
        .iter()
        .filter_map(|part| split_pair(part))
        .any(|(label, _)| catalog.contains(label));
    if !has_supported_field {
        problems.push(format!("Line {}: No supported OBD fields found", line));
    }

    problems
}

/// Validate the first non-blank lines of a reader
pub fn validate_reader<R: BufRead>(catalog: &FieldCatalog, reader: R) -> ValidationReport {
    let mut lines = NonBlankLines::new(reader);
    let mut errors = Vec::new();

    for prefix_line in lines.by_ref().take(VALIDATION_SCAN_LINES) {
        match prefix_line {
            PrefixLine::Text { line, text } => errors.extend(check_line(catalog, line, &text)),
            PrefixLine::Undecodable { line } => {
                errors.push(format!("Line {}: File is not valid UTF-8 text", line))
            }
        }
    }

    match lines.take_error() {
        Some(e) => ValidationReport::unreadable(e),
        None => ValidationReport::from_errors(errors),
    }
}
