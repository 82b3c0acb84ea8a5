//! Field-tolerant parser for line-oriented OBD telemetry logs
//!
//! Telemetry logs hold one snapshot per line:
//!
//! ```text
//! 2025-10-21T23:20:20+10:00,Vehicle Speed=0,Engine Coolant Temperature=74,Throttle Position=21.96
//! ```
//!
//! ## Architecture
//!
//! - [`catalog`] - Sensor label to canonical identifier lookup
//! - [`line_parser`] - Single line parsing and structural errors
//! - [`file_parser`] - Lazy per-line outcomes folded into a [`ParseResult`]
//! - [`format_validator`] - Cheap structural check over the first lines
//! - [`field_census`] - Recognised-label counts for previews
//! - [`stats`] - Parse result structures
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use obd_ingest::app::services::telemetry_parser::{FieldCatalog, TelemetryParser};
//!
//! let parser = TelemetryParser::new(Arc::new(FieldCatalog::standard()));
//! let line = "2025-10-21T23:20:20+10:00,Vehicle Speed=0,Custom Field=1";
//! let parsed = parser.parse_line(line).unwrap();
//!
//! assert!(parsed.record.is_some());
//! assert_eq!(parsed.unsupported, vec!["Custom Field".to_string()]);
//! ```

pub mod catalog;
pub mod field_census;
pub mod file_parser;
pub mod format_validator;
pub mod line_parser;
mod prefix;
pub mod stats;

#[cfg(test)]
pub mod tests;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub use catalog::{CatalogEntry, FieldCatalog};
pub use field_census::FieldCensus;
pub use file_parser::{LineOutcome, LineOutcomes};
pub use format_validator::ValidationReport;
pub use line_parser::{LineError, ParsedLine};
pub use stats::ParseResult;

/// Telemetry parser bound to a label catalog
#[derive(Debug, Clone)]
pub struct TelemetryParser {
    catalog: Arc<FieldCatalog>,
}

impl TelemetryParser {
    /// Create a new parser with the catalog it resolves labels against
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        let (labels, core, fields) = catalog.stats();
        debug!(
            "Field catalog: {} labels ({} core) for {} identifiers",
            labels, core, fields
        );
        Self { catalog }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Parse a single line
    pub fn parse_line(&self, line: &str) -> Result<ParsedLine, LineError> {
        line_parser::parse_line(&self.catalog, line)
    }

    /// Lazy per-line outcomes for a reader
    pub fn line_outcomes<'a, R: BufRead + 'a>(&'a self, reader: R) -> LineOutcomes<'a, R> {
        LineOutcomes::new(&self.catalog, reader)
    }

    /// Parse every line of a reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> ParseResult {
        file_parser::parse_reader(&self.catalog, reader)
    }

    /// Parse a telemetry file
    pub fn parse_file(&self, path: &Path) -> ParseResult {
        let result = match File::open(path) {
            Ok(file) => self.parse_reader(BufReader::new(file)),
            Err(e) => {
                warn!("Could not open {}: {}", path.display(), e);
                return ParseResult::unreadable(format!("File error: {}", e));
            }
        };

        debug!(
            "Parsed {}: {} records ({:.1}% of lines), {} errors, {} unsupported labels",
            path.display(),
            result.records.len(),
            result.success_rate(),
            result.errors.len(),
            result.unsupported_fields.len()
        );
        result
    }

    /// Validate the leading lines of a reader
    pub fn validate_reader<R: BufRead>(&self, reader: R) -> ValidationReport {
        format_validator::validate_reader(&self.catalog, reader)
    }

    /// Validate the leading lines of a file
    pub fn validate_file(&self, path: &Path) -> ValidationReport {
        match File::open(path) {
            Ok(file) => self.validate_reader(BufReader::new(file)),
            Err(e) => ValidationReport::unreadable(e),
        }
    }

    /// Count recognised labels in the leading lines of a reader
    pub fn census_reader<R: BufRead>(&self, reader: R) -> FieldCensus {
        field_census::census_reader(&self.catalog, reader)
    }

    /// Count recognised labels in the leading lines of a file
    pub fn census_file(&self, path: &Path) -> FieldCensus {
        match File::open(path) {
            Ok(file) => self.census_reader(BufReader::new(file)),
            Err(_) => FieldCensus::new(),
        }
    }
}

impl Default for TelemetryParser {
    fn default() -> Self {
        Self::new(Arc::new(FieldCatalog::standard()))
    }
}
