//! Application constants for the OBD ingestion service
//!
//! This module contains scan bounds, upload limits, query defaults and
//! file naming patterns used throughout the crate.

// =============================================================================
// Parsing Bounds
// =============================================================================

/// Number of non-blank leading lines inspected by the format validator
pub const VALIDATION_SCAN_LINES: usize = 5;

/// Number of non-blank leading lines inspected by the field census
pub const CENSUS_SCAN_LINES: usize = 100;

/// Separator between the timestamp and each `label=value` pair
pub const FIELD_SEPARATOR: char = ',';

/// Separator between a label and its value
pub const VALUE_SEPARATOR: char = '=';

// =============================================================================
// Upload Handling
// =============================================================================

/// Default maximum size of a single uploaded file (50 MiB)
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Default maximum number of files accepted per upload request
pub const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 20;

/// Extension of raw telemetry log files
pub const CSV_EXTENSION: &str = "csv";

/// Extension of archives bundling telemetry log files
pub const ZIP_EXTENSION: &str = "zip";

/// Date format used by telemetry log file names, e.g. `21-October-2025.csv`
pub const LOG_FILE_DATE_FORMAT: &str = "%d-%B-%Y";

// =============================================================================
// Preview
// =============================================================================

/// Number of parsed records included in a preview sample
pub const PREVIEW_SAMPLE_RECORDS: usize = 5;

/// Number of parse errors included in a preview
pub const PREVIEW_PARSE_ERRORS: usize = 10;

// =============================================================================
// Queries
// =============================================================================

/// Default number of records returned by a data query
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// Upper bound applied to requested query limits
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Limit used when a non-positive limit is requested
pub const FALLBACK_QUERY_LIMIT: usize = 100;

/// Date format accepted by query and delete filters
pub const QUERY_DATE_FORMAT: &str = "%d-%m-%Y";

// =============================================================================
// Accounts
// =============================================================================

/// Session lifetime (7 days)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Number of random bytes in a session token
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Number of random bytes in a password salt
pub const PASSWORD_SALT_BYTES: usize = 16;

// =============================================================================
// Service Defaults
// =============================================================================

/// Default HTTP bind address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Default SQLite database file name
pub const DEFAULT_DATABASE_FILE: &str = "obd_dashboard.db";

/// Application directory name under the user data directory
pub const APP_DIR_NAME: &str = "obd-ingest";
