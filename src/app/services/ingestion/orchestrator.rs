//! Ingestion orchestrator: upload dispatch, archive handling and aggregation
//!
//! Every file goes through the same single-file path: validate the leading
//! lines, parse the whole file, and store its records only if no line raised
//! a structural error. ZIP members are extracted to a scratch directory and
//! each runs the single-file path on its own.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::archive::{extract_member, open_archive, telemetry_members};
use super::preview::{PreviewReport, build_preview};
use super::result::{FileFailure, FileOutcome, FileSuccess, UploadResult};
use super::upload::{FileKind, UploadedFile, date_from_file_name, sanitize_file_name};
use crate::app::services::storage::RecordStore;
use crate::app::services::telemetry_parser::TelemetryParser;
use crate::config::UploadLimits;
use crate::error::{ObdError, Result};

const INVALID_FILE_TYPE: &str = "Invalid file type. Only CSV and ZIP files are allowed.";
const INVALID_PREVIEW_TYPE: &str = "Invalid file type. Only CSV files are allowed for preview.";
const NO_ARCHIVE_MEMBERS: &str = "No CSV files found in ZIP archive";
const STORE_FAILED: &str = "Failed to insert data into database";

/// Drives uploaded files through validation, parsing and storage
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use obd_ingest::app::services::ingestion::{IngestionOrchestrator, UploadedFile};
/// use obd_ingest::app::services::storage::SqliteStore;
/// use obd_ingest::app::services::telemetry_parser::TelemetryParser;
/// use obd_ingest::config::UploadLimits;
///
/// # fn example() -> obd_ingest::Result<()> {
/// let store = Arc::new(SqliteStore::open_in_memory()?);
/// let user_id = store.create_user("driver@example.com", "secret-pass")?;
/// let orchestrator =
///     IngestionOrchestrator::new(TelemetryParser::default(), store, UploadLimits::default());
///
/// let log = "2025-10-21T23:20:20+10:00,Vehicle Speed=0,Engine Coolant Temperature=74\n";
/// let result = orchestrator.ingest_uploads(user_id, vec![UploadedFile::new("21-October-2025.csv", log)])?;
/// assert_eq!(result.total_rows_processed, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct IngestionOrchestrator {
    parser: TelemetryParser,
    store: Arc<dyn RecordStore>,
    limits: UploadLimits,
}

impl IngestionOrchestrator {
    pub fn new(parser: TelemetryParser, store: Arc<dyn RecordStore>, limits: UploadLimits) -> Self {
        Self {
            parser,
            store,
            limits,
        }
    }

    pub fn parser(&self) -> &TelemetryParser {
        &self.parser
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Reject a request that breaks the transport limits, before any parsing
    pub fn check_limits(&self, files: &[UploadedFile]) -> Result<()> {
        if files.is_empty() {
            return Err(ObdError::upload_rejected("No files provided"));
        }

        if files.len() > self.limits.max_files_per_upload {
            return Err(ObdError::upload_rejected(format!(
                "Too many files. Maximum {} files per upload.",
                self.limits.max_files_per_upload
            )));
        }

        if let Some(file) = files
            .iter()
            .find(|file| file.size() > self.limits.max_file_size_bytes)
        {
            return Err(ObdError::upload_rejected(format!(
                "File {} is too large. Maximum size is {}MB.",
                file.name,
                self.limits.max_file_size_bytes / (1024 * 1024)
            )));
        }

        Ok(())
    }

    /// Ingest every file of an upload request for a user
    ///
    /// Only transport failures (limits, scratch space) fail the call; every
    /// per-file problem becomes an error entry in the result.
    pub fn ingest_uploads(&self, user_id: i64, files: Vec<UploadedFile>) -> Result<UploadResult> {
        self.check_limits(&files)?;

        let scratch = TempDir::new()?;
        let mut result = UploadResult::new();

        info!("Processing upload of {} files for user {}", files.len(), user_id);

        for file in files {
            let Some(kind) = file.kind() else {
                warn!("Rejecting {}: unsupported file type", file.name);
                result.push_failure(FileFailure::single(file.name, INVALID_FILE_TYPE));
                continue;
            };

            let name = sanitize_file_name(&file.name);
            let path = scratch.path().join(&name);
            if let Err(e) = fs::write(&path, &file.bytes) {
                result.push_failure(FileFailure::single(
                    file.name,
                    format!("Processing error: {}", e),
                ));
                continue;
            }

            match kind {
                FileKind::TelemetryLog => result.record(self.ingest_file(user_id, &path, &name)),
                FileKind::Archive => result.merge(self.ingest_archive(user_id, &path, &name)),
            }

            if let Err(e) = fs::remove_file(&path) {
                debug!("Could not remove scratch file {}: {}", path.display(), e);
            }
        }

        info!(
            "Upload complete for user {}: {} files stored, {} rejected, {} rows",
            user_id,
            result.success.len(),
            result.errors.len(),
            result.total_rows_processed
        );
        Ok(result)
    }

    /// Run one telemetry log through validation, parsing and storage
    ///
    /// `name` is the name reported in the outcome.
    pub fn ingest_file(&self, user_id: i64, path: &Path, name: &str) -> FileOutcome {
        let validation = self.parser.validate_file(path);
        if !validation.is_valid {
            warn!("{} failed format validation", name);
            return FileOutcome::Rejected(FileFailure::new(name, validation.errors));
        }

        let parsed = self.parser.parse_file(path);
        if parsed.has_errors() {
            // Any structural error rejects the whole file
            warn!("{} has {} line errors, not storing", name, parsed.errors.len());
            return FileOutcome::Rejected(FileFailure::new(name, parsed.errors));
        }

        if parsed.records.is_empty() {
            info!("{} contains no telemetry records, skipping", name);
            return FileOutcome::Empty;
        }

        match self.store.insert_records(user_id, &parsed.records) {
            Ok(rows) => {
                debug!("Stored {} rows from {}", rows, name);
                FileOutcome::Stored(FileSuccess {
                    file: name.to_string(),
                    rows_processed: parsed.records.len(),
                    date: date_from_file_name(name),
                    unsupported_fields: parsed.unsupported_fields,
                })
            }
            Err(e) => {
                warn!("Storing {} failed: {}", name, e);
                FileOutcome::Rejected(FileFailure::single(name, STORE_FAILED))
            }
        }
    }

    /// Ingest every telemetry log inside a ZIP archive
    ///
    /// Members are independent: one failing never blocks the others. An
    /// archive with no telemetry members yields exactly one error entry.
    pub fn ingest_archive(&self, user_id: i64, path: &Path, name: &str) -> UploadResult {
        let mut result = UploadResult::new();

        let mut archive = match open_archive(path) {
            Ok(archive) => archive,
            Err(e) => {
                warn!("Could not open archive {}: {}", name, e);
                result.push_failure(archive_failure(name, e));
                return result;
            }
        };

        let members = match telemetry_members(&mut archive) {
            Ok(members) => members,
            Err(e) => {
                result.push_failure(archive_failure(name, e));
                return result;
            }
        };

        if members.is_empty() {
            warn!("Archive {} has no telemetry logs", name);
            result.push_failure(FileFailure::single(name, NO_ARCHIVE_MEMBERS));
            return result;
        }

        let scratch = match TempDir::new() {
            Ok(scratch) => scratch,
            Err(e) => {
                result.push_failure(archive_failure(name, e));
                return result;
            }
        };

        debug!("Archive {} has {} telemetry logs", name, members.len());

        for member in &members {
            match extract_member(&mut archive, member, scratch.path()) {
                Ok(extracted) => result.record(self.ingest_file(user_id, &extracted, &member.name)),
                Err(e) => {
                    warn!("Could not extract {} from {}: {}", member.name, name, e);
                    result.push_failure(FileFailure::single(
                        member.name.clone(),
                        format!("Error processing file in ZIP: {}", e),
                    ));
                }
            }
        }

        result
    }

    /// Ingest local files, archives or directories of them
    ///
    /// Directories are walked recursively; files of other types inside a
    /// directory are ignored, while an explicitly named one is reported.
    pub fn ingest_path(&self, user_id: i64, path: &Path) -> UploadResult {
        let mut result = UploadResult::new();

        for file in collect_ingest_files(path) {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            match FileKind::from_name(&name) {
                Some(FileKind::TelemetryLog) => result.record(self.ingest_file(user_id, &file, &name)),
                Some(FileKind::Archive) => result.merge(self.ingest_archive(user_id, &file, &name)),
                None => result.push_failure(FileFailure::single(name, INVALID_FILE_TYPE)),
            }
        }

        result
    }

    /// Preview an uploaded telemetry log without storing anything
    pub fn preview_upload(&self, file: UploadedFile) -> Result<PreviewReport> {
        if file.kind() != Some(FileKind::TelemetryLog) {
            return Err(ObdError::invalid_request(INVALID_PREVIEW_TYPE));
        }
        if file.size() > self.limits.max_file_size_bytes {
            return Err(ObdError::upload_rejected(format!(
                "File {} is too large. Maximum size is {}MB.",
                file.name,
                self.limits.max_file_size_bytes / (1024 * 1024)
            )));
        }

        let name = sanitize_file_name(&file.name);
        let scratch = TempDir::new()?;
        let path = scratch.path().join(&name);
        fs::write(&path, &file.bytes)?;

        Ok(build_preview(&self.parser, &path, &name))
    }

    /// Preview a local telemetry log
    pub fn preview_file(&self, path: &Path) -> PreviewReport {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        build_preview(&self.parser, path, &name)
    }
}

fn archive_failure(name: &str, error: impl fmt::Display) -> FileFailure {
    FileFailure::single(name, format!("ZIP file processing error: {}", error))
}

/// Files to ingest for a path, sorted for deterministic processing order
fn collect_ingest_files(path: &Path) -> Vec<std::path::PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|file| {
            file.file_name()
                .and_then(|n| n.to_str())
                .and_then(FileKind::from_name)
                .is_some()
        })
        .collect();
    files.sort();
    files
}
