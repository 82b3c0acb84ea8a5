//! Per-file outcomes and the aggregate upload result

use serde::Serialize;

/// A file whose records were stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSuccess {
    pub file: String,
    pub rows_processed: usize,

    /// Calendar day encoded in the file name (`21-October-2025.csv`), as `YYYY-MM-DD`
    pub date: Option<String>,

    pub unsupported_fields: Vec<String>,
}

/// A file rejected as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub errors: Vec<String>,
}

impl FileFailure {
    pub fn new(file: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            file: file.into(),
            errors,
        }
    }

    pub fn single(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(file, vec![error.into()])
    }
}

/// Result of running one file through the single-file path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Stored(FileSuccess),
    Rejected(FileFailure),

    /// Parsed cleanly but produced no records; nothing to report
    Empty,
}

/// Overall status of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    AllSucceeded,
    PartialSuccess,
    AllFailed,
}

/// Counts reported alongside an upload result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub total_files_processed: usize,
    pub total_rows_processed: usize,
    pub successful_files: usize,
    pub failed_files: usize,
}

/// Aggregated outcome of one upload request
///
/// Entries are appended in processing order and never merged or
/// deduplicated. Totals only count stored files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub success: Vec<FileSuccess>,
    pub errors: Vec<FileFailure>,
    pub total_rows_processed: usize,
    pub total_files_processed: usize,
}

impl UploadResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the outcome of one file
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Stored(success) => {
                self.total_rows_processed += success.rows_processed;
                self.total_files_processed += 1;
                self.success.push(success);
            }
            FileOutcome::Rejected(failure) => self.errors.push(failure),
            FileOutcome::Empty => {}
        }
    }

    pub fn push_failure(&mut self, failure: FileFailure) {
        self.errors.push(failure);
    }

    /// Append another result, e.g. the members of an archive
    pub fn merge(&mut self, other: UploadResult) {
        self.success.extend(other.success);
        self.errors.extend(other.errors);
        self.total_rows_processed += other.total_rows_processed;
        self.total_files_processed += other.total_files_processed;
    }

    pub fn summary(&self) -> UploadSummary {
        UploadSummary {
            total_files_processed: self.total_files_processed,
            total_rows_processed: self.total_rows_processed,
            successful_files: self.success.len(),
            failed_files: self.errors.len(),
        }
    }

    pub fn status(&self) -> UploadStatus {
        match (self.success.is_empty(), self.errors.is_empty()) {
            (_, true) => UploadStatus::AllSucceeded,
            (true, false) => UploadStatus::AllFailed,
            (false, false) => UploadStatus::PartialSuccess,
        }
    }
}
