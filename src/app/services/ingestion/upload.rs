//! Uploaded file payloads and file-name handling

use chrono::NaiveDate;
use std::path::Path;

use crate::constants::{CSV_EXTENSION, LOG_FILE_DATE_FORMAT, ZIP_EXTENSION};

/// One file received in an upload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name as supplied by the client
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_name(&self.name)
    }
}

/// Accepted upload file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    TelemetryLog,
    Archive,
}

impl FileKind {
    /// Classify a file by its (case-insensitive) extension
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        if extension.eq_ignore_ascii_case(CSV_EXTENSION) {
            Some(FileKind::TelemetryLog)
        } else if extension.eq_ignore_ascii_case(ZIP_EXTENSION) {
            Some(FileKind::Archive)
        } else {
            None
        }
    }
}

/// Reduce a client supplied name to a safe single path component
///
/// Directory parts are dropped, whitespace becomes `_`, and anything other
/// than ASCII letters, digits, `.`, `-` and `_` is removed.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Day encoded in a log file name such as `21-October-2025.csv`, as `YYYY-MM-DD`
pub fn date_from_file_name(name: &str) -> Option<String> {
    let stem = Path::new(name).file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, LOG_FILE_DATE_FORMAT)
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}
