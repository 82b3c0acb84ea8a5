//! Upload ingestion for telemetry logs and ZIP archives
//!
//! # Architecture
//!
//! - [`orchestrator`] - Dispatch, the single-file path and archive fan-out
//! - [`archive`] - ZIP member discovery and safe extraction
//! - [`upload`] - Uploaded payloads, file types and file-name handling
//! - [`preview`] - Read-only preview reports
//! - [`result`] - Per-file outcomes and the aggregated upload result
//!
//! # Ingestion policy
//!
//! The parser tolerates broken lines, but ingestion does not: a file with
//! any structural line error is rejected as a whole and none of its records
//! are stored. Files inside an archive are judged independently.

pub mod archive;
pub mod orchestrator;
pub mod preview;
pub mod result;
pub mod upload;

#[cfg(test)]
pub mod tests;

pub use orchestrator::IngestionOrchestrator;
pub use preview::PreviewReport;
pub use result::{
    FileFailure, FileOutcome, FileSuccess, UploadResult, UploadStatus, UploadSummary,
};
pub use upload::{FileKind, UploadedFile};
