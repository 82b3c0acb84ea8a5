//! Test utilities for ingestion testing

use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::app::models::{ObdField, ObdRecord};
use crate::app::services::ingestion::IngestionOrchestrator;
use crate::app::services::storage::{RecordQuery, RecordStore, SqliteStore, StoredRecord};
use crate::app::services::telemetry_parser::TelemetryParser;
use crate::config::UploadLimits;
use crate::error::{ObdError, Result};

mod preview_tests;

/// Orchestrator over a fresh in-memory store with one user
pub fn create_orchestrator() -> (IngestionOrchestrator, Arc<SqliteStore>, i64) {
    create_orchestrator_with_limits(UploadLimits::default())
}

pub fn create_orchestrator_with_limits(
    limits: UploadLimits,
) -> (IngestionOrchestrator, Arc<SqliteStore>, i64) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let user_id = store.create_user("driver@example.com", "secret-pass").unwrap();
    let orchestrator =
        IngestionOrchestrator::new(TelemetryParser::default(), store.clone(), limits);
    (orchestrator, store, user_id)
}

/// Well-formed log with the given number of lines
pub fn valid_log(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            format!(
                "2025-10-21T10:{:02}:{:02}+00:00,Vehicle Speed={},Engine Coolant Temperature=74,Custom Field=1\n",
                i / 60,
                i % 60,
                i
            )
        })
        .collect()
}

/// Log whose every line has an unparseable timestamp
pub fn bad_timestamp_log(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {} o'clock,Vehicle Speed={}\n", i, i))
        .collect()
}

/// Log with a broken line after the validation window
pub fn log_with_late_broken_line() -> String {
    let mut content = valid_log(6);
    content.push_str("2025-10-21T10:00:59+00:00\n");
    content.push_str(&valid_log(1));
    content
}

/// Build a ZIP archive in memory; names ending in `/` become directories
pub fn build_zip(members: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, content) in members {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

/// Store whose inserts always fail
pub struct FailingStore;

impl RecordStore for FailingStore {
    fn insert_records(&self, _user_id: i64, _records: &[ObdRecord]) -> Result<usize> {
        Err(ObdError::store_unavailable("disk full"))
    }

    fn fetch_records(&self, _user_id: i64, _query: &RecordQuery) -> Result<Vec<StoredRecord>> {
        Ok(Vec::new())
    }

    fn allowed_fields(&self) -> &[ObdField] {
        &[]
    }

    fn delete_records_for_date(&self, _user_id: i64, _date: chrono::NaiveDate) -> Result<usize> {
        Ok(0)
    }
}
