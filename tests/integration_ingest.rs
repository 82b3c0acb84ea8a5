//! End-to-end ingestion tests against a database file on disk
//!
//! Logs, archives and directories are written to a temporary directory,
//! ingested for a registered user, then read back through the store.

use chrono::NaiveDate;
use obd_ingest::app::services::ingestion::{IngestionOrchestrator, UploadStatus, UploadedFile};
use obd_ingest::app::services::storage::{RecordQuery, RecordStore, SqliteStore};
use obd_ingest::app::services::telemetry_parser::TelemetryParser;
use obd_ingest::config::UploadLimits;
use obd_ingest::{FieldValue, ObdField};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn day_log(day: u32, lines: usize) -> String {
    (0..lines)
        .map(|i| {
            format!(
                "2025-10-{:02}T08:{:02}:00+00:00,Vehicle Speed={},Engine RPM={}.5,Odometer=1234\n",
                day,
                i,
                i * 2,
                900 + i
            )
        })
        .collect()
}

fn write_zip(path: &Path, members: &[(&str, String)]) {
    let mut writer = ZipWriter::new(fs::File::create(path).unwrap());
    for (name, content) in members {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn setup() -> (TempDir, Arc<SqliteStore>, IngestionOrchestrator, i64) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::open(&dir.path().join("db").join("obd.db")).unwrap());
    let user_id = store.create_user("driver@example.com", "secret-pass").unwrap();
    let orchestrator =
        IngestionOrchestrator::new(TelemetryParser::default(), store.clone(), UploadLimits::default());
    (dir, store, orchestrator, user_id)
}

#[test]
fn test_ingest_directory_of_logs_and_archives() {
    let (dir, store, orchestrator, user_id) = setup();

    let logs = dir.path().join("logs");
    fs::create_dir_all(logs.join("october")).unwrap();
    fs::write(logs.join("20-October-2025.csv"), day_log(20, 4)).unwrap();
    fs::write(logs.join("notes.txt"), "ignored").unwrap();
    fs::write(
        logs.join("october").join("broken.csv"),
        "not a timestamp,Vehicle Speed=1\n",
    )
    .unwrap();
    write_zip(
        &logs.join("trip.zip"),
        &[
            ("21-October-2025.csv", day_log(21, 3)),
            ("readme.md", "not telemetry".to_string()),
        ],
    );

    let result = orchestrator.ingest_path(user_id, &logs);

    assert_eq!(result.status(), UploadStatus::PartialSuccess);
    assert_eq!(result.total_rows_processed, 7);
    assert_eq!(result.success.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].file, "broken.csv");
    assert_eq!(result.success[0].unsupported_fields, vec!["Odometer".to_string()]);
    assert_eq!(store.count_records(user_id).unwrap(), 7);

    let dates: Vec<_> = result.success.iter().filter_map(|s| s.date.clone()).collect();
    assert!(dates.contains(&"2025-10-20".to_string()));
    assert!(dates.contains(&"2025-10-21".to_string()));
}

#[test]
fn test_uploaded_records_survive_reopen() {
    let (dir, store, orchestrator, user_id) = setup();

    let result = orchestrator
        .ingest_uploads(
            user_id,
            vec![UploadedFile::new("22-October-2025.csv", day_log(22, 5))],
        )
        .unwrap();
    assert_eq!(result.status(), UploadStatus::AllSucceeded);
    drop(orchestrator);
    drop(store);

    let reopened = SqliteStore::open(&dir.path().join("db").join("obd.db")).unwrap();
    let query = RecordQuery::new(10)
        .with_date(NaiveDate::from_ymd_opt(2025, 10, 22).unwrap())
        .with_fields(vec![ObdField::Rpm]);
    let records = reopened.fetch_records(user_id, &query).unwrap();

    assert_eq!(records.len(), 5);
    // Newest first
    assert!(records[0].record.timestamp > records[4].record.timestamp);
    assert_eq!(records[0].record.get(ObdField::Rpm), Some(FieldValue::Float(904.5)));
    assert_eq!(records[0].record.get(ObdField::Speed), None);
}

#[test]
fn test_broken_upload_stores_nothing() {
    let (_dir, store, orchestrator, user_id) = setup();

    let mut log = day_log(23, 8);
    log.push_str("garbage line without pairs\n");

    let result = orchestrator
        .ingest_uploads(user_id, vec![UploadedFile::new("23-October-2025.csv", log)])
        .unwrap();

    assert_eq!(result.status(), UploadStatus::AllFailed);
    assert_eq!(
        result.errors[0].errors,
        vec!["Line 9: Invalid line format - must have timestamp and at least one data field".to_string()]
    );
    assert_eq!(store.count_records(user_id).unwrap(), 0);
}

#[test]
fn test_delete_day_then_preview() {
    let (dir, store, orchestrator, user_id) = setup();

    orchestrator
        .ingest_uploads(
            user_id,
            vec![
                UploadedFile::new("a.csv", day_log(24, 2)),
                UploadedFile::new("b.csv", day_log(25, 3)),
            ],
        )
        .unwrap();

    let deleted = store
        .delete_records_for_date(user_id, NaiveDate::from_ymd_opt(2025, 10, 24).unwrap())
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(store.count_records(user_id).unwrap(), 3);

    let path = dir.path().join("25-October-2025.csv");
    fs::write(&path, day_log(25, 3)).unwrap();
    let preview = orchestrator.preview_file(&path);

    assert!(preview.is_valid);
    assert_eq!(preview.estimated_rows, 3);
    assert_eq!(preview.supported_fields_found.get("Vehicle Speed"), Some(&3));
    // Previews never write
    assert_eq!(store.count_records(user_id).unwrap(), 3);
}
