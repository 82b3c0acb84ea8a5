//! Tests for upload previews

use super::*;
use crate::app::services::ingestion::UploadedFile;

#[test]
fn test_preview_of_valid_log() {
    let (orchestrator, store, user_id) = create_orchestrator();
    let report = orchestrator
        .preview_upload(UploadedFile::new("21-October-2025.csv", valid_log(8)))
        .unwrap();

    assert_eq!(report.filename, "21-October-2025.csv");
    assert!(report.is_valid);
    assert!(report.validation_errors.is_empty());
    assert_eq!(report.supported_fields_found.get("Vehicle Speed"), Some(&8));
    assert_eq!(report.unsupported_fields_found, vec!["Custom Field"]);
    assert_eq!(report.sample_data.len(), 5);
    assert_eq!(report.estimated_rows, 8);
    assert!(report.parse_errors.is_empty());

    // Nothing is stored
    assert_eq!(store.count_records(user_id).unwrap(), 0);
}

#[test]
fn test_preview_caps_parse_errors() {
    let (orchestrator, _store, _user_id) = create_orchestrator();
    let report = orchestrator
        .preview_upload(UploadedFile::new("broken.csv", bad_timestamp_log(15)))
        .unwrap();

    assert!(!report.is_valid);
    assert_eq!(report.validation_errors.len(), 5);
    assert_eq!(report.parse_errors.len(), 10);
    assert_eq!(report.estimated_rows, 0);
    assert!(report.sample_data.is_empty());
}

#[test]
fn test_preview_rejects_non_logs() {
    let (orchestrator, _store, _user_id) = create_orchestrator();

    for name in ["bundle.zip", "notes.txt"] {
        match orchestrator.preview_upload(UploadedFile::new(name, "x")) {
            Err(ObdError::InvalidRequest { message }) => {
                assert_eq!(message, "Invalid file type. Only CSV files are allowed for preview.")
            }
            other => panic!("Expected InvalidRequest for {}, got {:?}", name, other),
        }
    }
}

#[test]
fn test_preview_serializes_with_wire_names() {
    let (orchestrator, _store, _user_id) = create_orchestrator();
    let report = orchestrator
        .preview_upload(UploadedFile::new("trip.csv", valid_log(1)))
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    for key in [
        "filename",
        "is_valid",
        "validation_errors",
        "supported_fields_found",
        "unsupported_fields_found",
        "sample_data",
        "parse_errors",
        "estimated_rows",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["sample_data"][0]["speed"], 0);
}
