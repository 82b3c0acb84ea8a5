//! Test utilities for storage testing

use tempfile::TempDir;

use crate::app::models::{FieldValue, ObdField, ObdRecord};
use crate::app::services::storage::SqliteStore;

// Test modules
mod account_tests;

/// Store backed by a file in a fresh temporary directory
pub fn create_file_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&temp_dir.path().join("nested").join("obd.db")).unwrap();
    (temp_dir, store)
}

/// In-memory store with one registered user
pub fn create_store_with_user() -> (SqliteStore, i64) {
    let store = SqliteStore::open_in_memory().unwrap();
    let user_id = store.create_user("driver@example.com", "secret-pass").unwrap();
    (store, user_id)
}

/// Record with the given measurements
pub fn record(timestamp: &str, values: &[(ObdField, FieldValue)]) -> ObdRecord {
    let mut record = ObdRecord::new(timestamp);
    for &(field, value) in values {
        record.set(field, value);
    }
    record
}
