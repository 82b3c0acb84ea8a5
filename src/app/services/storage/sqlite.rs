//! SQLite implementation of the record store

use chrono::NaiveDate;
use rusqlite::types::{ToSql, Value};
use rusqlite::{Connection, params, params_from_iter};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::{QUERYABLE_FIELDS, RecordQuery, RecordStore, StoredRecord};
use crate::app::models::{FieldValue, ObdField, ObdRecord};
use crate::constants::DEFAULT_SESSION_TTL_SECS;
use crate::error::{ObdError, Result};

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    session_token TEXT UNIQUE NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    expires_at INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users (id)
);

CREATE TABLE IF NOT EXISTS obd_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    timestamp TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users (id)
);

CREATE INDEX IF NOT EXISTS idx_obd_data_user_timestamp ON obd_data(user_id, timestamp);
CREATE INDEX IF NOT EXISTS idx_sessions_token ON sessions(session_token);
CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);
"#;

/// SQLite-backed store for telemetry records, users and sessions
///
/// A single connection is shared behind a mutex; callers on async runtimes
/// should invoke it from blocking tasks.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    pub(super) session_ttl_secs: i64,
}

impl SqliteStore {
    /// Open (creating if needed) a database file and bring its schema up to date
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        info!("Opening database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        let added = migrate_measurement_columns(&conn)?;
        if added > 0 {
            info!("Added {} measurement columns to obd_data", added);
        }

        Ok(Self {
            conn: Mutex::new(conn),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS as i64,
        })
    }

    /// Set the lifetime of newly created sessions
    pub fn with_session_ttl(mut self, ttl_secs: u64) -> Self {
        self.session_ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        self
    }

    pub(super) fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ObdError::store_unavailable("database connection lock poisoned"))
    }

    /// Number of stored records for a user
    pub fn count_records(&self, user_id: i64) -> Result<usize> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM obd_data WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Add any measurement column missing from an older `obd_data` table
fn migrate_measurement_columns(conn: &Connection) -> Result<usize> {
    let mut stmt = conn.prepare("PRAGMA table_info(obd_data)")?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut added = 0;
    for field in ObdField::ALL {
        if !existing.iter().any(|column| column == field.as_str()) {
            debug!("Adding column obd_data.{}", field);
            conn.execute_batch(&format!(
                "ALTER TABLE obd_data ADD COLUMN {} REAL",
                field.as_str()
            ))?;
            added += 1;
        }
    }
    Ok(added)
}

fn column_list(fields: &[ObdField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl RecordStore for SqliteStore {
    fn insert_records(&self, user_id: i64, records: &[ObdRecord]) -> Result<usize> {
        let sql = format!(
            "INSERT INTO obd_data (user_id, timestamp, {}) VALUES (?{})",
            column_list(&ObdField::ALL),
            ", ?".repeat(ObdField::ALL.len() + 1)
        );

        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for record in records {
                let values: Vec<Option<FieldValue>> =
                    ObdField::ALL.iter().map(|&field| record.get(field)).collect();

                let mut row: Vec<&dyn ToSql> = Vec::with_capacity(values.len() + 2);
                row.push(&user_id);
                row.push(&record.timestamp);
                row.extend(values.iter().map(|value| value as &dyn ToSql));
                stmt.execute(row.as_slice())?;
            }
        }
        tx.commit()?;

        debug!("Inserted {} records for user {}", records.len(), user_id);
        Ok(records.len())
    }

    fn fetch_records(&self, user_id: i64, query: &RecordQuery) -> Result<Vec<StoredRecord>> {
        let columns: Vec<ObdField> = match &query.fields {
            Some(fields) => fields
                .iter()
                .copied()
                .filter(|field| QUERYABLE_FIELDS.contains(field))
                .collect(),
            None => ObdField::ALL.to_vec(),
        };

        let mut sql = String::from("SELECT id, timestamp");
        for field in &columns {
            sql.push_str(", ");
            sql.push_str(field.as_str());
        }
        sql.push_str(" FROM obd_data WHERE user_id = ?");

        let mut bindings = vec![Value::Integer(user_id)];
        if let Some(date) = query.date {
            sql.push_str(" AND DATE(timestamp) = ?");
            bindings.push(Value::Text(date.format("%Y-%m-%d").to_string()));
        }
        sql.push_str(" ORDER BY timestamp DESC LIMIT ?");
        bindings.push(Value::Integer(
            i64::try_from(query.limit).unwrap_or(i64::MAX),
        ));

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bindings), |row| {
            let mut record = ObdRecord::new(row.get::<_, String>(1)?);
            for (offset, &field) in columns.iter().enumerate() {
                if let Some(value) = row.get::<_, Option<f64>>(offset + 2)? {
                    record.set(field, FieldValue::Float(value));
                }
            }
            Ok(StoredRecord {
                id: row.get(0)?,
                record,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn allowed_fields(&self) -> &[ObdField] {
        &QUERYABLE_FIELDS
    }

    fn delete_records_for_date(&self, user_id: i64, date: NaiveDate) -> Result<usize> {
        let conn = self.connection()?;
        let deleted = conn.execute(
            "DELETE FROM obd_data WHERE user_id = ?1 AND DATE(timestamp) = ?2",
            params![user_id, date.format("%Y-%m-%d").to_string()],
        )?;

        info!("Deleted {} records for user {} on {}", deleted, user_id, date);
        Ok(deleted)
    }
}
