//! OBD Telemetry Ingestion Library
//!
//! A Rust library for ingesting line-oriented vehicle OBD telemetry logs into
//! a per-user SQLite store.
//!
//! This library provides tools for:
//! - Resolving sensor labels against a catalog of supported fields
//! - Parsing logs line by line, tolerating unknown labels and dropped values
//! - Validating and previewing logs before they are stored
//! - Ingesting single logs, ZIP archives and directories with per-file outcomes
//! - Storing and querying records per user, with accounts and sessions
//! - Serving the same operations over an HTTP API

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod api;
    pub mod models;
    pub mod services {
        pub mod ingestion;
        pub mod storage;
        pub mod telemetry_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FieldValue, ObdField, ObdRecord};
pub use config::ObdConfig;
pub use error::{ObdError, Result};
