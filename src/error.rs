//! Error handling for OBD ingestion operations.
//!
//! Provides the crate-wide error enum covering file access, storage,
//! archive extraction, upload transport limits and account management.

use thiserror::Error;

use crate::app::models::ObdField;

#[derive(Error, Debug)]
pub enum ObdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("ZIP archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Upload rejected: {reason}")]
    UploadRejected { reason: String },

    #[error("Invalid data types: {fields:?}")]
    InvalidFieldFilter {
        fields: Vec<String>,
        supported: Vec<ObdField>,
    },

    #[error("Email already exists: {email}")]
    EmailTaken { email: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Storage unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl ObdError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn upload_rejected(reason: impl Into<String>) -> Self {
        Self::UploadRejected {
            reason: reason.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObdError>;
