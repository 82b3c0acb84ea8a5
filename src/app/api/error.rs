//! JSON error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::error;

use crate::error::ObdError;

/// Error rendered as `{"error": ...}` with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ObdError> for ApiError {
    fn from(err: ObdError) -> Self {
        match err {
            ObdError::UploadRejected { reason } => Self::bad_request(reason),
            ObdError::InvalidRequest { message } => Self::bad_request(message),
            ObdError::InvalidFieldFilter { fields, supported } => Self {
                status: StatusCode::BAD_REQUEST,
                body: json!({
                    "error": format!("Invalid data types: {:?}", fields),
                    "supported_types": supported.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
                }),
            },
            ObdError::EmailTaken { .. } => Self::new(StatusCode::CONFLICT, "Email already exists"),
            ObdError::InvalidCredentials => Self::unauthorized("Invalid email or password"),
            other => {
                error!("Request failed: {}", other);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
