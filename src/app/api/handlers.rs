//! Request handlers

use axum::Json;
use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::auth::AuthUser;
use super::error::ApiError;
use super::run_blocking;
use super::state::AppState;
use crate::app::services::ingestion::{UploadStatus, UploadedFile};
use crate::app::services::storage::{
    QUERYABLE_FIELDS, RecordQuery, RecordStore, parse_query_date, resolve_field_filter,
    validate_registration,
};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

fn credentials(body: Result<Json<Credentials>, JsonRejection>) -> Result<Credentials, ApiError> {
    body.map(|Json(credentials)| credentials)
        .map_err(|_| ApiError::bad_request("No JSON data provided"))
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let credentials = credentials(body)?;
    let email = validate_registration(&credentials.email, &credentials.password)?;

    let store = state.store.clone();
    run_blocking(move || store.create_user(&email, &credentials.password)).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let credentials = credentials(body)?;
    let email = credentials.email.trim().to_lowercase();
    if email.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let store = state.store.clone();
    let token = run_blocking(move || {
        let user_id = store.authenticate_user(&email, &credentials.password)?;
        store.create_session(user_id)
    })
    .await?;

    Ok(Json(json!({
        "message": "Login successful",
        "session_token": token,
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let store = state.store.clone();
    if run_blocking(move || store.revoke_session(&user.token)).await? {
        Ok(Json(json!({ "message": "Logout successful" })))
    } else {
        Err(ApiError::not_found("Session not found"))
    }
}

/// `GET /data` query string; `data_types` may repeat
#[derive(Debug, Default)]
struct DataParams {
    date: Option<String>,
    data_types: Vec<String>,
    limit: Option<i64>,
}

impl DataParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "date" => params.date = Some(value),
                "data_types" => params.data_types.push(value),
                // Unparseable limits fall back to the default
                "limit" => params.limit = value.trim().parse().ok(),
                _ => {}
            }
        }
        params
    }
}

pub async fn get_data(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let params = DataParams::from_pairs(pairs);
    let limit = state.query_limits.effective_limit(params.limit);
    let fields = resolve_field_filter(&params.data_types, state.store.allowed_fields())?;

    let mut query = RecordQuery::new(limit);
    if let Some(date) = params.date.as_deref().and_then(parse_query_date) {
        query = query.with_date(date);
    }
    if let Some(fields) = fields {
        query = query.with_fields(fields);
    }

    let store = state.store.clone();
    let user_id = user.user_id;
    let records = run_blocking(move || store.fetch_records(user_id, &query)).await?;
    debug!("Returning {} records to user {}", records.len(), user_id);

    let data_types_filter = if params.data_types.is_empty() {
        json!("all")
    } else {
        json!(params.data_types)
    };

    Ok(Json(json!({
        "count": records.len(),
        "data": records,
        "limit": limit,
        "date_filter": params.date,
        "data_types_filter": data_types_filter,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    date: Option<String>,
}

pub async fn delete_data(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let raw = params
        .date
        .ok_or_else(|| ApiError::bad_request("A date (dd-mm-yyyy) is required"))?;
    let date = parse_query_date(&raw)
        .ok_or_else(|| ApiError::bad_request("Invalid date format. Use dd-mm-yyyy"))?;

    let store = state.store.clone();
    let user_id = user.user_id;
    let deleted = run_blocking(move || store.delete_records_for_date(user_id, date)).await?;

    Ok(Json(json!({
        "message": "Data deleted",
        "date": raw,
        "deleted": deleted,
    })))
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, ApiError> {
    let Some(name) = field.file_name().map(str::to_string).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(Some(UploadedFile::new(name, bytes.to_vec())))
}

pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("files") {
            files.extend(read_file(field).await?);
        }
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    info!("User {} uploaded {} files", user.user_id, files.len());

    let orchestrator = state.orchestrator.clone();
    let user_id = user.user_id;
    let result = run_blocking(move || orchestrator.ingest_uploads(user_id, files)).await?;

    let status = match result.status() {
        UploadStatus::AllSucceeded => StatusCode::OK,
        UploadStatus::PartialSuccess => StatusCode::MULTI_STATUS,
        UploadStatus::AllFailed => StatusCode::BAD_REQUEST,
    };

    Ok((
        status,
        Json(json!({
            "message": "File upload completed",
            "summary": result.summary(),
            "success": result.success,
            "errors": result.errors,
        })),
    )
        .into_response())
}

pub async fn preview(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            file = read_file(field).await?;
            break;
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let orchestrator = state.orchestrator.clone();
    let report = run_blocking(move || orchestrator.preview_upload(file)).await?;

    Ok(Json(report).into_response())
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "OBD Dashboard API is running",
    }))
}

pub async fn supported_data() -> Json<Value> {
    Json(json!({
        "supported_data_types": QUERYABLE_FIELDS.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
        "description": "Available OBD data types that can be requested",
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
