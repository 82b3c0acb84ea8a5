//! Test utilities for HTTP API testing
//!
//! Requests are driven straight through the router with
//! `tower::ServiceExt::oneshot`; no socket is opened.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use crate::app::api::{AppState, router};
use crate::app::services::storage::SqliteStore;
use crate::config::ObdConfig;


const BOUNDARY: &str = "obd-test-boundary";

pub const EMAIL: &str = "driver@example.com";
pub const PASSWORD: &str = "secret-pass";

/// Router over a fresh in-memory store
pub fn create_app() -> Router {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    router(AppState::new(&ObdConfig::default(), store))
}

/// Send a request and decode the JSON response body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Multipart request carrying each file under the given field name
pub fn multipart_request(uri: &str, token: &str, field: &str, files: &[(&str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, content) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Register the default user and return a session token
pub async fn register_and_login(app: &Router) -> String {
    let credentials = json!({ "email": EMAIL, "password": PASSWORD });

    let (status, _) = send(app, json_request("POST", "/register", credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, json_request("POST", "/login", credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["session_token"].as_str().unwrap().to_string()
}

/// Well-formed telemetry log for 21 October 2025
pub fn valid_log(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            format!(
                "2025-10-21T10:00:{:02}+00:00,Vehicle Speed={},Engine RPM={},Fuel Level=50.5\n",
                i,
                i,
                800 + i
            )
        })
        .collect()
}
