//! HTTP service exposing accounts, uploads, previews and stored data
//!
//! # Routes
//!
//! | Method | Path                   | Auth   |
//! |--------|------------------------|--------|
//! | POST   | `/register`            | no     |
//! | POST   | `/login`               | no     |
//! | POST   | `/logout`              | bearer |
//! | GET    | `/data`                | bearer |
//! | DELETE | `/data`                | bearer |
//! | POST   | `/data/upload`         | bearer |
//! | POST   | `/data/upload/preview` | bearer |
//! | GET    | `/health`              | no     |
//! | GET    | `/supported-data`      | no     |
//!
//! Storage and parsing are synchronous, so handlers hand that work to
//! blocking tasks.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

#[cfg(test)]
pub mod tests;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Span, info};

pub use error::ApiError;
pub use state::AppState;

use crate::error::{ObdError, Result};

/// Run synchronous work on the blocking pool
pub(crate) async fn run_blocking<T, F>(work: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ObdError::processing_interrupted(e.to_string()))?;
    Ok(outcome?)
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.orchestrator.limits().max_request_bytes();

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/data", get(handlers::get_data).delete(handlers::delete_data))
        .route("/data/upload", post(handlers::upload))
        .route("/data/upload/preview", post(handlers::preview))
        .route("/health", get(handlers::health))
        .route("/supported-data", get(handlers::supported_data))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, _span: &Span| {
                    tracing::info!(
                        status = %res.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    )
                }),
        )
        .with_state(state)
}

/// Serve the API until Ctrl+C is received
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down HTTP service");
            }
        })
        .await?;
    Ok(())
}
