//! Bearer-token authentication

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use super::run_blocking;
use super::state::AppState;

/// The user owning the session token in the `Authorization` header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Missing or invalid authorization header"))?;

        let store = state.store.clone();
        let lookup = token.clone();
        match run_blocking(move || store.validate_session(&lookup)).await? {
            Some(user_id) => Ok(Self { user_id, token }),
            None => Err(ApiError::unauthorized("Invalid or expired session")),
        }
    }
}
