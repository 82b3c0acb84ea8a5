//! User accounts and login sessions
//!
//! Passwords are stored as `salt:sha256(password + salt)` in hex. Session
//! tokens are random hex strings with an expiry stored as unix seconds;
//! expired sessions are purged whenever a new one is issued.

use chrono::Utc;
use regex::Regex;
use rusqlite::{ErrorCode, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use tracing::{debug, info};

use super::SqliteStore;
use crate::constants::{MIN_PASSWORD_LENGTH, PASSWORD_SALT_BYTES, SESSION_TOKEN_BYTES};
use crate::error::{ObdError, Result};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Check registration input and return the normalized (trimmed, lowercase) email
pub fn validate_registration(email: &str, password: &str) -> Result<String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() || password.is_empty() {
        return Err(ObdError::invalid_request("Email and password are required"));
    }
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ObdError::invalid_request("Invalid email format"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ObdError::invalid_request(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(email)
}

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

fn hash_password(password: &str) -> String {
    let salt = hex::encode(rand::random::<[u8; PASSWORD_SALT_BYTES]>());
    format!("{}:{}", salt, digest(password, &salt))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once(':') {
        Some((salt, expected)) => digest(password, salt) == expected,
        None => false,
    }
}

impl SqliteStore {
    /// Register a user, returning the new user id
    ///
    /// The email is stored as given; callers normalize it first.
    pub fn create_user(&self, email: &str, password: &str) -> Result<i64> {
        let conn = self.connection()?;
        let inserted = conn.execute(
            "INSERT INTO users (email, password_hash) VALUES (?1, ?2)",
            params![email, hash_password(password)],
        );

        match inserted {
            Ok(_) => {
                info!("Registered user {}", email);
                Ok(conn.last_insert_rowid())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(ObdError::EmailTaken {
                    email: email.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Id of the user registered under an email
    pub fn find_user_id(&self, email: &str) -> Result<Option<i64>> {
        let conn = self.connection()?;
        Ok(conn
            .query_row(
                "SELECT id FROM users WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Check credentials, returning the user id on success
    pub fn authenticate_user(&self, email: &str, password: &str) -> Result<i64> {
        let conn = self.connection()?;
        let user = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE email = ?1",
                params![email],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match user {
            Some((id, stored)) if verify_password(password, &stored) => Ok(id),
            _ => Err(ObdError::InvalidCredentials),
        }
    }

    /// Issue a new session token for a user
    pub fn create_session(&self, user_id: i64) -> Result<String> {
        let now = Utc::now().timestamp();
        let token = hex::encode(rand::random::<[u8; SESSION_TOKEN_BYTES]>());

        let conn = self.connection()?;
        let purged = conn.execute(
            "DELETE FROM sessions WHERE expires_at < ?1",
            params![now],
        )?;
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }

        conn.execute(
            "INSERT INTO sessions (user_id, session_token, expires_at) VALUES (?1, ?2, ?3)",
            params![user_id, token, now.saturating_add(self.session_ttl_secs)],
        )?;
        Ok(token)
    }

    /// User id owning an unexpired session token
    pub fn validate_session(&self, token: &str) -> Result<Option<i64>> {
        let conn = self.connection()?;
        Ok(conn
            .query_row(
                "SELECT user_id FROM sessions WHERE session_token = ?1 AND expires_at > ?2",
                params![token, Utc::now().timestamp()],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Remove a session; returns whether it existed
    pub fn revoke_session(&self, token: &str) -> Result<bool> {
        let conn = self.connection()?;
        let removed = conn.execute(
            "DELETE FROM sessions WHERE session_token = ?1",
            params![token],
        )?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let stored = hash_password("hunter22");
        let (salt, hash) = stored.split_once(':').unwrap();

        assert_eq!(salt.len(), PASSWORD_SALT_BYTES * 2);
        assert_eq!(hash.len(), 64);
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
        assert!(!verify_password("hunter22", "no-separator"));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }
}
