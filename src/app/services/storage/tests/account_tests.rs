//! Tests for user accounts and sessions

use super::*;
use crate::app::services::storage::validate_registration;
use crate::error::ObdError;

#[test]
fn test_registration_normalizes_email() {
    assert_eq!(
        validate_registration("  Driver@Example.COM ", "secret").unwrap(),
        "driver@example.com"
    );
}

#[test]
fn test_registration_rejections() {
    let cases = [
        ("", "secret", "Email and password are required"),
        ("driver@example.com", "", "Email and password are required"),
        ("not-an-email", "secret", "Invalid email format"),
        ("driver@example", "secret", "Invalid email format"),
        ("driver@example.com", "12345", "Password must be at least 6 characters long"),
    ];

    for (email, password, expected) in cases {
        match validate_registration(email, password) {
            Err(ObdError::InvalidRequest { message }) => assert_eq!(message, expected),
            other => panic!("Expected InvalidRequest for {:?}, got {:?}", email, other),
        }
    }
}

#[test]
fn test_duplicate_email_is_rejected() {
    let (store, _) = create_store_with_user();
    let result = store.create_user("driver@example.com", "another-pass");

    assert!(matches!(result, Err(ObdError::EmailTaken { .. })));
}

#[test]
fn test_authentication() {
    let (store, user_id) = create_store_with_user();

    assert_eq!(
        store.authenticate_user("driver@example.com", "secret-pass").unwrap(),
        user_id
    );
    assert!(matches!(
        store.authenticate_user("driver@example.com", "wrong-pass"),
        Err(ObdError::InvalidCredentials)
    ));
    assert!(matches!(
        store.authenticate_user("nobody@example.com", "secret-pass"),
        Err(ObdError::InvalidCredentials)
    ));
    assert_eq!(store.find_user_id("driver@example.com").unwrap(), Some(user_id));
    assert_eq!(store.find_user_id("nobody@example.com").unwrap(), None);
}

#[test]
fn test_session_lifecycle() {
    let (store, user_id) = create_store_with_user();
    let token = store.create_session(user_id).unwrap();

    assert_eq!(token.len(), 64);
    assert_eq!(store.validate_session(&token).unwrap(), Some(user_id));
    assert!(store.revoke_session(&token).unwrap());
    assert_eq!(store.validate_session(&token).unwrap(), None);
    assert!(!store.revoke_session(&token).unwrap());
}

#[test]
fn test_expired_sessions_are_rejected_and_purged() {
    let store = SqliteStore::open_in_memory().unwrap().with_session_ttl(0);
    let user_id = store.create_user("driver@example.com", "secret-pass").unwrap();

    let stale = store.create_session(user_id).unwrap();
    assert_eq!(store.validate_session(&stale).unwrap(), None);

    // Pushing the expiry into the past makes the next login purge it
    store
        .connection()
        .unwrap()
        .execute("UPDATE sessions SET expires_at = expires_at - 10", [])
        .unwrap();
    store.create_session(user_id).unwrap();

    let remaining: i64 = store
        .connection()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
}
