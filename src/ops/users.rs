//! User registration, login and removal.
//!
//! PINs are hashed with argon2 and never leave this module. Login and
//! registration hand back a [`Session`] that the caller threads through
//! every other operation.

use crate::constants::MIN_PIN_LENGTH;
use crate::db::{users, Database};
use crate::errors::{OpError, OpResult};
use crate::session::Session;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Account details safe to display; the PIN hash stays internal.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub created_at: String,
}

fn hash_pin(pin: &str) -> OpResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| OpError::Fatal(format!("PIN hashing failed: {e}")))
}

fn verify_pin(pin: &str, stored_hash: &str) -> OpResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| OpError::Fatal(format!("Stored PIN hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok())
}

/// Creates a new account and returns its session.
///
/// Blank usernames and PINs below the minimum length are validation
/// failures; an existing username is a conflict.
pub fn register(db: &Database, username: &str, pin: &str) -> OpResult<Session> {
    let username = username.trim();
    if username.is_empty() {
        return Err(OpError::Validation("Username is required.".to_string()));
    }
    if pin.len() < MIN_PIN_LENGTH {
        return Err(OpError::Validation(format!(
            "PIN must be at least {MIN_PIN_LENGTH} characters."
        )));
    }

    let conn = db.get_conn()?;
    if users::get_by_username(&conn, username)?.is_some() {
        return Err(OpError::Conflict("Username already exists.".to_string()));
    }

    let id = Uuid::new_v4();
    let pin_hash = hash_pin(pin)?;
    users::insert(&conn, id, username, &pin_hash)?;
    info!("Registered user '{}'", username);
    Ok(Session::new(id, username))
}

/// Verifies credentials and returns a session.
///
/// An unknown username is a not-found failure; a wrong PIN a validation
/// failure.
pub fn login(db: &Database, username: &str, pin: &str) -> OpResult<Session> {
    if username.trim().is_empty() {
        return Err(OpError::Validation("Username is required.".to_string()));
    }
    if pin.is_empty() {
        return Err(OpError::Validation("PIN is required.".to_string()));
    }

    let conn = db.get_conn()?;
    let user = users::get_by_username(&conn, username.trim())?
        .ok_or_else(|| OpError::NotFound("User not found.".to_string()))?;

    if !verify_pin(pin, &user.pin_hash)? {
        return Err(OpError::Validation("Invalid PIN.".to_string()));
    }

    info!("User '{}' logged in", user.username);
    Ok(Session::new(user.id, user.username))
}

/// Lists all accounts ordered by username.
pub fn list_users(db: &Database) -> OpResult<Vec<UserSummary>> {
    let conn = db.get_conn()?;
    Ok(users::list(&conn)?
        .into_iter()
        .map(|user| UserSummary {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        })
        .collect())
}

/// Deletes an account and, through the store, all of its entries.
///
/// A missing id is a not-found failure. The caller's session value becomes
/// dead after deleting its own account.
pub fn delete_user(db: &Database, id: Uuid) -> OpResult<()> {
    let conn = db.get_conn()?;
    let user = users::get_by_id(&conn, id)?
        .ok_or_else(|| OpError::NotFound("User not found.".to_string()))?;

    users::delete(&conn, id)?;
    info!("Deleted user '{}'", user.username);
    Ok(())
}
