//! User account rows.
//!
//! This module stores account records only; PIN hashing and verification live
//! in the ops layer, which never hands the hash to callers.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

/// Represents a user account in the database.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub pin_hash: String,
    pub created_at: String,
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    let raw_id: String = row.get(0)?;
    Ok(User {
        id: Uuid::parse_str(&raw_id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        username: row.get(1)?,
        pin_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Retrieves a user by username. Returns `Ok(None)` if it doesn't exist.
pub fn get_by_username(conn: &Connection, username: &str) -> AppResult<Option<User>> {
    conn.query_row(
        "SELECT id, username, pin_hash, created_at FROM users WHERE username = ?1",
        params![username],
        user_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves a user by id. Returns `Ok(None)` if it doesn't exist.
pub fn get_by_id(conn: &Connection, id: Uuid) -> AppResult<Option<User>> {
    conn.query_row(
        "SELECT id, username, pin_hash, created_at FROM users WHERE id = ?1",
        params![id.to_string()],
        user_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Lists all users ordered by username.
pub fn list(conn: &Connection) -> AppResult<Vec<User>> {
    let mut stmt = conn
        .prepare("SELECT id, username, pin_hash, created_at FROM users ORDER BY username ASC")
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt.query_map([], user_from_row).map_err(DatabaseError::Sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Inserts a new user.
///
/// # Errors
///
/// Returns an error if the database operation fails (including the
/// username-uniqueness constraint).
pub fn insert(conn: &Connection, id: Uuid, username: &str, pin_hash: &str) -> AppResult<()> {
    debug!("Inserting user '{}'", username);

    conn.execute(
        "INSERT INTO users (id, username, pin_hash) VALUES (?1, ?2, ?3)",
        params![id.to_string(), username, pin_hash],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Deletes a user by id. Returns whether a row was removed.
///
/// The user's entries cascade away with the account.
pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    debug!("Deleting user {}", id);

    let rows_affected = conn
        .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
        .map_err(DatabaseError::Sqlite)?;
    Ok(rows_affected > 0)
}
