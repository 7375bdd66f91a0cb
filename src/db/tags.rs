//! Tag CRUD operations and entry/tag associations.
//!
//! This module provides functions for creating, reading and deleting tags,
//! linking them to entries, and the tag-usage aggregation behind analytics.
//! Association rows are fully owned by the entry side; they only change
//! through entry upsert and tag reconciliation.

use crate::errors::{AppResult, DatabaseError};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Represents a tag in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub is_prebuilt: bool,
}

fn tag_from_row(row: &Row) -> rusqlite::Result<Tag> {
    let raw_id: String = row.get(0)?;
    Ok(Tag {
        id: Uuid::parse_str(&raw_id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        name: row.get(1)?,
        is_prebuilt: row.get(2)?,
    })
}

/// Lists all tags ordered by name.
pub fn list(conn: &Connection) -> AppResult<Vec<Tag>> {
    let mut stmt = conn
        .prepare("SELECT id, name, is_prebuilt FROM tags ORDER BY name ASC")
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt.query_map([], tag_from_row).map_err(DatabaseError::Sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Lists the prebuilt tags ordered by name.
pub fn list_prebuilt(conn: &Connection) -> AppResult<Vec<Tag>> {
    let mut stmt = conn
        .prepare("SELECT id, name, is_prebuilt FROM tags WHERE is_prebuilt = 1 ORDER BY name ASC")
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt.query_map([], tag_from_row).map_err(DatabaseError::Sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves a tag by id. Returns `Ok(None)` if it doesn't exist.
pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<Tag>> {
    conn.query_row(
        "SELECT id, name, is_prebuilt FROM tags WHERE id = ?1",
        params![id.to_string()],
        tag_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves a tag by exact name. Returns `Ok(None)` if it doesn't exist.
pub fn get_by_name(conn: &Connection, name: &str) -> AppResult<Option<Tag>> {
    conn.query_row(
        "SELECT id, name, is_prebuilt FROM tags WHERE name = ?1",
        params![name],
        tag_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Whether a tag with this exact name exists.
pub fn exists(conn: &Connection, name: &str) -> AppResult<bool> {
    let found: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM tags WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(found > 0)
}

/// Whether a tag with this name exists, compared case-insensitively.
///
/// Used when seeding the prebuilt set so user-created variants are kept.
pub fn exists_nocase(conn: &Connection, name: &str) -> AppResult<bool> {
    let found: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM tags WHERE name = ?1 COLLATE NOCASE",
            params![name],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(found > 0)
}

/// Inserts a new tag.
///
/// # Errors
///
/// Returns an error if the database operation fails (including the
/// name-uniqueness constraint).
pub fn insert(conn: &Connection, tag: &Tag) -> AppResult<()> {
    debug!("Inserting tag '{}'", tag.name);

    conn.execute(
        "INSERT INTO tags (id, name, is_prebuilt) VALUES (?1, ?2, ?3)",
        params![tag.id.to_string(), tag.name, tag.is_prebuilt],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Deletes a tag by id.
///
/// Returns whether a row was removed; association rows cascade.
pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    debug!("Deleting tag {}", id);

    let rows_affected = conn
        .execute("DELETE FROM tags WHERE id = ?1", params![id.to_string()])
        .map_err(DatabaseError::Sqlite)?;
    Ok(rows_affected > 0)
}

/// The tags attached to an entry, ordered by name.
pub fn tags_for_entry(conn: &Connection, entry_id: Uuid) -> AppResult<Vec<Tag>> {
    let mut stmt = conn
        .prepare(
            "SELECT t.id, t.name, t.is_prebuilt FROM entry_tags et \
             JOIN tags t ON t.id = et.tag_id \
             WHERE et.entry_id = ?1 ORDER BY t.name ASC",
        )
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![entry_id.to_string()], tag_from_row)
        .map_err(DatabaseError::Sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// The tag ids currently linked to an entry.
pub fn tag_ids_for_entry(conn: &Connection, entry_id: Uuid) -> AppResult<Vec<Uuid>> {
    let mut stmt = conn
        .prepare("SELECT tag_id FROM entry_tags WHERE entry_id = ?1")
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![entry_id.to_string()], |row| {
            let raw: String = row.get(0)?;
            Uuid::parse_str(&raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .map_err(DatabaseError::Sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Links a tag to an entry. Linking twice is a no-op.
pub fn link(conn: &Connection, entry_id: Uuid, tag_id: Uuid) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO entry_tags (entry_id, tag_id) VALUES (?1, ?2)",
        params![entry_id.to_string(), tag_id.to_string()],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Unlinks a tag from an entry. Unlinking an absent pair is a no-op.
pub fn unlink(conn: &Connection, entry_id: Uuid, tag_id: Uuid) -> AppResult<()> {
    conn.execute(
        "DELETE FROM entry_tags WHERE entry_id = ?1 AND tag_id = ?2",
        params![entry_id.to_string(), tag_id.to_string()],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Association counts per tag name within an optional date range,
/// top-N by count descending with the name as a deterministic tie-break.
pub fn usage_counts(
    conn: &Connection,
    user_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    top_n: usize,
) -> AppResult<Vec<(String, i64)>> {
    let mut values = vec![Value::Text(user_id.to_string())];
    let mut range = String::new();
    if let Some(from) = from {
        range.push_str(" AND e.entry_date >= ?");
        values.push(Value::Text(from.to_string()));
    }
    if let Some(to) = to {
        range.push_str(" AND e.entry_date <= ?");
        values.push(Value::Text(to.to_string()));
    }
    values.push(Value::Integer(top_n as i64));

    let sql = format!(
        "SELECT t.name, COUNT(*) AS uses FROM entry_tags et \
         JOIN tags t ON t.id = et.tag_id \
         JOIN entries e ON e.id = et.entry_id \
         WHERE e.user_id = ?{range} \
         GROUP BY t.name \
         ORDER BY uses DESC, t.name ASC \
         LIMIT ?"
    );

    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(DatabaseError::Sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}
