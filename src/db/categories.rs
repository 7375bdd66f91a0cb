//! Category CRUD operations.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Represents an entry category in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    let raw_id: String = row.get(0)?;
    Ok(Category {
        id: Uuid::parse_str(&raw_id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        name: row.get(1)?,
    })
}

/// Lists all categories ordered by name.
pub fn list(conn: &Connection) -> AppResult<Vec<Category>> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM categories ORDER BY name ASC")
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map([], category_from_row)
        .map_err(DatabaseError::Sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves a category by id. Returns `Ok(None)` if it doesn't exist.
pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<Category>> {
    conn.query_row(
        "SELECT id, name FROM categories WHERE id = ?1",
        params![id.to_string()],
        category_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Inserts a new category.
pub fn insert(conn: &Connection, category: &Category) -> AppResult<()> {
    debug!("Inserting category '{}'", category.name);

    conn.execute(
        "INSERT INTO categories (id, name) VALUES (?1, ?2)",
        params![category.id.to_string(), category.name],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Renames a category. Returns whether a row was changed.
pub fn update(conn: &Connection, id: Uuid, name: &str) -> AppResult<bool> {
    debug!("Renaming category {} to '{}'", id, name);

    let rows_affected = conn
        .execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id.to_string()],
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(rows_affected > 0)
}

/// Deletes a category by id. Returns whether a row was removed.
///
/// Entries referencing the category keep existing with a null reference.
pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    debug!("Deleting category {}", id);

    let rows_affected = conn
        .execute(
            "DELETE FROM categories WHERE id = ?1",
            params![id.to_string()],
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(rows_affected > 0)
}
