//! Category management.
//!
//! Categories are a flat, optional grouping for entries. Deleting one leaves
//! its entries in place with the reference cleared.

use crate::db::categories::{self, Category};
use crate::db::Database;
use crate::errors::{OpError, OpResult};
use tracing::info;
use uuid::Uuid;

/// Lists all categories ordered by name.
pub fn list_categories(db: &Database) -> OpResult<Vec<Category>> {
    let conn = db.get_conn()?;
    Ok(categories::list(&conn)?)
}

/// Creates a category. A blank name is a validation failure.
pub fn add_category(db: &Database, name: &str) -> OpResult<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpError::Validation("Category name is required.".to_string()));
    }

    let conn = db.get_conn()?;
    let category = Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
    };
    categories::insert(&conn, &category)?;
    info!("Created category '{}'", category.name);
    Ok(category)
}

/// Renames a category. A missing id is a not-found failure.
pub fn update_category(db: &Database, id: Uuid, name: &str) -> OpResult<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpError::Validation("Category name is required.".to_string()));
    }

    let conn = db.get_conn()?;
    if categories::get(&conn, id)?.is_none() {
        return Err(OpError::NotFound("Category not found.".to_string()));
    }

    categories::update(&conn, id, name)?;
    Ok(Category {
        id,
        name: name.to_string(),
    })
}

/// Deletes a category. A missing id is a not-found failure.
pub fn delete_category(db: &Database, id: Uuid) -> OpResult<()> {
    let conn = db.get_conn()?;
    if categories::get(&conn, id)?.is_none() {
        return Err(OpError::NotFound("Category not found.".to_string()));
    }

    categories::delete(&conn, id)?;
    info!("Deleted category {}", id);
    Ok(())
}
