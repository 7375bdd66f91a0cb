//! Tag management and entry/tag reconciliation.
//!
//! Tag names are shared across users; association rows belong to entries.
//! `reconcile_entry_tags` is the only code path that mutates associations:
//! it computes the delta between an entry's current tags and a desired set
//! and applies the minimal link/unlink changes, idempotently.

use crate::constants::PREBUILT_TAG_NAMES;
use crate::db::tags::{self, Tag};
use crate::db::Database;
use crate::errors::{AppResult, OpError, OpResult};
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A desired tag reference: resolved by id, falling back to the name when
/// the id no longer exists (so a selection survives a tag rename or
/// delete-and-recreate).
#[derive(Debug, Clone)]
pub struct TagHandle {
    pub id: Uuid,
    pub name: String,
}

impl From<&Tag> for TagHandle {
    fn from(tag: &Tag) -> Self {
        TagHandle {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// Lists all tags ordered by name.
pub fn list_tags(db: &Database) -> OpResult<Vec<Tag>> {
    let conn = db.get_conn()?;
    Ok(tags::list(&conn)?)
}

/// Lists the prebuilt tags ordered by name.
pub fn prebuilt_tags(db: &Database) -> OpResult<Vec<Tag>> {
    let conn = db.get_conn()?;
    Ok(tags::list_prebuilt(&conn)?)
}

/// Creates a tag with the given name.
///
/// A blank name is a validation failure; an existing name is a conflict.
pub fn add_tag(db: &Database, name: &str, is_prebuilt: bool) -> OpResult<Tag> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpError::Validation("Tag name is required.".to_string()));
    }

    let conn = db.get_conn()?;
    if tags::exists(&conn, name)? {
        return Err(OpError::Conflict("Tag already exists.".to_string()));
    }

    let tag = Tag {
        id: Uuid::new_v4(),
        name: name.to_string(),
        is_prebuilt,
    };
    tags::insert(&conn, &tag)?;
    info!("Created tag '{}'", tag.name);
    Ok(tag)
}

/// Returns the tag with the given name, creating it when missing.
pub fn find_or_create_tag(db: &Database, name: &str) -> OpResult<Tag> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpError::Validation("Tag name is required.".to_string()));
    }

    let conn = db.get_conn()?;
    if let Some(existing) = tags::get_by_name(&conn, name)? {
        return Ok(existing);
    }

    let tag = Tag {
        id: Uuid::new_v4(),
        name: name.to_string(),
        is_prebuilt: false,
    };
    tags::insert(&conn, &tag)?;
    debug!("Created tag '{}' on demand", tag.name);
    Ok(tag)
}

/// Deletes a tag by id.
///
/// Missing ids are a not-found failure; prebuilt tags reject deletion.
pub fn delete_tag(db: &Database, id: Uuid) -> OpResult<()> {
    let conn = db.get_conn()?;

    let tag = tags::get(&conn, id)?.ok_or_else(|| OpError::NotFound("Tag not found.".to_string()))?;
    if tag.is_prebuilt {
        return Err(OpError::Validation(
            "Prebuilt tags cannot be deleted.".to_string(),
        ));
    }

    tags::delete(&conn, id)?;
    info!("Deleted tag '{}'", tag.name);
    Ok(())
}

/// Seeds the prebuilt tag set, skipping names that already exist under any
/// casing. Safe to call on every startup; returns the number created.
pub fn seed_prebuilt_tags(db: &Database) -> OpResult<usize> {
    let conn = db.get_conn()?;

    let mut created = 0;
    for name in PREBUILT_TAG_NAMES {
        if !tags::exists_nocase(&conn, name)? {
            let tag = Tag {
                id: Uuid::new_v4(),
                name: (*name).to_string(),
                is_prebuilt: true,
            };
            tags::insert(&conn, &tag)?;
            created += 1;
        }
    }

    if created > 0 {
        info!("Seeded {} prebuilt tags", created);
    }
    Ok(created)
}

/// Synchronizes an entry's tag associations with a desired set.
///
/// Computes the symmetric difference against the current associations:
/// current-but-not-desired tags are unlinked, desired-but-not-current tags
/// are linked. Handles are resolved by id first, then by name. Handles that
/// resolve to nothing are skipped. Reconciling twice with the same desired
/// set produces no further changes.
pub fn reconcile_entry_tags(
    conn: &Connection,
    entry_id: Uuid,
    desired: &[TagHandle],
) -> AppResult<()> {
    debug!("Reconciling {} desired tags for entry {}", desired.len(), entry_id);

    let mut resolved: Vec<Uuid> = Vec::new();
    for handle in desired {
        let tag_id = if tags::get(conn, handle.id)?.is_some() {
            Some(handle.id)
        } else {
            tags::get_by_name(conn, &handle.name)?.map(|tag| tag.id)
        };
        match tag_id {
            Some(id) if !resolved.contains(&id) => resolved.push(id),
            Some(_) => {}
            None => warn!("Skipping unresolvable tag '{}' for entry {}", handle.name, entry_id),
        }
    }

    let current: HashSet<Uuid> = tags::tag_ids_for_entry(conn, entry_id)?.into_iter().collect();
    let wanted: HashSet<Uuid> = resolved.iter().copied().collect();

    for tag_id in current.difference(&wanted) {
        tags::unlink(conn, entry_id, *tag_id)?;
    }
    for tag_id in wanted.difference(&current) {
        tags::link(conn, entry_id, *tag_id)?;
    }

    Ok(())
}
