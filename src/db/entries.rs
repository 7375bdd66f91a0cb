//! Entry CRUD operations and filtered listing.
//!
//! This module provides functions for creating, reading, updating and
//! querying journal entries, including the composable predicate filter the
//! search operation is built on and the grouped queries behind analytics.

use crate::db::tags::{self, Tag};
use crate::errors::{AppResult, DatabaseError};
use crate::mood::Mood;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Counts whitespace-delimited non-empty tokens.
///
/// Word counts are derived on read and never stored.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Represents a journal entry with its tags and secondary moods hydrated.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub title: String,
    pub body: String,
    pub is_markdown: bool,
    pub primary_mood: Mood,
    pub secondary_moods: Vec<Mood>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub tags: Vec<Tag>,
    pub created_at: String,
    pub updated_at: String,
}

impl Entry {
    /// Derived word count of the body.
    pub fn word_count(&self) -> usize {
        word_count(&self.body)
    }
}

/// Mutable fields written by insert and update.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub body: String,
    pub is_markdown: bool,
    pub primary_mood: Option<Mood>,
    pub secondary_moods: Vec<Mood>,
    pub category_id: Option<Uuid>,
}

/// Composable predicates for entry listing and counting.
///
/// Every field is optional; an absent or empty field is a no-op, never an
/// empty-result filter. Predicate groups combine with AND, values within a
/// group with OR.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring matched against title OR body.
    pub text: Option<String>,
    /// Inclusive lower bound on the entry date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the entry date.
    pub to: Option<NaiveDate>,
    /// Primary moods to match (OR semantics).
    pub moods: Vec<Mood>,
    /// Tag ids to match; an entry matches if it carries at least one.
    pub tag_ids: Vec<Uuid>,
    /// Exact category match.
    pub category_id: Option<Uuid>,
}

fn parse_uuid(idx: usize, raw: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_mood(idx: usize, raw: &str) -> rusqlite::Result<Mood> {
    Mood::from_str(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown mood '{raw}'").into(),
        )
    })
}

const ENTRY_COLUMNS: &str = "e.id, e.user_id, e.entry_date, e.title, e.body, e.is_markdown, \
     e.primary_mood, e.category_id, c.name, e.created_at, e.updated_at";

fn entry_from_row(row: &Row) -> rusqlite::Result<Entry> {
    let category_id: Option<String> = row.get(7)?;
    Ok(Entry {
        id: parse_uuid(0, &row.get::<_, String>(0)?)?,
        user_id: parse_uuid(1, &row.get::<_, String>(1)?)?,
        entry_date: parse_date(2, &row.get::<_, String>(2)?)?,
        title: row.get(3)?,
        body: row.get(4)?,
        is_markdown: row.get(5)?,
        primary_mood: parse_mood(6, &row.get::<_, String>(6)?)?,
        category_id: category_id.as_deref().map(|s| parse_uuid(7, s)).transpose()?,
        category_name: row.get(8)?,
        secondary_moods: Vec::new(),
        tags: Vec::new(),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn hydrate(conn: &Connection, entry: &mut Entry) -> AppResult<()> {
    entry.secondary_moods = secondary_moods_for_entry(conn, entry.id)?;
    entry.tags = tags::tags_for_entry(conn, entry.id)?;
    Ok(())
}

/// Inserts a new entry with the given id for `(user, date)`.
///
/// Both timestamps are set to now. Secondary moods are written alongside;
/// tag associations are owned by the reconciler.
///
/// # Errors
///
/// Returns an error if the database operation fails (including a violated
/// one-entry-per-day unique index when the upsert path was bypassed).
pub fn insert(
    conn: &Connection,
    id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    draft: &EntryDraft,
) -> AppResult<()> {
    debug!("Inserting entry {} for user {} on {}", id, user_id, date);

    let primary = draft
        .primary_mood
        .ok_or_else(|| DatabaseError::Custom("entry requires a primary mood".to_string()))?;

    conn.execute(
        r#"
        INSERT INTO entries (id, user_id, entry_date, title, body, is_markdown, primary_mood, category_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            id.to_string(),
            user_id.to_string(),
            date.to_string(),
            draft.title,
            draft.body,
            draft.is_markdown,
            primary.as_str(),
            draft.category_id.map(|c| c.to_string()),
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    replace_secondary_moods(conn, id, &draft.secondary_moods)?;
    Ok(())
}

/// Updates the mutable fields of an existing entry and refreshes `updated_at`.
///
/// # Errors
///
/// Returns an error if the entry doesn't exist or the database operation fails.
pub fn update(conn: &Connection, id: Uuid, draft: &EntryDraft) -> AppResult<()> {
    debug!("Updating entry {}", id);

    let primary = draft
        .primary_mood
        .ok_or_else(|| DatabaseError::Custom("entry requires a primary mood".to_string()))?;

    let rows_affected = conn
        .execute(
            r#"
            UPDATE entries
            SET title = ?1, body = ?2, is_markdown = ?3, primary_mood = ?4, category_id = ?5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?6
            "#,
            params![
                draft.title,
                draft.body,
                draft.is_markdown,
                primary.as_str(),
                draft.category_id.map(|c| c.to_string()),
                id.to_string(),
            ],
        )
        .map_err(DatabaseError::Sqlite)?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("Entry with id {} not found", id)).into());
    }

    replace_secondary_moods(conn, id, &draft.secondary_moods)?;
    Ok(())
}

/// Deletes an entry by id.
///
/// Returns whether a row was removed; a missing id is a silent no-op at this
/// layer (the ops layer looks the entry up first and reports not-found).
pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    debug!("Deleting entry {}", id);

    let rows_affected = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])
        .map_err(DatabaseError::Sqlite)?;
    Ok(rows_affected > 0)
}

/// Retrieves an entry by id, with tags and secondary moods hydrated.
///
/// Returns `Ok(None)` if no entry exists with the given id.
pub fn get_by_id(conn: &Connection, id: Uuid) -> AppResult<Option<Entry>> {
    debug!("Getting entry {}", id);

    let result = conn
        .query_row(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM entries e \
                 LEFT JOIN categories c ON c.id = e.category_id WHERE e.id = ?1"
            ),
            params![id.to_string()],
            entry_from_row,
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    match result {
        Some(mut entry) => {
            hydrate(conn, &mut entry)?;
            Ok(Some(entry))
        }
        None => Ok(None),
    }
}

/// Retrieves a user's entry for a calendar date.
///
/// Returns `Ok(None)` if no entry exists for the given date.
pub fn get_by_date(conn: &Connection, user_id: Uuid, date: NaiveDate) -> AppResult<Option<Entry>> {
    debug!("Getting entry for user {} on {}", user_id, date);

    let result = conn
        .query_row(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM entries e \
                 LEFT JOIN categories c ON c.id = e.category_id \
                 WHERE e.user_id = ?1 AND e.entry_date = ?2"
            ),
            params![user_id.to_string(), date.to_string()],
            entry_from_row,
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    match result {
        Some(mut entry) => {
            hydrate(conn, &mut entry)?;
            Ok(Some(entry))
        }
        None => Ok(None),
    }
}

fn build_filter_clause(user_id: Uuid, filter: &EntryFilter) -> (String, Vec<Value>) {
    let mut clauses = vec!["e.user_id = ?".to_string()];
    let mut values = vec![Value::Text(user_id.to_string())];

    if let Some(text) = filter.text.as_deref() {
        if !text.trim().is_empty() {
            let needle = text.to_lowercase();
            clauses.push("(instr(lower(e.title), ?) > 0 OR instr(lower(e.body), ?) > 0)".to_string());
            values.push(Value::Text(needle.clone()));
            values.push(Value::Text(needle));
        }
    }
    if let Some(from) = filter.from {
        clauses.push("e.entry_date >= ?".to_string());
        values.push(Value::Text(from.to_string()));
    }
    if let Some(to) = filter.to {
        clauses.push("e.entry_date <= ?".to_string());
        values.push(Value::Text(to.to_string()));
    }
    if !filter.moods.is_empty() {
        let placeholders = vec!["?"; filter.moods.len()].join(", ");
        clauses.push(format!("e.primary_mood IN ({placeholders})"));
        for mood in &filter.moods {
            values.push(Value::Text(mood.as_str().to_string()));
        }
    }
    if !filter.tag_ids.is_empty() {
        let placeholders = vec!["?"; filter.tag_ids.len()].join(", ");
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM entry_tags et WHERE et.entry_id = e.id AND et.tag_id IN ({placeholders}))"
        ));
        for tag_id in &filter.tag_ids {
            values.push(Value::Text(tag_id.to_string()));
        }
    }
    if let Some(category_id) = filter.category_id {
        clauses.push("e.category_id = ?".to_string());
        values.push(Value::Text(category_id.to_string()));
    }

    (clauses.join(" AND "), values)
}

/// Lists a user's entries matching the filter, most recent date first.
///
/// Ordering is `entry_date` descending with the id as a stable tie-break.
/// `skip`/`take` implement pagination; the page never exceeds `take` rows.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list(
    conn: &Connection,
    user_id: Uuid,
    filter: &EntryFilter,
    skip: u32,
    take: u32,
) -> AppResult<Vec<Entry>> {
    debug!(
        "Listing entries for user {} (skip {}, take {})",
        user_id, skip, take
    );

    let (where_clause, mut values) = build_filter_clause(user_id, filter);
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries e \
         LEFT JOIN categories c ON c.id = e.category_id \
         WHERE {where_clause} \
         ORDER BY e.entry_date DESC, e.id ASC \
         LIMIT ? OFFSET ?"
    );
    values.push(Value::Integer(take as i64));
    values.push(Value::Integer(skip as i64));

    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), entry_from_row)
        .map_err(DatabaseError::Sqlite)?;

    let mut entries = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    for entry in &mut entries {
        hydrate(conn, entry)?;
    }

    debug!("Found {} entries", entries.len());
    Ok(entries)
}

/// Counts a user's entries matching the filter, before pagination.
pub fn count(conn: &Connection, user_id: Uuid, filter: &EntryFilter) -> AppResult<i64> {
    let (where_clause, values) = build_filter_clause(user_id, filter);
    let sql = format!("SELECT COUNT(*) FROM entries e WHERE {where_clause}");

    let total = conn
        .query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;
    Ok(total)
}

/// Whether the user has an entry on the given date.
pub fn has_entry_for_date(conn: &Connection, user_id: Uuid, date: NaiveDate) -> AppResult<bool> {
    let present: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM entries WHERE user_id = ?1 AND entry_date = ?2",
            params![user_id.to_string(), date.to_string()],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(present > 0)
}

/// Total number of entries for the user.
pub fn total_count(conn: &Connection, user_id: Uuid) -> AppResult<i64> {
    let total = conn
        .query_row(
            "SELECT COUNT(*) FROM entries WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(total)
}

/// The distinct set of dates the user has entries for, ascending.
pub fn entry_dates(conn: &Connection, user_id: Uuid) -> AppResult<Vec<NaiveDate>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT entry_date FROM entries WHERE user_id = ?1 ORDER BY entry_date ASC",
        )
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![user_id.to_string()], |row| {
            parse_date(0, &row.get::<_, String>(0)?)
        })
        .map_err(DatabaseError::Sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// The dates with entries inside one calendar month, ascending.
pub fn entry_dates_in_range(
    conn: &Connection,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<NaiveDate>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT entry_date FROM entries \
             WHERE user_id = ?1 AND entry_date >= ?2 AND entry_date <= ?3 \
             ORDER BY entry_date ASC",
        )
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(
            params![user_id.to_string(), from.to_string(), to.to_string()],
            |row| parse_date(0, &row.get::<_, String>(0)?),
        )
        .map_err(DatabaseError::Sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

fn build_range_clause(from: Option<NaiveDate>, to: Option<NaiveDate>, values: &mut Vec<Value>) -> String {
    let mut clause = String::new();
    if let Some(from) = from {
        clause.push_str(" AND e.entry_date >= ?");
        values.push(Value::Text(from.to_string()));
    }
    if let Some(to) = to {
        clause.push_str(" AND e.entry_date <= ?");
        values.push(Value::Text(to.to_string()));
    }
    clause
}

/// Entry counts grouped by primary mood, within an optional date range.
pub fn mood_counts(
    conn: &Connection,
    user_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AppResult<Vec<(Mood, i64)>> {
    let mut values = vec![Value::Text(user_id.to_string())];
    let range = build_range_clause(from, to, &mut values);
    let sql = format!(
        "SELECT e.primary_mood, COUNT(*) FROM entries e WHERE e.user_id = ?{range} \
         GROUP BY e.primary_mood"
    );

    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok((parse_mood(0, &row.get::<_, String>(0)?)?, row.get::<_, i64>(1)?))
        })
        .map_err(DatabaseError::Sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Per-day word counts for days that have an entry, within an inclusive range.
///
/// Word counts are computed from the body on read; days without entries are
/// absent from the result.
pub fn word_counts_by_date(
    conn: &Connection,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<(NaiveDate, i64)>> {
    let mut stmt = conn
        .prepare(
            "SELECT entry_date, body FROM entries \
             WHERE user_id = ?1 AND entry_date >= ?2 AND entry_date <= ?3 \
             ORDER BY entry_date ASC",
        )
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(
            params![user_id.to_string(), from.to_string(), to.to_string()],
            |row| {
                Ok((
                    parse_date(0, &row.get::<_, String>(0)?)?,
                    row.get::<_, String>(1)?,
                ))
            },
        )
        .map_err(DatabaseError::Sqlite)?;

    let raw = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(raw
        .into_iter()
        .map(|(date, body)| (date, word_count(&body) as i64))
        .collect())
}

fn secondary_moods_for_entry(conn: &Connection, entry_id: Uuid) -> AppResult<Vec<Mood>> {
    let mut stmt = conn
        .prepare("SELECT mood FROM entry_moods WHERE entry_id = ?1 ORDER BY mood ASC")
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![entry_id.to_string()], |row| {
            parse_mood(0, &row.get::<_, String>(0)?)
        })
        .map_err(DatabaseError::Sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

fn replace_secondary_moods(conn: &Connection, entry_id: Uuid, moods: &[Mood]) -> AppResult<()> {
    conn.execute(
        "DELETE FROM entry_moods WHERE entry_id = ?1",
        params![entry_id.to_string()],
    )
    .map_err(DatabaseError::Sqlite)?;

    for mood in moods {
        conn.execute(
            "INSERT OR IGNORE INTO entry_moods (entry_id, mood) VALUES (?1, ?2)",
            params![entry_id.to_string(), mood.as_str()],
        )
        .map_err(DatabaseError::Sqlite)?;
    }
    Ok(())
}
