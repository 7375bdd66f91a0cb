//! Entry upsert, lookup, deletion and calendar data.
//!
//! `upsert_entry` is the single write path enforcing the one-entry-per-day
//! invariant: the first write for a date creates the entry, every later
//! write for the same date updates it in place and reconciles its tags.

use crate::db::entries::{self, Entry, EntryDraft, EntryFilter};
use crate::db::Database;
use crate::errors::{OpError, OpResult};
use crate::mood::Mood;
use crate::ops::tags::{reconcile_entry_tags, TagHandle};
use crate::session::Session;
use crate::streaks;
use chrono::{Duration, Months, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Caller-supplied fields for an entry upsert.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// Target a specific entry instead of resolving by date.
    pub id: Option<Uuid>,
    pub entry_date: NaiveDate,
    pub title: String,
    pub body: String,
    pub is_markdown: bool,
    pub primary_mood: Mood,
    pub secondary_moods: Vec<Mood>,
    pub category_id: Option<Uuid>,
    /// Desired tag set after the write.
    pub tags: Vec<TagHandle>,
}

/// Dates with entries and missed days for one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub dates_with_entries: Vec<NaiveDate>,
    pub missed_days: Vec<NaiveDate>,
}

fn draft_from_input(input: &EntryInput) -> EntryDraft {
    EntryDraft {
        title: input.title.clone(),
        body: input.body.clone(),
        is_markdown: input.is_markdown,
        primary_mood: Some(input.primary_mood),
        secondary_moods: input.secondary_moods.clone(),
        category_id: input.category_id,
    }
}

fn fetch_required(conn: &rusqlite::Connection, id: Uuid) -> OpResult<Entry> {
    entries::get_by_id(conn, id)?
        .ok_or_else(|| OpError::Fatal(format!("entry {id} vanished during upsert")))
}

/// Creates or updates the session user's entry for a calendar date.
///
/// If an entry exists for `(user, date)` its mutable fields are updated in
/// place, `updated_at` is refreshed and the tag set is reconciled; otherwise
/// a new entry is created with the desired tags attached. An explicit id in
/// the input targets that entry directly when it belongs to the session user.
pub fn upsert_entry(db: &Database, session: &Session, input: &EntryInput) -> OpResult<Entry> {
    info!(
        "Upserting entry for user {} on {}",
        session.user_id, input.entry_date
    );
    let conn = db.get_conn()?;
    let draft = draft_from_input(input);

    if let Some(id) = input.id {
        if let Some(existing) = entries::get_by_id(&conn, id)? {
            if existing.user_id == session.user_id {
                entries::update(&conn, id, &draft)?;
                reconcile_entry_tags(&conn, id, &input.tags)?;
                return fetch_required(&conn, id);
            }
        }
        // Unknown or foreign id: fall through to date resolution, the same
        // way a fresh write for that date would behave.
    }

    match entries::get_by_date(&conn, session.user_id, input.entry_date)? {
        Some(existing) => {
            debug!("Entry exists for {}, updating in place", input.entry_date);
            entries::update(&conn, existing.id, &draft)?;
            reconcile_entry_tags(&conn, existing.id, &input.tags)?;
            fetch_required(&conn, existing.id)
        }
        None => {
            let id = Uuid::new_v4();
            entries::insert(&conn, id, session.user_id, input.entry_date, &draft)?;
            reconcile_entry_tags(&conn, id, &input.tags)?;
            fetch_required(&conn, id)
        }
    }
}

/// Retrieves an entry by id.
///
/// Entries of other users are reported as not found.
pub fn get_entry(db: &Database, session: &Session, id: Uuid) -> OpResult<Entry> {
    let conn = db.get_conn()?;
    match entries::get_by_id(&conn, id)? {
        Some(entry) if entry.user_id == session.user_id => Ok(entry),
        _ => Err(OpError::NotFound("Entry not found.".to_string())),
    }
}

/// Retrieves the session user's entry for a calendar date.
pub fn get_entry_by_date(db: &Database, session: &Session, date: NaiveDate) -> OpResult<Entry> {
    let conn = db.get_conn()?;
    entries::get_by_date(&conn, session.user_id, date)?
        .ok_or_else(|| OpError::NotFound("No entry found for this date.".to_string()))
}

/// Deletes an entry by id.
///
/// The entry is looked up first; a missing or foreign id is a not-found
/// failure (never a silent success at this layer).
pub fn delete_entry(db: &Database, session: &Session, id: Uuid) -> OpResult<()> {
    let conn = db.get_conn()?;
    match entries::get_by_id(&conn, id)? {
        Some(entry) if entry.user_id == session.user_id => {
            entries::delete(&conn, id)?;
            info!("Deleted entry {} ({})", id, entry.entry_date);
            Ok(())
        }
        _ => Err(OpError::NotFound("Entry not found.".to_string())),
    }
}

/// Whether the session user has an entry on the given date.
pub fn has_entry_for_date(db: &Database, session: &Session, date: NaiveDate) -> OpResult<bool> {
    let conn = db.get_conn()?;
    Ok(entries::has_entry_for_date(&conn, session.user_id, date)?)
}

/// Lists the session user's entries matching a filter without pagination
/// concerns; thin wrapper used by callers that page themselves.
pub fn list_entries(
    db: &Database,
    session: &Session,
    filter: &EntryFilter,
    skip: u32,
    take: u32,
) -> OpResult<Vec<Entry>> {
    let conn = db.get_conn()?;
    Ok(entries::list(&conn, session.user_id, filter, skip, take)?)
}

/// Calendar data for one month: which days have entries, which are missed.
///
/// Missed days run from the first of the month through `today` when the
/// month is still in progress, or through the end of the month otherwise.
pub fn calendar_month(
    db: &Database,
    session: &Session,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> OpResult<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| OpError::Validation(format!("Invalid month: {year}-{month:02}")))?;
    let last = first
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .ok_or_else(|| OpError::Validation(format!("Invalid month: {year}-{month:02}")))?;

    let conn = db.get_conn()?;
    let dates_with_entries = entries::entry_dates_in_range(&conn, session.user_id, first, last)?;

    let all_dates = entries::entry_dates(&conn, session.user_id)?;
    let end = last.min(today);
    let missed_days = streaks::missed_days(&all_dates, first, end);

    Ok(CalendarMonth {
        year,
        month,
        dates_with_entries,
        missed_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users;
    use crate::ops::tags::{add_tag, find_or_create_tag};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Database, Session) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db")).unwrap();
        db.initialize_schema().unwrap();

        let conn = db.get_conn().unwrap();
        let user_id = Uuid::new_v4();
        users::insert(&conn, user_id, "tester", "hash").unwrap();
        (temp_dir, db, Session::new(user_id, "tester"))
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input(date: NaiveDate, title: &str, body: &str) -> EntryInput {
        EntryInput {
            id: None,
            entry_date: date,
            title: title.to_string(),
            body: body.to_string(),
            is_markdown: true,
            primary_mood: Mood::Happy,
            secondary_moods: Vec::new(),
            category_id: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_upsert_creates_then_updates_same_entry() {
        let (_guard, db, session) = setup();
        let date = d(2024, 6, 1);

        let created = upsert_entry(&db, &session, &input(date, "First", "hello")).unwrap();

        let mut second = input(date, "Revised", "hello again");
        second.primary_mood = Mood::Calm;
        let updated = upsert_entry(&db, &session, &second).unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.title, "Revised");
        assert_eq!(updated.primary_mood, Mood::Calm);

        // Still exactly one entry for that date
        let conn = db.get_conn().unwrap();
        assert_eq!(entries::count(&conn, session.user_id, &EntryFilter::default()).unwrap(), 1);
    }

    #[test]
    fn test_upsert_idempotent_tag_set() {
        let (_guard, db, session) = setup();
        let a = find_or_create_tag(&db, "A").unwrap();
        let b = find_or_create_tag(&db, "B").unwrap();

        let mut first = input(d(2024, 6, 1), "t", "b");
        first.tags = vec![(&a).into(), (&b).into()];
        let entry = upsert_entry(&db, &session, &first).unwrap();
        assert_eq!(entry.tags.len(), 2);

        // Second identical write: no duplicated associations
        let entry = upsert_entry(&db, &session, &first).unwrap();
        assert_eq!(entry.tags.len(), 2);
    }

    #[test]
    fn test_upsert_with_explicit_id_moves_fields() {
        let (_guard, db, session) = setup();
        let created = upsert_entry(&db, &session, &input(d(2024, 6, 1), "First", "x")).unwrap();

        let mut targeted = input(d(2024, 6, 1), "Edited", "y");
        targeted.id = Some(created.id);
        let updated = upsert_entry(&db, &session, &targeted).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Edited");
    }

    #[test]
    fn test_get_entry_foreign_user_is_not_found() {
        let (_guard, db, session) = setup();
        let entry = upsert_entry(&db, &session, &input(d(2024, 6, 1), "mine", "x")).unwrap();

        let conn = db.get_conn().unwrap();
        let other_id = Uuid::new_v4();
        users::insert(&conn, other_id, "other", "hash").unwrap();
        drop(conn);
        let other = Session::new(other_id, "other");

        let result = get_entry(&db, &other, entry.id);
        assert_eq!(result.unwrap_err(), OpError::NotFound("Entry not found.".to_string()));
    }

    #[test]
    fn test_get_entry_by_date_not_found() {
        let (_guard, db, session) = setup();
        let result = get_entry_by_date(&db, &session, d(2024, 6, 1));
        assert!(matches!(result, Err(OpError::NotFound(_))));
    }

    #[test]
    fn test_delete_entry_requires_existence() {
        let (_guard, db, session) = setup();
        let entry = upsert_entry(&db, &session, &input(d(2024, 6, 1), "t", "b")).unwrap();

        delete_entry(&db, &session, entry.id).unwrap();
        let again = delete_entry(&db, &session, entry.id);
        assert_eq!(again.unwrap_err(), OpError::NotFound("Entry not found.".to_string()));
    }

    #[test]
    fn test_has_entry_for_date() {
        let (_guard, db, session) = setup();
        upsert_entry(&db, &session, &input(d(2024, 6, 1), "t", "b")).unwrap();

        assert!(has_entry_for_date(&db, &session, d(2024, 6, 1)).unwrap());
        assert!(!has_entry_for_date(&db, &session, d(2024, 6, 2)).unwrap());
    }

    #[test]
    fn test_calendar_month_clamps_missed_days_to_today() {
        let (_guard, db, session) = setup();
        upsert_entry(&db, &session, &input(d(2024, 6, 2), "t", "b")).unwrap();
        upsert_entry(&db, &session, &input(d(2024, 6, 4), "t", "b")).unwrap();

        let calendar = calendar_month(&db, &session, 2024, 6, d(2024, 6, 5)).unwrap();
        assert_eq!(calendar.dates_with_entries, vec![d(2024, 6, 2), d(2024, 6, 4)]);
        assert_eq!(
            calendar.missed_days,
            vec![d(2024, 6, 1), d(2024, 6, 3), d(2024, 6, 5)]
        );
    }

    #[test]
    fn test_calendar_month_past_month_covers_whole_month() {
        let (_guard, db, session) = setup();
        let calendar = calendar_month(&db, &session, 2024, 4, d(2024, 6, 5)).unwrap();
        assert_eq!(calendar.missed_days.len(), 30);
    }

    #[test]
    fn test_calendar_month_invalid_month() {
        let (_guard, db, session) = setup();
        let result = calendar_month(&db, &session, 2024, 13, d(2024, 6, 5));
        assert!(matches!(result, Err(OpError::Validation(_))));
    }

    #[test]
    fn test_upsert_reassigns_category_and_secondary_moods() {
        let (_guard, db, session) = setup();
        let _ = add_tag(&db, "unused", false);

        let conn = db.get_conn().unwrap();
        let category_id = Uuid::new_v4();
        crate::db::categories::insert(
            &conn,
            &crate::db::categories::Category {
                id: category_id,
                name: "Life".to_string(),
            },
        )
        .unwrap();
        drop(conn);

        let mut first = input(d(2024, 6, 1), "t", "b");
        first.category_id = Some(category_id);
        first.secondary_moods = vec![Mood::Curious, Mood::Calm];
        let entry = upsert_entry(&db, &session, &first).unwrap();
        assert_eq!(entry.category_name.as_deref(), Some("Life"));
        assert_eq!(entry.secondary_moods, vec![Mood::Calm, Mood::Curious]);

        let mut second = input(d(2024, 6, 1), "t", "b");
        second.secondary_moods = Vec::new();
        let entry = upsert_entry(&db, &session, &second).unwrap();
        assert!(entry.category_id.is_none());
        assert!(entry.secondary_moods.is_empty());
    }
}
