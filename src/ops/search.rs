//! Multi-predicate search over journal entries.
//!
//! Composes the text, date-range, mood, tag and category predicates into one
//! filtered, ordered, paginated result. Predicate groups AND together;
//! values within a group OR together; absent or empty groups are no-ops.

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::db::entries::{self, Entry, EntryFilter};
use crate::db::Database;
use crate::errors::{OpError, OpResult};
use crate::mood::Mood;
use crate::session::Session;
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

/// Parameters for an entry search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Case-insensitive substring matched against title OR body.
    pub text: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub moods: Vec<Mood>,
    pub tag_ids: Vec<Uuid>,
    pub category_id: Option<Uuid>,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            text: None,
            from: None,
            to: None,
            moods: Vec::new(),
            tag_ids: Vec::new(),
            category_id: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of search results plus the pre-pagination total.
#[derive(Debug)]
pub struct SearchPage {
    pub entries: Vec<Entry>,
    pub total_count: i64,
    pub page: u32,
    pub page_size: u32,
}

impl SearchPage {
    /// Number of pages the filtered set spans.
    pub fn total_pages(&self) -> u32 {
        if self.total_count == 0 {
            0
        } else {
            ((self.total_count as u64).div_ceil(self.page_size as u64)) as u32
        }
    }
}

/// Searches the session user's entries.
///
/// Results are ordered by entry date descending (id as a stable tie-break)
/// and paginated with `skip = (page - 1) * page_size`. `total_count` always
/// reflects the filtered set before pagination.
///
/// # Errors
///
/// Returns a validation failure for `page < 1` or `page_size < 1`, and a
/// fatal failure if the store misbehaves.
pub fn search_entries(
    db: &Database,
    session: &Session,
    request: &SearchRequest,
) -> OpResult<SearchPage> {
    info!(
        "Searching entries for user {} (page {})",
        session.user_id, request.page
    );

    if request.page < 1 {
        return Err(OpError::Validation("Page must be at least 1.".to_string()));
    }
    if request.page_size < 1 {
        return Err(OpError::Validation("Page size must be positive.".to_string()));
    }

    let filter = EntryFilter {
        text: request.text.clone(),
        from: request.from,
        to: request.to,
        moods: request.moods.clone(),
        tag_ids: request.tag_ids.clone(),
        category_id: request.category_id,
    };
    let skip = (request.page - 1) * request.page_size;

    let conn = db.get_conn()?;
    let page_entries = entries::list(&conn, session.user_id, &filter, skip, request.page_size)?;
    let total_count = entries::count(&conn, session.user_id, &filter)?;

    debug!(
        "Search matched {} entries ({} on this page)",
        total_count,
        page_entries.len()
    );
    Ok(SearchPage {
        entries: page_entries,
        total_count,
        page: request.page,
        page_size: request.page_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users;
    use crate::ops::entries::{upsert_entry, EntryInput};
    use crate::ops::tags::find_or_create_tag;
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

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn write(db: &Database, session: &Session, day: u32, title: &str, body: &str, mood: Mood) {
        let input = EntryInput {
            id: None,
            entry_date: d(day),
            title: title.to_string(),
            body: body.to_string(),
            is_markdown: true,
            primary_mood: mood,
            secondary_moods: Vec::new(),
            category_id: None,
            tags: Vec::new(),
        };
        upsert_entry(db, session, &input).unwrap();
    }

    #[test]
    fn test_invalid_pagination_rejected() {
        let (_guard, db, session) = setup();

        let bad_page = SearchRequest {
            page: 0,
            ..Default::default()
        };
        assert!(matches!(
            search_entries(&db, &session, &bad_page),
            Err(OpError::Validation(_))
        ));

        let bad_size = SearchRequest {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            search_entries(&db, &session, &bad_size),
            Err(OpError::Validation(_))
        ));
    }

    #[test]
    fn test_most_recent_first_and_page_bounds() {
        let (_guard, db, session) = setup();
        for day in 1..=5 {
            write(&db, &session, day, "t", "b", Mood::Happy);
        }

        let request = SearchRequest {
            page_size: 2,
            ..Default::default()
        };
        let page1 = search_entries(&db, &session, &request).unwrap();
        assert_eq!(page1.total_count, 5);
        assert_eq!(page1.total_pages(), 3);
        assert_eq!(page1.entries.len(), 2);
        assert_eq!(page1.entries[0].entry_date, d(5));

        let last = search_entries(
            &db,
            &session,
            &SearchRequest {
                page: 3,
                page_size: 2,
                ..Default::default()
            },
        )
        .unwrap();
        // 5 mod 2 entries on the final page
        assert_eq!(last.entries.len(), 1);
        assert_eq!(last.entries[0].entry_date, d(1));
    }

    #[test]
    fn test_empty_mood_set_equals_no_mood_filter() {
        let (_guard, db, session) = setup();
        write(&db, &session, 1, "t", "b", Mood::Happy);
        write(&db, &session, 2, "t", "b", Mood::Sad);

        let unfiltered = search_entries(&db, &session, &SearchRequest::default()).unwrap();
        let empty_moods = search_entries(
            &db,
            &session,
            &SearchRequest {
                moods: Vec::new(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(unfiltered.total_count, empty_moods.total_count);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let (_guard, db, session) = setup();
        write(&db, &session, 1, "run", "morning park", Mood::Happy);
        write(&db, &session, 2, "run", "evening track", Mood::Sad);
        write(&db, &session, 3, "rest", "slow day", Mood::Happy);

        let request = SearchRequest {
            text: Some("run".to_string()),
            moods: vec![Mood::Happy],
            ..Default::default()
        };
        let page = search_entries(&db, &session, &request).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.entries[0].entry_date, d(1));
    }

    #[test]
    fn test_tag_filter_or_semantics() {
        let (_guard, db, session) = setup();
        let gym = find_or_create_tag(&db, "Gym").unwrap();
        let park = find_or_create_tag(&db, "Park").unwrap();

        let mut first = EntryInput {
            id: None,
            entry_date: d(1),
            title: String::new(),
            body: String::new(),
            is_markdown: true,
            primary_mood: Mood::Happy,
            secondary_moods: Vec::new(),
            category_id: None,
            tags: vec![(&gym).into()],
        };
        upsert_entry(&db, &session, &first).unwrap();
        first.entry_date = d(2);
        first.tags = vec![(&park).into()];
        upsert_entry(&db, &session, &first).unwrap();
        first.entry_date = d(3);
        first.tags = Vec::new();
        upsert_entry(&db, &session, &first).unwrap();

        let request = SearchRequest {
            tag_ids: vec![gym.id, park.id],
            ..Default::default()
        };
        let page = search_entries(&db, &session, &request).unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_total_pages_empty_result() {
        let (_guard, db, session) = setup();
        let page = search_entries(&db, &session, &SearchRequest::default()).unwrap();
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.entries.is_empty());
    }
}
