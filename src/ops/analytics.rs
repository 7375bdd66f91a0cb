//! Grouped aggregations over journal entries.
//!
//! Three independent sub-aggregations, all user-scoped and bounded by an
//! optional inclusive date range: mood distribution (with the band roll-up),
//! tag usage (top-N) and the per-day word-count trend. Every call performs a
//! fresh scan of the relevant range; nothing is cached or incremental.

use crate::constants::DEFAULT_TOP_TAGS;
use crate::db::{entries, tags, Database};
use crate::errors::{OpError, OpResult};
use crate::mood::{Mood, MoodCategory};
use crate::session::Session;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::info;

/// Per-mood entry counts with the per-band roll-up.
#[derive(Debug, Clone, Serialize)]
pub struct MoodDistribution {
    pub mood_counts: BTreeMap<Mood, i64>,
    /// Always carries all three bands, zero-valued when empty.
    pub category_counts: BTreeMap<MoodCategory, i64>,
    /// Highest count wins; ties break alphabetically by mood name.
    pub most_frequent_mood: Option<Mood>,
}

/// Tag usage counts, top-N by count descending.
#[derive(Debug, Clone, Serialize)]
pub struct TagUsage {
    pub tag_counts: Vec<TagCount>,
}

/// Association count for one tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: i64,
}

/// Per-day word counts with range totals.
#[derive(Debug, Clone, Serialize)]
pub struct WordCountTrend {
    /// Days without an entry are absent, never present with zero.
    pub daily_word_counts: BTreeMap<NaiveDate, i64>,
    pub total_words: i64,
    pub average_words_per_day: f64,
}

/// Counts entries per primary mood and rolls the counts up into the three
/// mood bands.
///
/// With no entries in range every count is zero and there is no most
/// frequent mood.
pub fn mood_distribution(
    db: &Database,
    session: &Session,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> OpResult<MoodDistribution> {
    info!("Computing mood distribution for user {}", session.user_id);

    let conn = db.get_conn()?;
    let counts = entries::mood_counts(&conn, session.user_id, from, to)?;

    let mut category_counts: BTreeMap<MoodCategory, i64> =
        MoodCategory::ALL.iter().map(|c| (*c, 0)).collect();
    for (mood, count) in &counts {
        *category_counts.entry(mood.category()).or_insert(0) += count;
    }

    let most_frequent_mood = counts
        .iter()
        .min_by_key(|(mood, count)| (Reverse(*count), mood.as_str()))
        .map(|(mood, _)| *mood);

    Ok(MoodDistribution {
        mood_counts: counts.into_iter().collect(),
        category_counts,
        most_frequent_mood,
    })
}

/// Counts (entry, tag) associations per tag name within the range,
/// restricted to the top `top_n` by count (name breaks ties).
pub fn tag_usage(
    db: &Database,
    session: &Session,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    top_n: Option<usize>,
) -> OpResult<TagUsage> {
    let top_n = top_n.unwrap_or(DEFAULT_TOP_TAGS);
    if top_n == 0 {
        return Err(OpError::Validation("Top-N must be positive.".to_string()));
    }
    info!("Computing top {} tag usage for user {}", top_n, session.user_id);

    let conn = db.get_conn()?;
    let counts = tags::usage_counts(&conn, session.user_id, from, to, top_n)?;

    Ok(TagUsage {
        tag_counts: counts
            .into_iter()
            .map(|(name, count)| TagCount { name, count })
            .collect(),
    })
}

/// Per-day word counts for `[from, to]`, plus the range total and the
/// average over days that have an entry.
///
/// With zero such days the average falls back to `total / 1` rather than
/// dividing by zero.
pub fn word_count_trend(
    db: &Database,
    session: &Session,
    from: NaiveDate,
    to: NaiveDate,
) -> OpResult<WordCountTrend> {
    if from > to {
        return Err(OpError::Validation(
            "Range start must not be after range end.".to_string(),
        ));
    }
    info!("Computing word count trend for user {}", session.user_id);

    let conn = db.get_conn()?;
    let daily = entries::word_counts_by_date(&conn, session.user_id, from, to)?;

    let daily_word_counts: BTreeMap<NaiveDate, i64> = daily.into_iter().collect();
    let total_words: i64 = daily_word_counts.values().sum();
    let day_count = daily_word_counts.len().max(1);

    Ok(WordCountTrend {
        total_words,
        average_words_per_day: total_words as f64 / day_count as f64,
        daily_word_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users;
    use crate::ops::entries::{upsert_entry, EntryInput};
    use crate::ops::tags::find_or_create_tag;
    use tempfile::TempDir;
    use uuid::Uuid;

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

    fn write(db: &Database, session: &Session, day: u32, body: &str, mood: Mood, tags: &[&str]) {
        let handles = tags
            .iter()
            .map(|name| (&find_or_create_tag(db, name).unwrap()).into())
            .collect();
        let input = EntryInput {
            id: None,
            entry_date: d(day),
            title: String::new(),
            body: body.to_string(),
            is_markdown: true,
            primary_mood: mood,
            secondary_moods: Vec::new(),
            category_id: None,
            tags: handles,
        };
        upsert_entry(db, session, &input).unwrap();
    }

    #[test]
    fn test_mood_distribution_empty() {
        let (_guard, db, session) = setup();
        let dist = mood_distribution(&db, &session, None, None).unwrap();

        assert!(dist.mood_counts.is_empty());
        assert_eq!(dist.category_counts.len(), 3);
        assert!(dist.category_counts.values().all(|count| *count == 0));
        assert!(dist.most_frequent_mood.is_none());
    }

    #[test]
    fn test_mood_distribution_roll_up() {
        let (_guard, db, session) = setup();
        write(&db, &session, 1, "", Mood::Happy, &[]);
        write(&db, &session, 2, "", Mood::Excited, &[]);
        write(&db, &session, 3, "", Mood::Calm, &[]);
        write(&db, &session, 4, "", Mood::Sad, &[]);
        write(&db, &session, 5, "", Mood::Sad, &[]);

        let dist = mood_distribution(&db, &session, None, None).unwrap();
        assert_eq!(dist.category_counts[&MoodCategory::Positive], 2);
        assert_eq!(dist.category_counts[&MoodCategory::Neutral], 1);
        assert_eq!(dist.category_counts[&MoodCategory::Negative], 2);

        // Band totals equal the per-mood totals
        let mood_total: i64 = dist.mood_counts.values().sum();
        let band_total: i64 = dist.category_counts.values().sum();
        assert_eq!(mood_total, band_total);

        assert_eq!(dist.most_frequent_mood, Some(Mood::Sad));
    }

    #[test]
    fn test_most_frequent_mood_tie_breaks_alphabetically() {
        let (_guard, db, session) = setup();
        write(&db, &session, 1, "", Mood::Happy, &[]);
        write(&db, &session, 2, "", Mood::Calm, &[]);

        let dist = mood_distribution(&db, &session, None, None).unwrap();
        // "calm" sorts before "happy"
        assert_eq!(dist.most_frequent_mood, Some(Mood::Calm));
    }

    #[test]
    fn test_mood_distribution_respects_range() {
        let (_guard, db, session) = setup();
        write(&db, &session, 1, "", Mood::Happy, &[]);
        write(&db, &session, 10, "", Mood::Sad, &[]);

        let dist = mood_distribution(&db, &session, Some(d(5)), None).unwrap();
        assert_eq!(dist.mood_counts.len(), 1);
        assert_eq!(dist.most_frequent_mood, Some(Mood::Sad));
    }

    #[test]
    fn test_tag_usage_top_n() {
        let (_guard, db, session) = setup();
        write(&db, &session, 1, "", Mood::Happy, &["Work", "Art"]);
        write(&db, &session, 2, "", Mood::Happy, &["Work"]);
        write(&db, &session, 3, "", Mood::Happy, &["Work", "Music"]);

        let usage = tag_usage(&db, &session, None, None, None).unwrap();
        assert_eq!(usage.tag_counts[0], TagCount { name: "Work".to_string(), count: 3 });
        assert_eq!(usage.tag_counts.len(), 3);

        let top_one = tag_usage(&db, &session, None, None, Some(1)).unwrap();
        assert_eq!(top_one.tag_counts.len(), 1);

        let invalid = tag_usage(&db, &session, None, None, Some(0));
        assert!(matches!(invalid, Err(OpError::Validation(_))));
    }

    #[test]
    fn test_word_count_trend() {
        let (_guard, db, session) = setup();
        write(&db, &session, 1, "a b c", Mood::Happy, &[]);
        write(&db, &session, 3, "one two", Mood::Happy, &[]);
        write(&db, &session, 20, "out of range", Mood::Happy, &[]);

        let trend = word_count_trend(&db, &session, d(1), d(10)).unwrap();
        assert_eq!(trend.daily_word_counts.len(), 2);
        assert_eq!(trend.daily_word_counts[&d(1)], 3);
        assert_eq!(trend.daily_word_counts[&d(3)], 2);
        assert!(!trend.daily_word_counts.contains_key(&d(2)));
        assert_eq!(trend.total_words, 5);
        assert!((trend.average_words_per_day - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_word_count_trend_empty_range_average() {
        let (_guard, db, session) = setup();
        let trend = word_count_trend(&db, &session, d(1), d(10)).unwrap();
        assert!(trend.daily_word_counts.is_empty());
        assert_eq!(trend.total_words, 0);
        // total / 1 fallback, never NaN
        assert_eq!(trend.average_words_per_day, 0.0);
    }

    #[test]
    fn test_word_count_trend_inverted_range_rejected() {
        let (_guard, db, session) = setup();
        let result = word_count_trend(&db, &session, d(10), d(1));
        assert!(matches!(result, Err(OpError::Validation(_))));
    }
}
