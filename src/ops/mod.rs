//! High-level operations over the journal store.
//!
//! This module provides the user-facing operations of the core: entry upsert
//! and lookup, multi-predicate search, streak reporting, analytics
//! aggregation, tag reconciliation and user management. Every function takes
//! the database handle plus, where user data is involved, an explicit
//! [`crate::session::Session`], and returns an `OpResult` envelope.

pub mod analytics;
pub mod categories;
pub mod entries;
pub mod search;
pub mod streaks;
pub mod tags;
pub mod users;

// Re-export commonly used functions
pub use analytics::{mood_distribution, tag_usage, word_count_trend, MoodDistribution, TagUsage, WordCountTrend};
pub use categories::{add_category, delete_category, list_categories, update_category};
pub use entries::{
    calendar_month, delete_entry, get_entry, get_entry_by_date, has_entry_for_date, upsert_entry,
    CalendarMonth, EntryInput,
};
pub use search::{search_entries, SearchPage, SearchRequest};
pub use streaks::{missed_days, streak_info, StreakSummary};
pub use tags::{
    add_tag, delete_tag, find_or_create_tag, list_tags, prebuilt_tags, reconcile_entry_tags,
    seed_prebuilt_tags, TagHandle,
};
pub use users::{delete_user, list_users, login, register, UserSummary};
