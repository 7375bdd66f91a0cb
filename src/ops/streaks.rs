//! Streak reporting over the session user's entry dates.
//!
//! Fetches the distinct date set from the store and delegates the arithmetic
//! to the pure functions in [`crate::streaks`].

use crate::db::entries;
use crate::db::Database;
use crate::errors::{OpError, OpResult};
use crate::session::Session;
use crate::streaks;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// Current and longest streaks plus the total entry count.
#[derive(Debug, Clone, Serialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_entries: i64,
}

/// Computes streak information as of the given date.
pub fn streak_info(db: &Database, session: &Session, as_of: NaiveDate) -> OpResult<StreakSummary> {
    info!("Computing streaks for user {} as of {}", session.user_id, as_of);

    let conn = db.get_conn()?;
    let dates = entries::entry_dates(&conn, session.user_id)?;
    let total_entries = entries::total_count(&conn, session.user_id)?;

    Ok(StreakSummary {
        current_streak: streaks::current_streak(&dates, as_of),
        longest_streak: streaks::longest_streak(&dates),
        total_entries,
    })
}

/// Enumerates the days in `[from, to]` without an entry, ascending.
pub fn missed_days(
    db: &Database,
    session: &Session,
    from: NaiveDate,
    to: NaiveDate,
) -> OpResult<Vec<NaiveDate>> {
    if from > to {
        return Err(OpError::Validation(
            "Range start must not be after range end.".to_string(),
        ));
    }

    let conn = db.get_conn()?;
    let dates = entries::entry_dates(&conn, session.user_id)?;
    Ok(streaks::missed_days(&dates, from, to))
}
