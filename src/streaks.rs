//! Consecutive-day streak arithmetic without I/O operations.
//!
//! This module contains pure logic over the set of calendar dates that have
//! a journal entry: current streak (with the grace-day rule), longest streak,
//! and missed-day enumeration. The ops layer feeds it dates from the store.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Computes the streak of consecutive entry days ending at `as_of`.
///
/// If `as_of` has an entry the streak is anchored there. If it does not but
/// the previous day does, the streak is still considered open (the grace-day
/// rule: yesterday's streak counts until today's entry has been written).
/// Otherwise the current streak is 0.
pub fn current_streak(dates: &[NaiveDate], as_of: NaiveDate) -> u32 {
    let set: HashSet<NaiveDate> = dates.iter().copied().collect();

    let mut anchor = if set.contains(&as_of) {
        as_of
    } else if set.contains(&(as_of - Duration::days(1))) {
        as_of - Duration::days(1)
    } else {
        return 0;
    };

    let mut streak = 1;
    loop {
        let prev = anchor - Duration::days(1);
        if !set.contains(&prev) {
            break;
        }
        streak += 1;
        anchor = prev;
    }
    streak
}

/// Computes the longest run of consecutive entry days ever recorded.
///
/// Returns 0 for an empty date set.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut best: u32 = 0;
    let mut run: u32 = 0;
    let mut prev: Option<NaiveDate> = None;
    for date in sorted {
        run = match prev {
            Some(p) if date.signed_duration_since(p).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }
    best
}

/// Enumerates every date in `[from, to]` (inclusive) that has no entry,
/// in ascending order.
pub fn missed_days(dates: &[NaiveDate], from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let set: HashSet<NaiveDate> = dates.iter().copied().collect();

    let mut missed = Vec::new();
    let mut day = from;
    while day <= to {
        if !set.contains(&day) {
            missed.push(day);
        }
        day += Duration::days(1);
    }
    missed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_current_streak_empty() {
        assert_eq!(current_streak(&[], d(2024, 6, 15)), 0);
    }

    #[test]
    fn test_current_streak_single_entry_on_as_of() {
        assert_eq!(current_streak(&[d(2024, 6, 15)], d(2024, 6, 15)), 1);
    }

    #[test]
    fn test_current_streak_gap_two_days_ago() {
        // Only D-2 has an entry: the grace day does not reach that far.
        assert_eq!(current_streak(&[d(2024, 6, 13)], d(2024, 6, 15)), 0);
    }

    #[test]
    fn test_current_streak_grace_day() {
        // D-1 and D-2 written, D not yet: still an open streak of 2.
        let dates = [d(2024, 6, 14), d(2024, 6, 13)];
        assert_eq!(current_streak(&dates, d(2024, 6, 15)), 2);
    }

    #[test]
    fn test_current_streak_including_today() {
        let dates = [d(2024, 6, 15), d(2024, 6, 14), d(2024, 6, 13)];
        assert_eq!(current_streak(&dates, d(2024, 6, 15)), 3);
    }

    #[test]
    fn test_current_streak_stops_at_gap() {
        let dates = [d(2024, 6, 15), d(2024, 6, 14), d(2024, 6, 11)];
        assert_eq!(current_streak(&dates, d(2024, 6, 15)), 2);
    }

    #[test]
    fn test_longest_streak_empty() {
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_longest_streak_single() {
        assert_eq!(longest_streak(&[d(2024, 6, 15)]), 1);
    }

    #[test]
    fn test_longest_streak_with_gaps() {
        let dates = [
            d(2024, 6, 1),
            d(2024, 6, 2),
            d(2024, 6, 3),
            d(2024, 6, 7),
            d(2024, 6, 8),
        ];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn test_longest_streak_unsorted_input() {
        let dates = [d(2024, 6, 3), d(2024, 6, 1), d(2024, 6, 2)];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn test_longest_streak_at_least_current() {
        let dates = [d(2024, 6, 15), d(2024, 6, 14), d(2024, 6, 10)];
        let as_of = d(2024, 6, 15);
        assert!(longest_streak(&dates) >= current_streak(&dates, as_of));
    }

    #[test]
    fn test_missed_days_partitions_range() {
        let dates = [d(2024, 6, 2), d(2024, 6, 4)];
        let missed = missed_days(&dates, d(2024, 6, 1), d(2024, 6, 5));
        assert_eq!(missed, vec![d(2024, 6, 1), d(2024, 6, 3), d(2024, 6, 5)]);

        // Present and missed days together cover the range exactly once.
        let mut all: Vec<NaiveDate> = missed;
        all.extend_from_slice(&dates);
        all.sort_unstable();
        let range: Vec<NaiveDate> = (1..=5).map(|day| d(2024, 6, day)).collect();
        assert_eq!(all, range);
    }

    #[test]
    fn test_missed_days_empty_entry_set() {
        let missed = missed_days(&[], d(2024, 6, 1), d(2024, 6, 3));
        assert_eq!(missed.len(), 3);
    }

    #[test]
    fn test_missed_days_inverted_range_is_empty() {
        assert!(missed_days(&[], d(2024, 6, 5), d(2024, 6, 1)).is_empty());
    }
}
