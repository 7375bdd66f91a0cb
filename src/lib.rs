/*!
# Daybook

Daybook is a personal journal keeping at most one dated entry per calendar
day. Entries carry a primary mood, optional secondary moods, tags and a
category; the history can then be searched, filtered and analyzed.

## Core Features

- One entry per calendar day, updated in place on every later write
- Multi-predicate search with pagination (text, date range, moods, tags, category)
- Writing streaks with a grace-day rule, plus missed-day reports
- Mood distribution, tag usage and word-count trend analytics
- Prebuilt tag set seeded on first run and protected from deletion

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `db`: SQLite storage (entries, tags, categories, users)
- `errors`: Error handling infrastructure and the operation result envelope
- `mood`: The closed mood vocabulary and its band mapping
- `ops`: User-facing operations over the store
- `session`: The explicit per-call user context
- `streaks`: Pure consecutive-day arithmetic

## Usage Example

```no_run
use daybook::db::Database;
use daybook::ops;
use chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(std::path::Path::new("/tmp/daybook.db"))?;
    db.initialize_schema()?;
    ops::seed_prebuilt_tags(&db)?;

    let session = ops::register(&db, "ada", "1234")?;
    let summary = ops::streak_info(&db, &session, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())?;
    println!("current streak: {}", summary.current_streak);
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Constants used throughout the application
pub mod constants;
/// SQLite storage for entries, tags, categories and users
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// The closed mood vocabulary and its category mapping
pub mod mood;
/// High-level operations over the journal store
pub mod ops;
/// Explicit per-call session context
pub mod session;
/// Pure consecutive-day streak arithmetic
pub mod streaks;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use db::Database;
pub use errors::{AppError, AppResult, OpError, OpResult};
pub use mood::{Mood, MoodCategory};
pub use session::Session;
