//! Constants used throughout the application.
//!
//! This module contains all constants used in the Daybook application,
//! organized into logical groups. Having constants centralized makes them
//! easier to find, modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A daily journal with moods, tags, streaks and analytics";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the Daybook data directory.
pub const ENV_VAR_DAYBOOK_DIR: &str = "DAYBOOK_DIR";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for the data directory within the user's home.
pub const DEFAULT_DATA_SUBDIR: &str = ".daybook";
/// File name of the SQLite database inside the data directory.
pub const DB_FILE_NAME: &str = "daybook.db";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";

// Search & Analytics Defaults
/// Default page size for entry search results.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Default number of tags reported by the tag-usage aggregation.
pub const DEFAULT_TOP_TAGS: usize = 10;

// Validation
/// Minimum number of characters required for a user PIN.
pub const MIN_PIN_LENGTH: usize = 4;

/// Tags seeded into every database on first run. Protected from deletion.
pub const PREBUILT_TAG_NAMES: &[&str] = &[
    "Work",
    "Career",
    "Studies",
    "Family",
    "Friends",
    "Relationships",
    "Health",
    "Fitness",
    "Personal Growth",
    "Self-care",
    "Hobbies",
    "Travel",
    "Nature",
    "Finance",
    "Spirituality",
    "Birthday",
    "Holiday",
    "Vacation",
    "Celebration",
    "Exercise",
    "Reading",
    "Writing",
    "Cooking",
    "Meditation",
    "Yoga",
    "Music",
    "Shopping",
    "Parenting",
    "Projects",
    "Planning",
    "Reflection",
];

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "daybook";
