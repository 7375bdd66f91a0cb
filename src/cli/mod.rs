//! Command-line interface handling using clap.

use crate::constants;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A daily journal with moods, tags, streaks and analytics
#[derive(Parser, Debug)]
#[clap(name = "daybook", about = constants::APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Account to act as; created on first use
    #[clap(short = 'u', long, global = true)]
    pub user: Option<String>,

    /// PIN for the account (prompted when omitted)
    #[clap(long, global = true)]
    pub pin: Option<String>,

    /// Override the database file location
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Emit results as JSON instead of text
    #[clap(long, global = true)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write or update the entry for a date (defaults to today)
    Write {
        /// Entry date (format: YYYY-MM-DD or YYYYMMDD)
        #[clap(short, long)]
        date: Option<String>,
        /// Entry title
        #[clap(long, default_value = "")]
        title: String,
        /// Entry body text
        body: String,
        /// Primary mood (e.g. happy, calm, anxious)
        #[clap(short, long)]
        mood: String,
        /// Secondary moods (repeatable)
        #[clap(long = "also")]
        secondary: Vec<String>,
        /// Category name; created on demand
        #[clap(short, long)]
        category: Option<String>,
        /// Tag names; created on demand (repeatable)
        #[clap(short = 't', long = "tag")]
        tags: Vec<String>,
        /// Store the body as rich text instead of markdown
        #[clap(long)]
        rich_text: bool,
    },

    /// Show the entry for a date (defaults to today)
    Show {
        /// Entry date (format: YYYY-MM-DD or YYYYMMDD)
        date: Option<String>,
    },

    /// Delete an entry by id
    Delete {
        /// Entry id
        id: String,
    },

    /// Search and filter entries
    Search {
        /// Substring matched against title or body
        #[clap(short, long)]
        query: Option<String>,
        /// Inclusive start date
        #[clap(long)]
        from: Option<String>,
        /// Inclusive end date
        #[clap(long)]
        to: Option<String>,
        /// Primary moods to match (repeatable)
        #[clap(short, long)]
        mood: Vec<String>,
        /// Tag names to match (repeatable)
        #[clap(short = 't', long = "tag")]
        tags: Vec<String>,
        /// Category name to match
        #[clap(short, long)]
        category: Option<String>,
        /// 1-based page number
        #[clap(short, long, default_value_t = 1)]
        page: u32,
        /// Entries per page
        #[clap(long, default_value_t = constants::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },

    /// Show current and longest writing streaks
    Streaks,

    /// List days without an entry in a date range
    Missed {
        /// Inclusive start date
        from: String,
        /// Inclusive end date
        to: String,
    },

    /// Show entry and missed days for one month
    Calendar {
        year: i32,
        month: u32,
    },

    /// Mood distribution with the positive/neutral/negative roll-up
    MoodStats {
        #[clap(long)]
        from: Option<String>,
        #[clap(long)]
        to: Option<String>,
    },

    /// Most used tags
    TagStats {
        #[clap(long)]
        from: Option<String>,
        #[clap(long)]
        to: Option<String>,
        /// How many tags to report
        #[clap(short = 'n', long, default_value_t = constants::DEFAULT_TOP_TAGS)]
        top: usize,
    },

    /// Per-day word counts for a date range
    WordStats {
        /// Inclusive start date
        from: String,
        /// Inclusive end date
        to: String,
    },

    /// List, add or remove tags
    Tags {
        #[clap(subcommand)]
        action: Option<TagAction>,
    },

    /// List, add or remove categories
    Categories {
        #[clap(subcommand)]
        action: Option<CategoryAction>,
    },

    /// List accounts in this database
    Users,
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    /// List all tags
    List,
    /// Create a tag
    Add { name: String },
    /// Delete a tag by name
    Rm { name: String },
}

#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    /// List all categories
    List,
    /// Create a category
    Add { name: String },
    /// Rename a category
    Rename { name: String, new_name: String },
    /// Delete a category by name
    Rm { name: String },
}

/// Parse a date string in YYYY-MM-DD or YYYYMMDD format.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, constants::DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(date_str, constants::DATE_FORMAT_COMPACT))
}
