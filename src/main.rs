/*!
# Daybook - A Daily Journal

Daybook is a command-line journal keeping one entry per calendar day. Entries
carry a primary mood, optional secondary moods, tags and a category; the
history can be searched, filtered and analyzed for streaks, mood
distribution, tag usage and word-count trends.

This file contains the main application flow, coordinating the various
components: it initializes logging, loads configuration, opens the database,
resolves the acting user into a session and dispatches the subcommand to the
matching core operation.

## Configuration

The application can be configured with the following environment variables:
- `DAYBOOK_DIR`: The directory holding the database (defaults to "~/.daybook")
- `RUST_LOG`: Log filter for the tracing subscriber
*/

use chrono::{Local, NaiveDate};
use clap::Parser;
use daybook::cli::{self, CliArgs, CategoryAction, Command, TagAction};
use daybook::config::Config;
use daybook::db::Database;
use daybook::errors::{AppError, AppResult, OpError};
use daybook::mood::Mood;
use daybook::ops;
use daybook::session::Session;
use serde::Serialize;
use std::fs;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting daybook");

    let args = CliArgs::parse();
    debug!("CLI arguments: {:?}", args);

    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => {
            let config = Config::load()?;
            fs::create_dir_all(&config.data_dir)?;
            config.db_path()
        }
    };
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let db = Database::open(&db_path)?;
    db.initialize_schema()?;
    ops::seed_prebuilt_tags(&db)?;

    let today = Local::now().naive_local().date();
    run_command(&db, &args, today)?;

    Ok(())
}

fn run_command(db: &Database, args: &CliArgs, today: NaiveDate) -> AppResult<()> {
    match &args.command {
        Command::Write {
            date,
            title,
            body,
            mood,
            secondary,
            category,
            tags,
            rich_text,
        } => {
            let session = resolve_session(db, args)?;
            let entry_date = match date {
                Some(raw) => parse_date_arg(raw)?,
                None => today,
            };

            let tag_handles = tags
                .iter()
                .map(|name| Ok((&ops::find_or_create_tag(db, name)?).into()))
                .collect::<Result<Vec<ops::TagHandle>, OpError>>()?;
            let category_id = match category {
                Some(name) => Some(resolve_category(db, name)?),
                None => None,
            };
            let secondary_moods = secondary
                .iter()
                .map(|raw| parse_mood_arg(raw))
                .collect::<AppResult<Vec<Mood>>>()?;

            let input = ops::EntryInput {
                id: None,
                entry_date,
                title: title.clone(),
                body: body.clone(),
                is_markdown: !*rich_text,
                primary_mood: parse_mood_arg(mood)?,
                secondary_moods,
                category_id,
                tags: tag_handles,
            };
            let entry = ops::upsert_entry(db, &session, &input)?;
            if args.json {
                print_json(&entry)?;
            } else {
                println!("Saved entry for {} ({} words)", entry.entry_date, entry.word_count());
            }
        }

        Command::Show { date } => {
            let session = resolve_session(db, args)?;
            let entry_date = match date {
                Some(raw) => parse_date_arg(raw)?,
                None => today,
            };
            let entry = ops::get_entry_by_date(db, &session, entry_date)?;
            if args.json {
                print_json(&entry)?;
            } else {
                print_entry(&entry);
            }
        }

        Command::Delete { id } => {
            let session = resolve_session(db, args)?;
            let entry_id = parse_uuid_arg(id)?;
            ops::delete_entry(db, &session, entry_id)?;
            println!("Deleted entry {}", entry_id);
        }

        Command::Search {
            query,
            from,
            to,
            mood,
            tags,
            category,
            page,
            page_size,
        } => {
            let session = resolve_session(db, args)?;
            let request = ops::SearchRequest {
                text: query.clone(),
                from: from.as_deref().map(parse_date_arg).transpose()?,
                to: to.as_deref().map(parse_date_arg).transpose()?,
                moods: mood
                    .iter()
                    .map(|raw| parse_mood_arg(raw))
                    .collect::<AppResult<Vec<Mood>>>()?,
                tag_ids: tags
                    .iter()
                    .map(|name| resolve_tag(db, name))
                    .collect::<AppResult<Vec<_>>>()?,
                category_id: match category {
                    Some(name) => Some(resolve_existing_category(db, name)?),
                    None => None,
                },
                page: *page,
                page_size: *page_size,
            };
            let result = ops::search_entries(db, &session, &request)?;
            if args.json {
                print_json(&SearchOutput::from(&result))?;
            } else {
                println!(
                    "{} entries (page {} of {})",
                    result.total_count,
                    result.page,
                    result.total_pages()
                );
                for entry in &result.entries {
                    print_entry_line(entry);
                }
            }
        }

        Command::Streaks => {
            let session = resolve_session(db, args)?;
            let summary = ops::streak_info(db, &session, today)?;
            if args.json {
                print_json(&summary)?;
            } else {
                println!("Current streak: {} days", summary.current_streak);
                println!("Longest streak: {} days", summary.longest_streak);
                println!("Total entries:  {}", summary.total_entries);
            }
        }

        Command::Missed { from, to } => {
            let session = resolve_session(db, args)?;
            let missed =
                ops::missed_days(db, &session, parse_date_arg(from)?, parse_date_arg(to)?)?;
            if args.json {
                print_json(&missed)?;
            } else if missed.is_empty() {
                println!("No missed days");
            } else {
                for day in missed {
                    println!("{}", day);
                }
            }
        }

        Command::Calendar { year, month } => {
            let session = resolve_session(db, args)?;
            let calendar = ops::calendar_month(db, &session, *year, *month, today)?;
            if args.json {
                print_json(&calendar)?;
            } else {
                println!("{}-{:02}", calendar.year, calendar.month);
                println!(
                    "Days with entries: {}",
                    join_dates(&calendar.dates_with_entries)
                );
                println!("Missed days:       {}", join_dates(&calendar.missed_days));
            }
        }

        Command::MoodStats { from, to } => {
            let session = resolve_session(db, args)?;
            let distribution = ops::mood_distribution(
                db,
                &session,
                from.as_deref().map(parse_date_arg).transpose()?,
                to.as_deref().map(parse_date_arg).transpose()?,
            )?;
            if args.json {
                print_json(&distribution)?;
            } else {
                for (mood, count) in &distribution.mood_counts {
                    println!("{:<12} {}", mood.to_string(), count);
                }
                println!("--");
                for (category, count) in &distribution.category_counts {
                    println!("{:<12} {}", category.to_string(), count);
                }
                match distribution.most_frequent_mood {
                    Some(mood) => println!("Most frequent: {}", mood),
                    None => println!("Most frequent: (no entries)"),
                }
            }
        }

        Command::TagStats { from, to, top } => {
            let session = resolve_session(db, args)?;
            let usage = ops::tag_usage(
                db,
                &session,
                from.as_deref().map(parse_date_arg).transpose()?,
                to.as_deref().map(parse_date_arg).transpose()?,
                Some(*top),
            )?;
            if args.json {
                print_json(&usage)?;
            } else if usage.tag_counts.is_empty() {
                println!("No tagged entries");
            } else {
                for tag in &usage.tag_counts {
                    println!("{:<20} {}", tag.name, tag.count);
                }
            }
        }

        Command::WordStats { from, to } => {
            let session = resolve_session(db, args)?;
            let trend =
                ops::word_count_trend(db, &session, parse_date_arg(from)?, parse_date_arg(to)?)?;
            if args.json {
                print_json(&trend)?;
            } else {
                for (day, words) in &trend.daily_word_counts {
                    println!("{}  {}", day, words);
                }
                println!("Total words:   {}", trend.total_words);
                println!("Average/day:   {:.1}", trend.average_words_per_day);
            }
        }

        Command::Tags { action } => match action {
            None | Some(TagAction::List) => {
                for tag in ops::list_tags(db)? {
                    let marker = if tag.is_prebuilt { "*" } else { " " };
                    println!("{} {}", marker, tag.name);
                }
            }
            Some(TagAction::Add { name }) => {
                let tag = ops::add_tag(db, name, false)?;
                println!("Created tag '{}'", tag.name);
            }
            Some(TagAction::Rm { name }) => {
                let tag = require_tag(db, name)?;
                ops::delete_tag(db, tag.id)?;
                println!("Deleted tag '{}'", name);
            }
        },

        Command::Categories { action } => match action {
            None | Some(CategoryAction::List) => {
                for category in ops::list_categories(db)? {
                    println!("{}", category.name);
                }
            }
            Some(CategoryAction::Add { name }) => {
                let category = ops::add_category(db, name)?;
                println!("Created category '{}'", category.name);
            }
            Some(CategoryAction::Rename { name, new_name }) => {
                let id = resolve_existing_category(db, name)?;
                let category = ops::update_category(db, id, new_name)?;
                println!("Renamed category to '{}'", category.name);
            }
            Some(CategoryAction::Rm { name }) => {
                let id = resolve_existing_category(db, name)?;
                ops::delete_category(db, id)?;
                println!("Deleted category '{}'", name);
            }
        },

        Command::Users => {
            for user in ops::list_users(db)? {
                println!("{}  (since {})", user.username, user.created_at);
            }
        }
    }

    Ok(())
}

/// Resolves `--user` into a session: existing accounts log in, unknown
/// usernames register on the spot. The PIN comes from `--pin` or a prompt.
fn resolve_session(db: &Database, args: &CliArgs) -> AppResult<Session> {
    let username = args.user.as_deref().ok_or_else(|| {
        AppError::Op(OpError::Validation(
            "No user specified: pass --user <name>".to_string(),
        ))
    })?;

    let exists = {
        let conn = db.get_conn()?;
        daybook::db::users::get_by_username(&conn, username)?.is_some()
    };

    let pin = match &args.pin {
        Some(pin) => pin.clone(),
        None if exists => rpassword::prompt_password(format!("PIN for {}: ", username))?,
        None => rpassword::prompt_password(format!("Set a PIN for {}: ", username))?,
    };

    let session = if exists {
        ops::login(db, username, &pin)?
    } else {
        info!("Creating account '{}'", username);
        ops::register(db, username, &pin)?
    };
    Ok(session)
}

fn parse_date_arg(raw: &str) -> AppResult<NaiveDate> {
    cli::parse_date(raw).map_err(|e| {
        AppError::Op(OpError::Validation(format!("Invalid date '{}': {}", raw, e)))
    })
}

fn parse_mood_arg(raw: &str) -> AppResult<Mood> {
    Mood::from_str(&raw.to_lowercase()).ok_or_else(|| {
        AppError::Op(OpError::Validation(format!(
            "Unknown mood '{}'. Expected one of: {}",
            raw,
            Mood::ALL.map(|m| m.as_str()).join(", ")
        )))
    })
}

fn parse_uuid_arg(raw: &str) -> AppResult<uuid::Uuid> {
    uuid::Uuid::parse_str(raw)
        .map_err(|e| AppError::Op(OpError::Validation(format!("Invalid id '{}': {}", raw, e))))
}

fn resolve_tag(db: &Database, name: &str) -> AppResult<uuid::Uuid> {
    Ok(require_tag(db, name)?.id)
}

fn require_tag(db: &Database, name: &str) -> AppResult<daybook::db::tags::Tag> {
    let conn = db.get_conn()?;
    daybook::db::tags::get_by_name(&conn, name)?
        .ok_or_else(|| AppError::Op(OpError::NotFound(format!("Tag '{}' not found.", name))))
}

fn resolve_category(db: &Database, name: &str) -> Result<uuid::Uuid, OpError> {
    for category in ops::list_categories(db)? {
        if category.name == name {
            return Ok(category.id);
        }
    }
    Ok(ops::add_category(db, name)?.id)
}

fn resolve_existing_category(db: &Database, name: &str) -> AppResult<uuid::Uuid> {
    for category in ops::list_categories(db)? {
        if category.name == name {
            return Ok(category.id);
        }
    }
    Err(AppError::Op(OpError::NotFound(format!(
        "Category '{}' not found.",
        name
    ))))
}

fn join_dates(dates: &[NaiveDate]) -> String {
    if dates.is_empty() {
        return "(none)".to_string();
    }
    dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Op(OpError::Fatal(e.to_string())))?;
    println!("{}", rendered);
    Ok(())
}

fn print_entry(entry: &daybook::db::entries::Entry) {
    println!("# {}  {}", entry.entry_date, entry.title);
    println!(
        "mood: {}{}",
        entry.primary_mood,
        if entry.secondary_moods.is_empty() {
            String::new()
        } else {
            format!(
                " (also: {})",
                entry
                    .secondary_moods
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
    );
    if let Some(category) = &entry.category_name {
        println!("category: {}", category);
    }
    if !entry.tags.is_empty() {
        let names: Vec<&str> = entry.tags.iter().map(|t| t.name.as_str()).collect();
        println!("tags: {}", names.join(", "));
    }
    println!();
    println!("{}", entry.body);
}

fn print_entry_line(entry: &daybook::db::entries::Entry) {
    let title = if entry.title.is_empty() { "(untitled)" } else { &entry.title };
    println!(
        "{}  {}  [{}]  {} words  {}",
        entry.entry_date,
        title,
        entry.primary_mood,
        entry.word_count(),
        entry.id
    );
}

/// JSON shape for search results, with the page arithmetic folded in.
#[derive(Serialize)]
struct SearchOutput<'a> {
    entries: &'a [daybook::db::entries::Entry],
    total_count: i64,
    page: u32,
    page_size: u32,
    total_pages: u32,
}

impl<'a> From<&'a ops::SearchPage> for SearchOutput<'a> {
    fn from(page: &'a ops::SearchPage) -> Self {
        SearchOutput {
            entries: &page.entries,
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages(),
        }
    }
}
