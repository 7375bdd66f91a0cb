//! Configuration management for the daybook application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults. It supports configuring the
//! data directory that holds the SQLite database.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DIR`: Path to the data directory (defaults to ~/.daybook)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants;
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the daybook application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/data"),
/// };
/// assert!(config.db_path().ends_with("daybook.db"));
/// ```
pub struct Config {
    /// Directory where the database lives.
    ///
    /// Loaded from the DAYBOOK_DIR environment variable with a fallback to
    /// ~/.daybook if not specified.
    pub data_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// `DAYBOOK_DIR` is expanded with `shellexpand` so values like
    /// `~/journals` work; when unset the directory defaults to
    /// `$HOME/.daybook`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither `DAYBOOK_DIR` nor `HOME`
    /// is available.
    pub fn load() -> AppResult<Self> {
        let data_dir = match env::var(constants::ENV_VAR_DAYBOOK_DIR) {
            Ok(raw) if !raw.trim().is_empty() => {
                PathBuf::from(shellexpand::tilde(&raw).into_owned())
            }
            _ => {
                let home = env::var(constants::ENV_VAR_HOME).map_err(|_| {
                    AppError::Config(format!(
                        "Cannot determine data directory: set {} or {}",
                        constants::ENV_VAR_DAYBOOK_DIR,
                        constants::ENV_VAR_HOME
                    ))
                })?;
                PathBuf::from(home).join(constants::DEFAULT_DATA_SUBDIR)
            }
        };

        let config = Config { data_dir };
        config.validate()?;
        Ok(config)
    }

    /// Validates the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty data directory path.
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Data directory path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(constants::DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_path() {
        let config = Config {
            data_dir: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_db_path_is_inside_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/data/journal"),
        };
        assert_eq!(
            config.db_path(),
            PathBuf::from("/data/journal").join(constants::DB_FILE_NAME)
        );
    }

    #[test]
    fn test_debug_redacts_path() {
        let config = Config {
            data_dir: PathBuf::from("/secret/location"),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
    }
}
