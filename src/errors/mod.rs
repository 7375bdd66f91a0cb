//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, the
//! store-level `DatabaseError`, and the operation-boundary `OpError` returned
//! by every core operation. `OpError` is the failure side of the result
//! envelope: expected failures (not-found, validation, conflict) are reported
//! through it, and unexpected store faults are converted into its `Fatal`
//! variant carrying the underlying message instead of propagating further.

use std::io;
use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use daybook::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}")]
    Pool(#[from] r2d2::Error),

    /// Requested row not found in the database.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Custom database error with detailed message.
    #[error("Database error: {0}")]
    Custom(String),
}

/// Failure side of the envelope returned by every core operation.
///
/// Each variant carries a human-readable message. Ownership mismatches are
/// reported as `NotFound`, never as a distinct "forbidden" case, so callers
/// cannot probe for the existence of another user's data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpError {
    /// The requested entry/tag/category/user does not exist, or is not owned
    /// by the requesting user.
    #[error("{0}")]
    NotFound(String),

    /// Input rejected before any store mutation (blank names, short PIN,
    /// invalid pagination).
    #[error("{0}")]
    Validation(String),

    /// Duplicate tag or username creation attempt.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure from the store layer, converted at the operation
    /// boundary with the underlying message preserved.
    #[error("{0}")]
    Fatal(String),
}

/// A type alias for `Result<T, OpError>`, the envelope returned by every core
/// operation.
pub type OpResult<T> = Result<T, OpError>;

impl From<DatabaseError> for OpError {
    fn from(err: DatabaseError) -> Self {
        OpError::Fatal(err.to_string())
    }
}

impl From<AppError> for OpError {
    fn from(err: AppError) -> Self {
        OpError::Fatal(err.to_string())
    }
}

/// Represents all possible errors that can occur in the daybook application.
///
/// This enum is the central error type used across the application, with
/// variants for different error categories. It uses `thiserror` for deriving
/// the `Error` trait implementation and formatted error messages.
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the
    /// `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// A failed core operation surfaced to the application boundary.
    #[error("{0}")]
    Op(#[from] OpError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid data directory".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid data directory"
        );

        let db_error = AppError::Database(DatabaseError::NotFound("Entry missing".to_string()));
        assert!(format!("{}", db_error).contains("Entry missing"));
    }

    #[test]
    fn test_database_error_to_op_error_is_fatal() {
        let db_error = DatabaseError::Custom("disk full".to_string());
        let op_error: OpError = db_error.into();

        match op_error {
            OpError::Fatal(message) => assert!(message.contains("disk full")),
            _ => panic!("Expected OpError::Fatal variant"),
        }
    }

    #[test]
    fn test_app_error_to_op_error_preserves_message() {
        let app_error = AppError::Config("bad setting".to_string());
        let op_error: OpError = app_error.into();

        match op_error {
            OpError::Fatal(message) => assert!(message.contains("bad setting")),
            _ => panic!("Expected OpError::Fatal variant"),
        }
    }

    #[test]
    fn test_op_error_display_is_bare_message() {
        assert_eq!(
            format!("{}", OpError::NotFound("Entry not found.".to_string())),
            "Entry not found."
        );
        assert_eq!(
            format!("{}", OpError::Validation("Tag name is required.".to_string())),
            "Tag name is required."
        );
        assert_eq!(
            format!("{}", OpError::Conflict("Tag already exists.".to_string())),
            "Tag already exists."
        );
    }

    #[test]
    fn test_op_error_round_trip_through_app_error() {
        let op_error = OpError::NotFound("Category not found.".to_string());
        let app_error: AppError = op_error.into();
        assert_eq!(format!("{}", app_error), "Category not found.");
    }
}
