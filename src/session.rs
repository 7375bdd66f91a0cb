//! Explicit per-call session context.
//!
//! Every core operation is scoped to exactly one user. Instead of a mutable
//! process-wide "current user", a `Session` value is produced by login or
//! registration and passed into each call.

use uuid::Uuid;

/// Identifies the user a core operation acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
}

impl Session {
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Session {
            user_id,
            username: username.into(),
        }
    }
}
