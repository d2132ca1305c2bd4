//! Collaborator contracts for persistence and account management.
//!
//! The seeding core never talks to a database or an identity provider
//! directly; it goes through these traits. Implementations live elsewhere
//! (an in-process one ships in `memory` for the demo binary and tests).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Account, NewAccount, NewShift, Shift};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller error: a range filter with `start` after `end`. The seeder's
    /// own date ranges are well-ordered by construction and never hit this.
    #[error("start date {start} is after end date {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Unexpected persistence failure. Not recovered by the seeding core;
    /// it cannot know whether partial writes occurred.
    #[error("shift store failure: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory refused to create the account (password policy,
    /// duplicate username, ...). A normal, expected outcome.
    #[error("account rejected: {}", reasons.join("; "))]
    Rejected { reasons: Vec<String> },

    /// Unexpected directory failure.
    #[error("account directory failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// Shifts belonging to one user, optionally filtered to start instants
    /// in `[start, end)`. Fails with `InvalidRange` when both bounds are
    /// given and `start > end`.
    async fn shifts_for_user(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Shift>, StoreError>;

    /// Persist one shift and return it with its assigned id.
    async fn add(&self, shift: NewShift) -> Result<Shift, StoreError>;

    /// Bulk-delete every shift belonging to the user.
    async fn delete_for_user(&self, user_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DirectoryError>;

    /// Create an account with the given password. Policy violations come
    /// back as `Rejected` with the underlying reasons.
    async fn create(&self, account: NewAccount, password: &str) -> Result<Account, DirectoryError>;

    async fn delete(&self, account: &Account) -> Result<(), DirectoryError>;
}
