//! In-process implementation of the store contracts.
//!
//! Backs the demo binary and the end-to-end tests. Not a persistence layer;
//! everything lives in mutex-guarded vectors for the lifetime of the
//! process.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::model::{Account, NewAccount, NewShift, Shift};
use crate::store::{AccountDirectory, DirectoryError, ShiftRepository, StoreError};

/// Shortest password the directory accepts.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Default)]
pub struct MemoryStore {
    shifts: Mutex<Vec<Shift>>,
    accounts: Mutex<Vec<Account>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn shift_count(&self) -> usize {
        self.shifts.lock().await.len()
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", prefix, n)
    }
}

#[async_trait]
impl ShiftRepository for MemoryStore {
    async fn shifts_for_user(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Shift>, StoreError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(StoreError::InvalidRange { start, end });
            }
        }

        let shifts = self.shifts.lock().await;
        Ok(shifts
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter(|s| start.map_or(true, |b| s.date >= b))
            .filter(|s| end.map_or(true, |b| s.date < b))
            .cloned()
            .collect())
    }

    async fn add(&self, shift: NewShift) -> Result<Shift, StoreError> {
        let shift = shift.into_shift(self.next_id("shift"));
        self.shifts.lock().await.push(shift.clone());
        Ok(shift)
    }

    async fn delete_for_user(&self, user_id: &str) -> Result<(), StoreError> {
        self.shifts.lock().await.retain(|s| s.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl AccountDirectory for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DirectoryError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn create(&self, account: NewAccount, password: &str) -> Result<Account, DirectoryError> {
        let mut reasons = Vec::new();
        if password.chars().count() < MIN_PASSWORD_LEN {
            reasons.push(format!(
                "Passwords must be at least {} characters.",
                MIN_PASSWORD_LEN
            ));
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.iter().any(|a| a.username == account.username) {
            reasons.push(format!(
                "Username '{}' is already taken.",
                account.username
            ));
        }
        if !reasons.is_empty() {
            return Err(DirectoryError::Rejected { reasons });
        }

        let created = Account {
            id: self.next_id("user"),
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
        };
        accounts.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, account: &Account) -> Result<(), DirectoryError> {
        self.accounts.lock().await.retain(|a| a.id != account.id);
        Ok(())
    }
}
