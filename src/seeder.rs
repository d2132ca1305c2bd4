//! Demo data seeding orchestration.
//!
//! Coordinates the account directory, gap analysis, the shift planner, and
//! the shift repository. Each generated shift is persisted before the next
//! date is processed; dates run in chronological order.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::{error, info};

use crate::gap::{self, SeedingDirective, HISTORY_HORIZON_DAYS};
use crate::model::{NewAccount, NewShift};
use crate::store::{AccountDirectory, DirectoryError, ShiftRepository, StoreError};
use crate::timezone::LocalTimeConverter;
use crate::timing;

pub const DEMO_USERNAME: &str = "demouser";
pub const DEMO_EMAIL: &str = "demo@example.com";

/// Unexpected collaborator failures. Expected outcomes (a rejected account
/// creation) are logged and absorbed, not raised.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// What one seeding invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    /// Dates handed to the planner (each may still yield zero shifts).
    pub dates_considered: usize,
    pub shifts_added: usize,
    /// Existing history was bulk-deleted first.
    pub history_cleared: bool,
    pub account_created: bool,
}

pub struct DemoSeeder {
    shifts: Arc<dyn ShiftRepository>,
    accounts: Arc<dyn AccountDirectory>,
    converter: LocalTimeConverter,
    demo_password: String,
}

impl DemoSeeder {
    pub fn new(
        shifts: Arc<dyn ShiftRepository>,
        accounts: Arc<dyn AccountDirectory>,
        converter: LocalTimeConverter,
        demo_password: impl Into<String>,
    ) -> Self {
        Self {
            shifts,
            accounts,
            converter,
            demo_password: demo_password.into(),
        }
    }

    /// Ensure the demo account exists and its shift history is current.
    ///
    /// A missing account is created and seeded with the full history
    /// window; an existing account gets whatever the gap analysis says it
    /// is missing. Once today has data, repeat calls write nothing.
    pub async fn seed_demo_data<R: Rng + Send>(&self, rng: &mut R) -> Result<SeedReport, SeedError> {
        info!("Starting demo data seeding");
        match self.accounts.find_by_username(DEMO_USERNAME).await? {
            None => self.create_account_and_seed(rng).await,
            Some(account) => {
                let history = self.shifts.shifts_for_user(&account.id, None, None).await?;
                let today = self.converter.current_local_date();
                let directive = gap::analyze(&history, today, &self.converter);
                self.execute(&account.id, directive, rng).await
            }
        }
    }

    /// Delete the demo account and its shifts, then recreate both from
    /// scratch.
    pub async fn reset_demo_user<R: Rng + Send>(&self, rng: &mut R) -> Result<SeedReport, SeedError> {
        if let Some(account) = self.accounts.find_by_username(DEMO_USERNAME).await? {
            self.shifts.delete_for_user(&account.id).await?;
            self.accounts.delete(&account).await?;
            info!("Deleted demo user and shift history");
        }
        self.seed_demo_data(rng).await
    }

    /// Delete only the shift history and regenerate the full window for the
    /// existing account. Does nothing when the account is missing.
    pub async fn reset_demo_user_shifts<R: Rng + Send>(
        &self,
        rng: &mut R,
    ) -> Result<SeedReport, SeedError> {
        let Some(account) = self.accounts.find_by_username(DEMO_USERNAME).await? else {
            info!("No demo user to reset");
            return Ok(SeedReport::default());
        };

        self.shifts.delete_for_user(&account.id).await?;
        info!("Cleared demo shift history");
        let today = self.converter.current_local_date();
        let full = SeedingDirective::FullSeed(gap::full_window(today));
        let mut report = self.execute(&account.id, full, rng).await?;
        report.history_cleared = true;
        Ok(report)
    }

    async fn create_account_and_seed<R: Rng + Send>(
        &self,
        rng: &mut R,
    ) -> Result<SeedReport, SeedError> {
        let account = NewAccount {
            username: DEMO_USERNAME.to_string(),
            email: DEMO_EMAIL.to_string(),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
        };
        let account = match self.accounts.create(account, &self.demo_password).await {
            Ok(account) => account,
            Err(DirectoryError::Rejected { reasons }) => {
                // Expected on policy violations; no orphaned shift data.
                error!("Failed to create demo user: {}", reasons.join("; "));
                return Ok(SeedReport::default());
            }
            Err(other) => return Err(other.into()),
        };
        info!(user_id = %account.id, "Created demo user");

        let today = self.converter.current_local_date();
        let full = SeedingDirective::FullSeed(gap::full_window(today));
        let mut report = self.execute(&account.id, full, rng).await?;
        report.account_created = true;
        Ok(report)
    }

    async fn execute<R: Rng + Send>(
        &self,
        user_id: &str,
        directive: SeedingDirective,
        rng: &mut R,
    ) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();
        let dates = match directive {
            SeedingDirective::NoOp => {
                info!("Shift history is current; nothing to seed");
                return Ok(report);
            }
            SeedingDirective::FullSeed(dates) => {
                info!(days = dates.len(), "Seeding full history window");
                dates
            }
            SeedingDirective::FillGap(dates) => {
                info!(days = dates.len(), "Filling gap since last shift");
                dates
            }
            SeedingDirective::RegenerateAll(dates) => {
                info!(
                    "Last shift is more than {} days old; regenerating history",
                    HISTORY_HORIZON_DAYS
                );
                self.shifts.delete_for_user(user_id).await?;
                report.history_cleared = true;
                dates
            }
        };

        report.dates_considered = dates.len();
        if dates.is_empty() {
            info!("No dates to seed");
            return Ok(report);
        }

        for date in dates {
            for planned in timing::plan_day(date, rng) {
                let start = self.converter.to_utc(date, planned.start);
                self.shifts
                    .add(NewShift {
                        user_id: user_id.to_string(),
                        date: start,
                        credit_tips: planned.credit_tips as f64,
                        cash_tips: planned.cash_tips as f64,
                        tipout: planned.tipout as f64,
                        hours_worked: planned.hours,
                    })
                    .await?;
                report.shifts_added += 1;
            }
        }

        info!(
            shifts = report.shifts_added,
            dates = report.dates_considered,
            "Seeding complete"
        );
        Ok(report)
    }
}
