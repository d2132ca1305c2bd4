//! Core value types shared across the seeding engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded shift.
///
/// `date` is the UTC instant the shift starts. The local calendar day a
/// shift belongs to is derived through the configured timezone and never
/// stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub credit_tips: f64,
    pub cash_tips: f64,
    pub tipout: f64,
    pub hours_worked: u32,
}

/// A shift that has not been persisted yet; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShift {
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub credit_tips: f64,
    pub cash_tips: f64,
    pub tipout: f64,
    pub hours_worked: u32,
}

impl NewShift {
    pub fn into_shift(self, id: String) -> Shift {
        Shift {
            id,
            user_id: self.user_id,
            date: self.date,
            credit_tips: self.credit_tips,
            cash_tips: self.cash_tips,
            tipout: self.tipout,
            hours_worked: self.hours_worked,
        }
    }
}

/// A user account as exposed by the account directory collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// An account that has not been created yet; the directory assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
