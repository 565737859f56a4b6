//! Login session persistence
//!
//! Holds the identity fields returned by the auth service for the lifetime of
//! one login. The session is written on login and removed on logout.

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::storage::{LocalStore, keys};

/// Identity of the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: i64,
    pub login_email: String,
    pub login_date: NaiveDate,
    pub login_time: NaiveTime,
    pub user_log_id: Option<i64>,
}

impl UserSession {
    /// When the session was created
    pub fn logged_in_at(&self) -> NaiveDateTime {
        self.login_date.and_time(self.login_time)
    }

    /// Whether the session is older than `max_age_hours` at `now`.
    ///
    /// Without a limit sessions never expire.
    pub fn is_expired(&self, now: NaiveDateTime, max_age_hours: Option<u32>) -> bool {
        match max_age_hours {
            Some(hours) => now - self.logged_in_at() > Duration::hours(i64::from(hours)),
            None => false,
        }
    }

    /// `loginDate` as sent to the backend
    pub fn date_string(&self) -> String {
        self.login_date.format("%Y-%m-%d").to_string()
    }

    /// `loginTime` as sent to the backend
    pub fn time_string(&self) -> String {
        self.login_time.format("%H:%M:%S").to_string()
    }

    /// Load the persisted session, if any
    pub fn load(store: &LocalStore) -> Option<Self> {
        store.get_json(keys::SESSION)
    }

    /// Persist this session
    pub fn save(&self, store: &mut LocalStore) -> Result<()> {
        store.set_json(keys::SESSION, self)
    }
}
