//! Progress tracking for the daily challenge

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::storage::{LocalStore, keys};

/// Completed, attempted and missed days
///
/// Stored as three JSON arrays of ISO dates. `completed` is always a subset of
/// `attempted`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSets {
    pub completed: Vec<NaiveDate>,
    pub attempted: Vec<NaiveDate>,
    pub missed: Vec<NaiveDate>,
}

impl ProgressSets {
    /// Hydrate from storage; absent keys read as empty
    pub fn load(store: &LocalStore) -> Self {
        Self {
            completed: store.get_json(keys::COMPLETED).unwrap_or_default(),
            attempted: store.get_json(keys::ATTEMPTED).unwrap_or_default(),
            missed: store.get_json(keys::MISSED).unwrap_or_default(),
        }
    }

    /// Write all three sets in a single flush
    pub fn save(&self, store: &mut LocalStore) -> Result<()> {
        store.set_json_all(&[
            (keys::COMPLETED, &self.completed),
            (keys::ATTEMPTED, &self.attempted),
            (keys::MISSED, &self.missed),
        ])
    }

    /// Record a fully correct submission
    pub fn record_completion(&mut self, date: NaiveDate) {
        if !self.completed.contains(&date) {
            self.completed.push(date);
        }
        self.record_attempt(date);
    }

    /// Record a submission the server accepted
    pub fn record_attempt(&mut self, date: NaiveDate) {
        if !self.attempted.contains(&date) {
            self.attempted.push(date);
        }
    }

    /// Replace attempted days with the server's list, keeping local completions
    pub fn merge_remote_attempted(&mut self, remote: impl IntoIterator<Item = NaiveDate>) {
        let mut merged: BTreeSet<NaiveDate> = remote.into_iter().collect();
        merged.extend(self.completed.iter().copied());
        self.attempted = merged.into_iter().collect();
    }

    /// Attempted days as a set, for the day-status calculator
    pub fn attempted_set(&self) -> BTreeSet<NaiveDate> {
        self.attempted.iter().copied().collect()
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.completed.contains(&date)
    }

    /// Most recent completion date
    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.completed.iter().max().copied()
    }
}

/// Load the program start date
pub fn load_signup_date(store: &LocalStore) -> Option<NaiveDate> {
    store.get_json(keys::SIGNUP_DATE)
}

/// Persist the program start date
pub fn save_signup_date(store: &mut LocalStore, date: NaiveDate) -> Result<()> {
    store.set_json(keys::SIGNUP_DATE, &date)
}
