//! Day status calculation for the challenge calendar
//!
//! Every date from the user's signup through a short lookahead past today gets
//! exactly one [`DayStatus`]. The dashboard renders these records and only lets
//! the user open a quiz for a record that is clickable.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days past today that are rendered (always locked)
pub const LOOKAHEAD_DAYS: i64 = 7;

/// Status of a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// After today, not yet available
    Future,
    /// Today and not yet attempted
    Today,
    /// A quiz was submitted for this day
    Completed,
    /// In the past and never attempted
    Missed,
}

impl DayStatus {
    /// Short label used in the legend and stats screen
    pub fn label(&self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Today => "today",
            Self::Completed => "completed",
            Self::Missed => "missed",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Computed status for one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub clickable: bool,
}

impl DayRecord {
    /// ISO `yyyy-MM-dd` key for this record
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Classify every day in `[signup, today + LOOKAHEAD_DAYS]`.
///
/// Order matters: a future date is never completed, and an attempted today is
/// reported as completed rather than today.
pub fn compute_day_statuses(
    signup: NaiveDate,
    attempted: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> Vec<DayRecord> {
    let last = today + Duration::days(LOOKAHEAD_DAYS);
    if signup > last {
        return Vec::new();
    }

    signup
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| classify(date, attempted, today))
        .collect()
}

fn classify(date: NaiveDate, attempted: &BTreeSet<NaiveDate>, today: NaiveDate) -> DayRecord {
    let (status, clickable) = if date > today {
        (DayStatus::Future, false)
    } else if attempted.contains(&date) {
        (DayStatus::Completed, false)
    } else if date == today {
        (DayStatus::Today, true)
    } else {
        (DayStatus::Missed, false)
    };

    DayRecord { date, status, clickable }
}

/// Dates classified as missed, in calendar order
pub fn missed_days(records: &[DayRecord]) -> Vec<NaiveDate> {
    records.iter().filter(|r| r.status == DayStatus::Missed).map(|r| r.date).collect()
}

/// Find the record for a date, if it falls in the window
pub fn record_for(records: &[DayRecord], date: NaiveDate) -> Option<&DayRecord> {
    records.binary_search_by_key(&date, |r| r.date).ok().map(|i| &records[i])
}

/// 1-based program day for a date (signup day is day 1)
pub fn day_number(signup: NaiveDate, date: NaiveDate) -> i64 {
    (date - signup).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn scenario_signup_week() {
        let attempted: BTreeSet<_> = [d("2025-01-02")].into_iter().collect();
        let records = compute_day_statuses(d("2025-01-01"), &attempted, d("2025-01-05"));

        assert_eq!(records.len(), 12);
        assert_eq!(records.first().unwrap().date, d("2025-01-01"));
        assert_eq!(records.last().unwrap().date, d("2025-01-12"));

        let status = |s: &str| record_for(&records, d(s)).map(|r| (r.status, r.clickable));
        assert_eq!(status("2025-01-01"), Some((DayStatus::Missed, false)));
        assert_eq!(status("2025-01-02"), Some((DayStatus::Completed, false)));
        assert_eq!(status("2025-01-03"), Some((DayStatus::Missed, false)));
        assert_eq!(status("2025-01-04"), Some((DayStatus::Missed, false)));
        assert_eq!(status("2025-01-05"), Some((DayStatus::Today, true)));
        for day in 6..=12 {
            let date = NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
            let record = record_for(&records, date).unwrap();
            assert_eq!((record.status, record.clickable), (DayStatus::Future, false));
        }
    }

    #[test]
    fn never_attempted_marks_every_past_day_missed() {
        let records = compute_day_statuses(d("2025-03-01"), &BTreeSet::new(), d("2025-03-04"));
        assert_eq!(missed_days(&records), vec![d("2025-03-01"), d("2025-03-02"), d("2025-03-03")]);
    }

    #[test]
    fn signup_after_window_is_empty() {
        let records = compute_day_statuses(d("2025-05-01"), &BTreeSet::new(), d("2025-04-01"));
        assert!(records.is_empty());
    }

    #[test]
    fn signup_in_lookahead_is_all_future() {
        let records = compute_day_statuses(d("2025-04-03"), &BTreeSet::new(), d("2025-04-01"));
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.status == DayStatus::Future && !r.clickable));
    }

    #[test]
    fn day_number_is_one_based() {
        assert_eq!(day_number(d("2025-01-01"), d("2025-01-01")), 1);
        assert_eq!(day_number(d("2025-01-01"), d("2025-01-15")), 15);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&DayStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    fn base() -> NaiveDate {
        d("2024-01-01")
    }

    prop_compose! {
        fn arb_inputs()(
            signup_offset in 0i64..120,
            span in 0i64..60,
            attempted in prop::collection::btree_set(0i64..200, 0..40),
        ) -> (NaiveDate, NaiveDate, BTreeSet<NaiveDate>) {
            let signup = base() + Duration::days(signup_offset);
            let today = signup + Duration::days(span);
            let attempted = attempted.into_iter().map(|o| base() + Duration::days(o)).collect();
            (signup, today, attempted)
        }
    }

    proptest! {
        #[test]
        fn one_record_per_day_without_gaps((signup, today, attempted) in arb_inputs()) {
            let records = compute_day_statuses(signup, &attempted, today);
            let expected = (today + Duration::days(LOOKAHEAD_DAYS) - signup).num_days() + 1;
            prop_assert_eq!(records.len() as i64, expected);
            prop_assert_eq!(records[0].date, signup);
            for pair in records.windows(2) {
                prop_assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
            }
        }

        #[test]
        fn completed_and_missed_are_locked((signup, today, attempted) in arb_inputs()) {
            for record in compute_day_statuses(signup, &attempted, today) {
                if matches!(record.status, DayStatus::Completed | DayStatus::Missed | DayStatus::Future) {
                    prop_assert!(!record.clickable);
                }
            }
        }

        #[test]
        fn today_clickable_iff_not_attempted((signup, today, mut attempted) in arb_inputs(), take in any::<bool>()) {
            if take {
                attempted.insert(today);
            } else {
                attempted.remove(&today);
            }
            let records = compute_day_statuses(signup, &attempted, today);
            let record = record_for(&records, today).unwrap();
            if take {
                prop_assert_eq!((record.status, record.clickable), (DayStatus::Completed, false));
            } else {
                prop_assert_eq!((record.status, record.clickable), (DayStatus::Today, true));
            }
        }

        #[test]
        fn at_most_one_clickable_day((signup, today, attempted) in arb_inputs()) {
            let records = compute_day_statuses(signup, &attempted, today);
            prop_assert!(records.iter().filter(|r| r.clickable).count() <= 1);
        }
    }
}
