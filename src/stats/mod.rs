//! Progress aggregation: completion percentage, streaks and achievements
//!
//! Everything here is a pure function of the progress sets. Nothing is cached
//! and achievement unlocks are never persisted.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::progress::ProgressSets;

/// Length of the challenge
pub const PROGRAM_DAYS: u32 = 15;

/// Minimum completed/attempted ratio for the certificate
pub const CERTIFICATE_MIN_RATE: f64 = 0.70;

/// How the total number of program days is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStrategy {
    /// Grow past 15 days when more days than that have elapsed since signup
    #[default]
    Extending,
    /// Always measure against 15 days
    Fixed,
}

impl ProgressStrategy {
    /// Total program days given the days elapsed since signup
    pub fn total_days(&self, elapsed_days: Option<u32>) -> u32 {
        match (self, elapsed_days) {
            (Self::Extending, Some(elapsed)) if elapsed > PROGRAM_DAYS => elapsed,
            _ => PROGRAM_DAYS,
        }
    }
}

/// A named badge with its unlock state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

/// Aggregated view of a user's progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_days: u32,
    pub completed_count: usize,
    pub attempted_count: usize,
    pub missed_count: usize,
    /// Attempted but not fully correct
    pub incomplete_count: usize,
    /// Program days not yet attempted
    pub remaining_count: usize,
    /// 0-100
    pub percent_complete: f64,
    /// 0-100, zero when nothing was attempted
    pub success_rate: f64,
    pub streak: u32,
    pub achievements: Vec<Achievement>,
}

impl ProgressSummary {
    /// Number of unlocked achievements
    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

/// Aggregate the progress sets.
///
/// `elapsed_days` is the inclusive number of days since signup, when known.
pub fn compute_progress(
    sets: &ProgressSets,
    strategy: ProgressStrategy,
    elapsed_days: Option<u32>,
) -> ProgressSummary {
    let completed: BTreeSet<NaiveDate> = sets.completed.iter().copied().collect();
    let attempted: BTreeSet<NaiveDate> = sets.attempted.iter().copied().collect();
    let missed: BTreeSet<NaiveDate> = sets.missed.iter().copied().collect();

    let total_days = strategy.total_days(elapsed_days);
    let completed_count = completed.len();
    let attempted_count = attempted.len();

    let percent_complete = completed_count as f64 / f64::from(total_days) * 100.0;
    let success_rate = if attempted_count > 0 {
        completed_count as f64 / attempted_count as f64 * 100.0
    } else {
        0.0
    };
    let streak = current_streak(&completed);

    let achievements = achievements(&AchievementInput {
        completed_count,
        attempted_count,
        streak,
    });

    ProgressSummary {
        total_days,
        completed_count,
        attempted_count,
        missed_count: missed.len(),
        incomplete_count: attempted_count.saturating_sub(completed_count),
        remaining_count: (total_days as usize).saturating_sub(attempted_count),
        percent_complete,
        success_rate,
        streak,
        achievements,
    }
}

/// Consecutive completed days ending at the most recent completion
pub fn current_streak(completed: &BTreeSet<NaiveDate>) -> u32 {
    let mut days = completed.iter().rev();
    let Some(mut previous) = days.next().copied() else {
        return 0;
    };

    let mut streak = 1;
    for &date in days {
        if previous.signed_duration_since(date).num_days() != 1 {
            break;
        }
        streak += 1;
        previous = date;
    }
    streak
}

/// Whether the completion certificate has been earned
pub fn certificate_eligible(completed_count: usize, attempted_count: usize) -> bool {
    if completed_count < PROGRAM_DAYS as usize || attempted_count == 0 {
        return false;
    }
    completed_count as f64 / attempted_count as f64 >= CERTIFICATE_MIN_RATE
}

/// Eligibility computed from the progress sets, counting each date once
pub fn certificate_eligible_for(sets: &ProgressSets) -> bool {
    let completed: BTreeSet<&NaiveDate> = sets.completed.iter().collect();
    let attempted: BTreeSet<&NaiveDate> = sets.attempted.iter().collect();
    certificate_eligible(completed.len(), attempted.len())
}

struct AchievementInput {
    completed_count: usize,
    attempted_count: usize,
    streak: u32,
}

fn badge(
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    unlocked: bool,
) -> Achievement {
    Achievement { name, description, icon, unlocked }
}

fn achievements(input: &AchievementInput) -> Vec<Achievement> {
    vec![
        badge("First Step", "Complete your first query", "🎯", input.completed_count >= 1),
        badge("On Fire", "3-day streak", "🔥", input.streak >= 3),
        badge("Half Way", "Complete 7+ queries", "⭐", input.completed_count >= 7),
        badge("Almost There", "Complete 10+ queries", "🚀", input.completed_count >= 10),
        badge(
            "Perfect Score",
            "100% success rate with 5+ attempts",
            "💯",
            input.attempted_count >= 5 && input.completed_count == input.attempted_count,
        ),
        badge(
            "Master",
            "Complete all 15 queries with a 70%+ success rate",
            "👑",
            certificate_eligible(input.completed_count, input.attempted_count),
        ),
    ]
}
