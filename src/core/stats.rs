//! Progress statistics.
//!
//! Everything here is a pure function of one snapshot and one instant, so a
//! single request can never mix counts from two different store states.

use crate::core::record::SessionRecord;
use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;

/// Length of the rolling "this week" window, in days.
pub const WEEK_DAYS: i64 = 7;

/// Aggregated session statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of sessions.
    pub total_sessions: usize,
    /// Sum of planned durations, in seconds.
    pub total_duration: u64,
    /// Mean planned duration in seconds, 0 when empty.
    pub average_session_duration: f64,
    /// Mean of `mood_after - mood_before`, 0 when empty.
    pub average_mood_improvement: f64,
    /// Sessions created in the 7×24h ending at `now`.
    pub sessions_this_week: usize,
    /// Sessions created on the local calendar day of `now`.
    pub sessions_today: usize,
}

impl Statistics {
    /// Calculate statistics from a snapshot as of `now`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Session counts and second totals stay far below 2^52
    pub fn compute(sessions: &[SessionRecord], now: DateTime<Utc>) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }

        let total_sessions = sessions.len();
        let total_duration: u64 = sessions.iter().map(|s| u64::from(s.fields.duration)).sum();
        let mood_sum: i64 = sessions.iter().map(|s| i64::from(s.mood_delta())).sum();

        let week_start = now - Duration::days(WEEK_DAYS);
        let sessions_this_week = sessions
            .iter()
            .filter(|s| s.created_at >= week_start)
            .count();

        let today = now.with_timezone(&Local).date_naive();
        let sessions_today = sessions
            .iter()
            .filter(|s| s.created_at.with_timezone(&Local).date_naive() == today)
            .count();

        Self {
            total_sessions,
            total_duration,
            average_session_duration: total_duration as f64 / total_sessions as f64,
            average_mood_improvement: mood_sum as f64 / total_sessions as f64,
            sessions_this_week,
            sessions_today,
        }
    }

    /// Fraction of today's goal reached, capped at 1.0.
    #[must_use]
    pub fn daily_progress(&self, daily_goal: u32) -> f64 {
        daily_progress(self.sessions_today, daily_goal)
    }
}

/// `min(sessions_today / daily_goal, 1.0)`, or 0 when the goal is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn daily_progress(sessions_today: usize, daily_goal: u32) -> f64 {
    if daily_goal == 0 {
        return 0.0;
    }
    (sessions_today as f64 / f64::from(daily_goal)).min(1.0)
}

/// Sessions still needed to reach the goal today.
#[must_use]
pub fn remaining_for_goal(sessions_today: usize, daily_goal: u32) -> usize {
    usize::try_from(daily_goal)
        .unwrap_or(usize::MAX)
        .saturating_sub(sessions_today)
}

/// Render seconds as `"45s"`, `"4m 30s"` or `"1h 05m"`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}
