//! Core domain types for cadence
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A named recurring activity the user intends to perform daily |
//! | **Completion** | A record that a habit was performed on a specific calendar date |
//! | **Streak** | A maximal run of consecutive calendar days with a completion |
//! | **Consistency score** | Percentage of days with a completion within an effective trailing window |
//! | **Health** | Discrete tier derived from a consistency score |
//! | **Weekly report** | Immutable aggregate snapshot of all active habits for one calendar week |
//!
//! A Completion's `completed_date` is a calendar date, distinct from the
//! `completed_at` timestamp: a completion can be back-filled for a past date.
//! There is at most one Completion per (habit, date).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::HealthLevel;
use crate::error::{Error, Result};

// ============================================
// Habit
// ============================================

/// A recurring activity tracked day by day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier (database rowid)
    pub id: i64,
    /// Display name
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// When the habit was created; clamps the consistency window
    pub created_at: DateTime<Utc>,
    /// Soft-deactivation flag; inactive habits are excluded from the
    /// dashboard and weekly reports but keep their history
    pub is_active: bool,
}

// ============================================
// Weekly report
// ============================================

/// Per-habit entry inside a weekly report.
///
/// Field names are part of the persisted format and must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitReportEntry {
    /// Habit identifier
    pub habit_id: i64,
    /// Habit name at generation time
    pub habit_name: String,
    /// Completions within the report week
    pub completions: i64,
    /// 7-day consistency score at generation time
    pub consistency_score: f64,
    /// Current streak at generation time
    pub streak: u32,
    /// Health tier derived from the consistency score
    pub health_status: HealthLevel,
}

/// Immutable snapshot of all active habits' metrics for one calendar week.
///
/// Keyed by `week_start` (Monday); spans exactly seven days ending on
/// `week_end` (Sunday). Generated once per week; duplicate generation
/// requests return the stored report unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// Unique identifier (database rowid)
    pub id: i64,
    /// Monday the report week begins on
    pub week_start: NaiveDate,
    /// Sunday the report week ends on (`week_start + 6`)
    pub week_end: NaiveDate,
    /// Number of active habits at generation time
    pub total_habits: i64,
    /// Summed completions across all habits within the week
    pub total_completions: i64,
    /// Mean consistency score across habits, one decimal
    pub overall_score: f64,
    /// Per-habit entries
    pub habit_reports: Vec<HabitReportEntry>,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
}

/// A weekly report that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewWeeklyReport {
    /// Monday the report week begins on
    pub week_start: NaiveDate,
    /// Sunday the report week ends on
    pub week_end: NaiveDate,
    /// Number of active habits at generation time
    pub total_habits: i64,
    /// Summed completions across all habits within the week
    pub total_completions: i64,
    /// Mean consistency score across habits, one decimal
    pub overall_score: f64,
    /// Per-habit entries
    pub habit_reports: Vec<HabitReportEntry>,
}

// ============================================
// Date helpers
// ============================================

/// Parse a user-supplied `YYYY-MM-DD` date string.
///
/// Malformed input is rejected with [`Error::InvalidDate`] before any
/// computation or storage access happens.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-08-05").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(parse_date("yesterday"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("2026-13-01"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("05/08/2026"), Err(Error::InvalidDate(_))));
    }
}
