//! Per-habit and cross-habit stat aggregation.
//!
//! Composes the streak, consistency, and health calculators into snapshot
//! records for a single habit, the dashboard, and the calendar history view.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

use super::consistency::{consistency_score, effective_window_start, round1};
use super::health::HabitHealth;
use super::streaks::{current_streak, longest_streak};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::Habit;

/// Snapshot of one habit's derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct HabitStats {
    /// The habit itself
    pub habit: Habit,
    /// Consecutive completed days ending at (or just before) today
    pub current_streak: u32,
    /// Longest run of consecutive completed days ever
    pub longest_streak: u32,
    /// Consistency score over the trailing window, one decimal
    pub consistency_score: f64,
    /// Health tier derived from the consistency score
    pub health: HabitHealth,
    /// All-time completion count
    pub total_completions: i64,
}

/// Aggregate data for the dashboard view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    /// Stats for every active habit
    pub habits: Vec<HabitStats>,
    /// Mean consistency score across active habits (0.0 if none), one decimal
    pub overall_score: f64,
    /// Health tier for the overall score
    pub overall_health: HabitHealth,
    /// Number of active habits
    pub total_habits: i64,
    /// Completions dated exactly today, across all habits
    pub today_completions: i64,
    /// The evaluation date
    pub date: NaiveDate,
}

/// One day in a habit's calendar history.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HistoryDay {
    /// Calendar date
    pub date: NaiveDate,
    /// Whether a completion exists for that date
    pub completed: bool,
}

/// Today's date in the local timezone.
pub(crate) fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Read-only aggregator over the habit store.
///
/// Holds an explicit store handle; every method is a pure function of the
/// store contents and the evaluation date.
pub struct StatsEngine<'a> {
    db: &'a Database,
    window_days: u32,
}

impl<'a> StatsEngine<'a> {
    /// Default consistency window, in days.
    pub const DEFAULT_WINDOW_DAYS: u32 = 30;

    /// Create an engine with the default 30-day consistency window
    pub fn new(db: &'a Database) -> Self {
        Self::with_window(db, Self::DEFAULT_WINDOW_DAYS)
    }

    /// Create an engine with a custom consistency window
    pub fn with_window(db: &'a Database, window_days: u32) -> Self {
        Self { db, window_days }
    }

    /// Comprehensive stats for one habit, evaluated at today's date
    pub fn habit_stats(&self, habit_id: i64) -> Result<HabitStats> {
        self.habit_stats_at(habit_id, local_today())
    }

    /// Comprehensive stats for one habit, evaluated at `today`
    pub fn habit_stats_at(&self, habit_id: i64, today: NaiveDate) -> Result<HabitStats> {
        let habit = self
            .db
            .get_habit(habit_id)?
            .ok_or(Error::HabitNotFound(habit_id))?;

        let dates = self.db.list_completion_dates(habit_id, None, None)?;
        let date_set: HashSet<NaiveDate> = dates.iter().copied().collect();

        let score = self.score_at(&habit, today)?;

        Ok(HabitStats {
            current_streak: current_streak(&date_set, today),
            longest_streak: longest_streak(&dates),
            consistency_score: score,
            health: HabitHealth::from_score(score),
            total_completions: dates.len() as i64,
            habit,
        })
    }

    /// Consistency score for a habit over the engine's window
    fn score_at(&self, habit: &Habit, today: NaiveDate) -> Result<f64> {
        let effective_start =
            effective_window_start(today, self.window_days, habit.created_at.date_naive());
        let completions =
            self.db
                .count_completions(habit.id, Some(effective_start), Some(today))?;
        Ok(consistency_score(completions, effective_start, today))
    }

    /// Everything the dashboard needs, evaluated at today's date
    pub fn dashboard(&self) -> Result<DashboardData> {
        self.dashboard_at(local_today())
    }

    /// Everything the dashboard needs, evaluated at `today`
    pub fn dashboard_at(&self, today: NaiveDate) -> Result<DashboardData> {
        let active = self.db.list_active_habits()?;

        let mut habits = Vec::with_capacity(active.len());
        for habit in &active {
            habits.push(self.habit_stats_at(habit.id, today)?);
        }

        let overall_score = if habits.is_empty() {
            0.0
        } else {
            let total: f64 = habits.iter().map(|s| s.consistency_score).sum();
            round1(total / habits.len() as f64)
        };

        Ok(DashboardData {
            overall_score,
            overall_health: HabitHealth::from_score(overall_score),
            total_habits: habits.len() as i64,
            today_completions: self.db.count_completions_on(today)?,
            date: today,
            habits,
        })
    }

    /// Calendar history for a habit: one record per day from `today - days`
    /// through `today` inclusive, with absent days materialized as
    /// `completed: false`
    pub fn history(&self, habit_id: i64, days: u32) -> Result<Vec<HistoryDay>> {
        self.history_at(habit_id, days, local_today())
    }

    /// Calendar history evaluated at `today`
    pub fn history_at(
        &self,
        habit_id: i64,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<HistoryDay>> {
        if self.db.get_habit(habit_id)?.is_none() {
            return Err(Error::HabitNotFound(habit_id));
        }

        let start = today - Duration::days(days as i64);
        let completed: HashSet<NaiveDate> = self
            .db
            .list_completion_dates(habit_id, Some(start), Some(today))?
            .into_iter()
            .collect();

        let mut history = Vec::with_capacity(days as usize + 1);
        let mut date = start;
        while date <= today {
            history.push(HistoryDay {
                date,
                completed: completed.contains(&date),
            });
            date += Duration::days(1);
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::HealthLevel;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    /// Force a habit's creation timestamp so window clipping is deterministic
    fn backdate_habit(db: &Database, habit_id: i64, date: &str) {
        db.connection()
            .execute(
                "UPDATE habits SET created_at = ?1 WHERE id = ?2",
                rusqlite::params![format!("{}T00:00:00+00:00", date), habit_id],
            )
            .unwrap();
    }

    #[test]
    fn test_stats_for_unknown_habit() {
        let db = test_db();
        let engine = StatsEngine::new(&db);
        assert!(matches!(
            engine.habit_stats_at(99, d("2026-08-05")),
            Err(Error::HabitNotFound(99))
        ));
    }

    #[test]
    fn test_stats_with_no_completions() {
        let db = test_db();
        let habit = db.create_habit("Stretch", None).unwrap();
        backdate_habit(&db, habit.id, "2026-06-01");

        let stats = StatsEngine::new(&db)
            .habit_stats_at(habit.id, d("2026-08-05"))
            .unwrap();

        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.consistency_score, 0.0);
        assert_eq!(stats.health.status, HealthLevel::Critical);
        assert_eq!(stats.total_completions, 0);
    }

    #[test]
    fn test_stats_composes_all_metrics() {
        let db = test_db();
        let habit = db.create_habit("Run", None).unwrap();
        backdate_habit(&db, habit.id, "2026-06-01");

        let today = d("2026-08-05");
        for day in ["2026-08-03", "2026-08-04", "2026-08-05"] {
            db.toggle_completion(habit.id, d(day)).unwrap();
        }

        let stats = StatsEngine::new(&db).habit_stats_at(habit.id, today).unwrap();
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_completions, 3);
        // 3 of 31 inclusive window days
        assert_eq!(stats.consistency_score, 9.7);
    }

    #[test]
    fn test_new_habit_window_is_clipped() {
        let db = test_db();
        let habit = db.create_habit("Journal", None).unwrap();
        backdate_habit(&db, habit.id, "2026-08-01");

        let today = d("2026-08-05");
        for day in ["2026-08-01", "2026-08-02", "2026-08-03", "2026-08-04", "2026-08-05"] {
            db.toggle_completion(habit.id, d(day)).unwrap();
        }

        // 5 completions over a 5-day clipped window, not 5/31
        let stats = StatsEngine::new(&db).habit_stats_at(habit.id, today).unwrap();
        assert_eq!(stats.consistency_score, 100.0);
        assert_eq!(stats.health.status, HealthLevel::Excellent);
    }

    #[test]
    fn test_habit_created_today_scores_zero_not_sentinel() {
        let db = test_db();
        let habit = db.create_habit("New", None).unwrap();
        backdate_habit(&db, habit.id, "2026-08-05");

        let stats = StatsEngine::new(&db)
            .habit_stats_at(habit.id, d("2026-08-05"))
            .unwrap();
        assert_eq!(stats.consistency_score, 0.0);
    }

    #[test]
    fn test_dashboard_empty() {
        let db = test_db();
        let data = StatsEngine::new(&db).dashboard_at(d("2026-08-05")).unwrap();

        assert!(data.habits.is_empty());
        assert_eq!(data.overall_score, 0.0);
        assert_eq!(data.overall_health.status, HealthLevel::Critical);
        assert_eq!(data.total_habits, 0);
        assert_eq!(data.today_completions, 0);
        assert_eq!(data.date, d("2026-08-05"));
    }

    #[test]
    fn test_dashboard_aggregates_active_habits() {
        let db = test_db();
        let today = d("2026-08-05");

        // Two habits created 30+ days ago, each completed ~half the window
        for name in ["Run", "Read"] {
            let habit = db.create_habit(name, None).unwrap();
            backdate_habit(&db, habit.id, "2026-06-01");
            let mut date = d("2026-07-06");
            while date <= today {
                db.toggle_completion(habit.id, date).unwrap();
                date += Duration::days(2);
            }
        }

        // A deactivated habit must not count
        let inactive = db.create_habit("Old", None).unwrap();
        db.update_habit(
            inactive.id,
            &crate::db::HabitUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        let data = StatsEngine::new(&db).dashboard_at(today).unwrap();
        assert_eq!(data.total_habits, 2);
        assert_eq!(data.habits.len(), 2);
        // 16 of 31 days, both habits: mean equals the per-habit score
        assert_eq!(data.overall_score, 51.6);
        assert_eq!(data.overall_health.status, HealthLevel::Good);
        assert_eq!(data.today_completions, 2);
    }

    #[test]
    fn test_dashboard_mean_of_equal_scores() {
        let db = test_db();
        let today = d("2026-08-05");

        // Habits created 1 day ago with 1 of 2 window days completed: 50.0 each
        for i in 0..10 {
            let habit = db.create_habit(&format!("habit-{}", i), None).unwrap();
            backdate_habit(&db, habit.id, "2026-08-04");
            db.toggle_completion(habit.id, d("2026-08-04")).unwrap();
        }

        let data = StatsEngine::new(&db).dashboard_at(today).unwrap();
        assert_eq!(data.overall_score, 50.0);
        assert_eq!(data.overall_health.status, HealthLevel::Good);
    }

    #[test]
    fn test_history_materializes_full_range() {
        let db = test_db();
        let habit = db.create_habit("Walk", None).unwrap();
        let today = d("2026-08-05");

        db.toggle_completion(habit.id, d("2026-08-01")).unwrap();
        db.toggle_completion(habit.id, today).unwrap();

        let history = StatsEngine::new(&db)
            .history_at(habit.id, 7, today)
            .unwrap();

        // Inclusive of both endpoints: days + 1 records
        assert_eq!(history.len(), 8);
        assert_eq!(history[0].date, d("2026-07-29"));
        assert_eq!(history[7].date, today);

        for day in &history {
            let expected = day.date == d("2026-08-01") || day.date == today;
            assert_eq!(day.completed, expected, "wrong flag for {}", day.date);
        }
    }

    #[test]
    fn test_history_for_unknown_habit() {
        let db = test_db();
        assert!(matches!(
            StatsEngine::new(&db).history_at(5, 7, d("2026-08-05")),
            Err(Error::HabitNotFound(5))
        ));
    }
}
