//! Weekly report generation.
//!
//! Aggregates every active habit's in-week completions, 7-day consistency
//! score, current streak, and health tier into one immutable report per
//! calendar week. Generation is idempotent: a second request for a week that
//! already has a report returns the stored one unchanged.

pub mod scheduler;

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashSet;

use crate::analytics::{
    consistency_score, current_streak, effective_window_start, round1, HabitHealth,
};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{HabitReportEntry, NewWeeklyReport, WeeklyReport};

pub use scheduler::Scheduler;

/// Consistency window used for report entries, matching the report's span.
const REPORT_WINDOW_DAYS: u32 = 7;

/// Outcome of a report generation request.
#[derive(Debug)]
pub enum ReportOutcome {
    /// A new report was generated and persisted
    Generated(WeeklyReport),
    /// A report for this week already existed; it is returned unchanged
    AlreadyExists(WeeklyReport),
    /// No active habits: nothing to report (a no-op, not an error)
    NoActiveHabits,
}

impl ReportOutcome {
    /// The report, unless there was nothing to report
    pub fn report(&self) -> Option<&WeeklyReport> {
        match self {
            ReportOutcome::Generated(r) | ReportOutcome::AlreadyExists(r) => Some(r),
            ReportOutcome::NoActiveHabits => None,
        }
    }
}

/// Bounds of the week a report generated "today" covers.
///
/// `week_start` is the Monday of the week before the one containing `today`;
/// `week_end` is its Sunday, six days later. The arithmetic always targets
/// the previous completed week, never the in-progress one, matching a
/// trigger that fires at week's end.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_back = today.weekday().num_days_from_monday() as i64 + 7;
    let week_start = today - Duration::days(days_back);
    let week_end = week_start + Duration::days(6);
    (week_start, week_end)
}

/// Generates weekly reports against an injected store handle.
pub struct ReportGenerator<'a> {
    db: &'a Database,
}

impl<'a> ReportGenerator<'a> {
    /// Create a generator over the given store
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Generate the report for the week preceding today's date
    pub fn generate(&self) -> Result<ReportOutcome> {
        self.generate_at(crate::analytics::stats::local_today())
    }

    /// Generate the report for the week preceding `today`.
    ///
    /// Safe to retry and safe under duplicate triggers: an existing report
    /// for the target week is returned unchanged, and a lost insert race is
    /// resolved by re-reading the winner's row (first-writer-wins). Any
    /// persistence failure aborts the whole generation; no partial report is
    /// written.
    pub fn generate_at(&self, today: NaiveDate) -> Result<ReportOutcome> {
        let (week_start, week_end) = week_bounds(today);

        if let Some(existing) = self.db.find_report(week_start)? {
            tracing::debug!(%week_start, "Report already generated for week");
            return Ok(ReportOutcome::AlreadyExists(existing));
        }

        let habits = self.db.list_active_habits()?;
        if habits.is_empty() {
            tracing::info!(%week_start, "No active habits, skipping report");
            return Ok(ReportOutcome::NoActiveHabits);
        }

        let mut habit_reports = Vec::with_capacity(habits.len());
        let mut total_score = 0.0;
        let mut total_completions = 0i64;

        for habit in &habits {
            let completions =
                self.db
                    .count_completions(habit.id, Some(week_start), Some(week_end))?;

            let effective_start = effective_window_start(
                today,
                REPORT_WINDOW_DAYS,
                habit.created_at.date_naive(),
            );
            let window_completions =
                self.db
                    .count_completions(habit.id, Some(effective_start), Some(today))?;
            let consistency = consistency_score(window_completions, effective_start, today);

            let dates: HashSet<NaiveDate> = self
                .db
                .list_completion_dates(habit.id, None, None)?
                .into_iter()
                .collect();
            let streak = current_streak(&dates, today);

            let health = HabitHealth::from_score(consistency);

            habit_reports.push(HabitReportEntry {
                habit_id: habit.id,
                habit_name: habit.name.clone(),
                completions,
                consistency_score: consistency,
                streak,
                health_status: health.status,
            });
            total_score += consistency;
            total_completions += completions;
        }

        let overall_score = round1(total_score / habits.len() as f64);

        let new_report = NewWeeklyReport {
            week_start,
            week_end,
            total_habits: habits.len() as i64,
            total_completions,
            overall_score,
            habit_reports,
        };

        match self.db.save_report(&new_report) {
            Ok(report) => {
                tracing::info!(
                    %week_start,
                    total_habits = report.total_habits,
                    total_completions = report.total_completions,
                    overall_score = report.overall_score,
                    "Weekly report generated"
                );
                Ok(ReportOutcome::Generated(report))
            }
            Err(Error::Database(e)) if is_unique_violation(&e) => {
                // Lost the check-then-insert race; the first writer wins
                let existing = self
                    .db
                    .find_report(week_start)?
                    .ok_or(Error::ReportNotFound)?;
                Ok(ReportOutcome::AlreadyExists(existing))
            }
            Err(e) => Err(e),
        }
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
