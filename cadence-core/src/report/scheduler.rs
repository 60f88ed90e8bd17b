//! Background scheduler for the weekly report job.
//!
//! A process-owned component with an explicit start/stop lifecycle and a
//! single registered task: generating the weekly report at week's end
//! (Sunday 23:59 local). The store handle is injected at start; duplicate or
//! late fires are absorbed by the generator's idempotency guard.

use chrono::{Datelike, Duration, Local, NaiveDateTime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use super::{ReportGenerator, ReportOutcome};
use crate::db::Database;

/// How finely the scheduler thread slices its sleeps, so `stop` stays
/// responsive even with long poll intervals.
const SLEEP_SLICE: StdDuration = StdDuration::from_millis(200);

/// Handle to the running scheduler thread.
pub struct Scheduler {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn the scheduler thread.
    ///
    /// `poll` controls how often the thread checks whether the weekly job is
    /// due; the fire time itself is computed from the calendar, not the poll.
    pub fn start(db: Arc<Database>, poll: StdDuration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = thread::spawn(move || run_loop(db, flag, poll));

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Signal the thread to stop and wait for it to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether the scheduler thread is still running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn run_loop(db: Arc<Database>, running: Arc<AtomicBool>, poll: StdDuration) {
    let mut next_fire = next_fire_after(Local::now().naive_local());
    tracing::info!(%next_fire, "Report scheduler started");

    while running.load(Ordering::SeqCst) {
        let now = Local::now().naive_local();
        if now >= next_fire {
            run_task(&db);
            next_fire = next_fire_after(now);
            tracing::info!(%next_fire, "Next report scheduled");
        }

        sleep_while_running(&running, poll);
    }

    tracing::info!("Report scheduler stopped");
}

fn run_task(db: &Database) {
    match ReportGenerator::new(db).generate() {
        Ok(ReportOutcome::Generated(report)) => {
            tracing::info!(
                week_start = %report.week_start,
                total_habits = report.total_habits,
                "Scheduled report generated"
            );
        }
        Ok(ReportOutcome::AlreadyExists(report)) => {
            tracing::debug!(week_start = %report.week_start, "Report already existed");
        }
        Ok(ReportOutcome::NoActiveHabits) => {
            tracing::info!("No active habits, nothing to report");
        }
        Err(e) => {
            // Leave the job for the next fire; generation is retry-safe
            tracing::error!(error = %e, "Scheduled report generation failed");
        }
    }
}

/// Next Sunday 23:59 strictly after `now`, in local naive time.
fn next_fire_after(now: NaiveDateTime) -> NaiveDateTime {
    let days_until_sunday = 6 - now.date().weekday().num_days_from_monday();
    let mut fire = (now.date() + Duration::days(days_until_sunday as i64))
        .and_hms_opt(23, 59, 0)
        .expect("valid wall-clock time");
    if fire <= now {
        fire += Duration::days(7);
    }
    fire
}

fn sleep_while_running(running: &AtomicBool, total: StdDuration) {
    let mut slept = StdDuration::ZERO;
    while slept < total && running.load(Ordering::SeqCst) {
        let slice = SLEEP_SLICE.min(total - slept);
        thread::sleep(slice);
        slept += slice;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_next_fire_is_upcoming_sunday() {
        // Wednesday afternoon fires the same week's Sunday
        let fire = next_fire_after(dt("2026-08-05 14:00"));
        assert_eq!(fire, dt("2026-08-09 23:59"));
    }

    #[test]
    fn test_fire_on_sunday_before_deadline() {
        let fire = next_fire_after(dt("2026-08-09 10:00"));
        assert_eq!(fire, dt("2026-08-09 23:59"));
    }

    #[test]
    fn test_fire_on_sunday_after_deadline_rolls_over() {
        let fire = next_fire_after(dt("2026-08-09 23:59"));
        assert_eq!(fire, dt("2026-08-16 23:59"));
    }

    #[test]
    fn test_fire_dates_are_sundays() {
        for day in 1..=28 {
            let now = NaiveDate::from_ymd_opt(2026, 8, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            let fire = next_fire_after(now);
            assert_eq!(fire.date().weekday(), chrono::Weekday::Sun);
            assert!(fire > now);
        }
    }

    #[test]
    fn test_start_and_stop() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.migrate().unwrap();

        let mut scheduler = Scheduler::start(db, StdDuration::from_millis(50));
        assert!(scheduler.is_running());

        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
