//! Database repository layer
//!
//! Provides the habit store (habits + completions) and the report store
//! (weekly reports) on top of a single SQLite connection.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

const DATE_FMT: &str = "%Y-%m-%d";

/// Partial update for a habit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct HabitUpdate {
    /// New name
    pub name: Option<String>,
    /// New description (`Some(None)` clears it)
    pub description: Option<Option<String>>,
    /// New active flag
    pub is_active: Option<bool>,
}

/// Database handle with a single shared connection.
///
/// The `Mutex` serializes all store access within the process, so dashboard
/// reads stay consistent while completions are being toggled concurrently.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Habit operations
    // ============================================

    /// Create a new habit; returns the stored row
    pub fn create_habit(&self, name: &str, description: Option<&str>) -> Result<Habit> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO habits (name, description, created_at, is_active)
             VALUES (?1, ?2, ?3, 1)",
            params![name, description, created_at.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Habit {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at,
            is_active: true,
        })
    }

    /// Get a habit by ID
    pub fn get_habit(&self, id: i64) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM habits WHERE id = ?", [id], Self::row_to_habit)
            .optional()
            .map_err(Error::from)
    }

    /// List all active habits, oldest first
    pub fn list_active_habits(&self) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM habits WHERE is_active = 1 ORDER BY id")?;
        let habits = stmt
            .query_map([], Self::row_to_habit)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(habits)
    }

    /// List habits; optionally include deactivated ones
    pub fn list_habits(&self, include_inactive: bool) -> Result<Vec<Habit>> {
        if !include_inactive {
            return self.list_active_habits();
        }
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM habits ORDER BY id")?;
        let habits = stmt
            .query_map([], Self::row_to_habit)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(habits)
    }

    /// Apply a partial update to a habit; returns the updated row
    pub fn update_habit(&self, id: i64, update: &HabitUpdate) -> Result<Habit> {
        {
            let conn = self.conn.lock().unwrap();

            if let Some(name) = &update.name {
                conn.execute("UPDATE habits SET name = ?1 WHERE id = ?2", params![name, id])?;
            }
            if let Some(description) = &update.description {
                conn.execute(
                    "UPDATE habits SET description = ?1 WHERE id = ?2",
                    params![description, id],
                )?;
            }
            if let Some(is_active) = update.is_active {
                conn.execute(
                    "UPDATE habits SET is_active = ?1 WHERE id = ?2",
                    params![is_active, id],
                )?;
            }
        }

        self.get_habit(id)?.ok_or(Error::HabitNotFound(id))
    }

    /// Hard-delete a habit; its completions cascade.
    ///
    /// Returns false if no such habit existed.
    pub fn delete_habit(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM habits WHERE id = ?", [id])?;
        Ok(deleted > 0)
    }

    fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
        let created_at_str: String = row.get("created_at")?;

        Ok(Habit {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            is_active: row.get("is_active")?,
        })
    }

    // ============================================
    // Completion operations
    // ============================================

    /// Toggle the completion for (habit, date): delete the row if present,
    /// insert one otherwise. Returns the new completed state.
    ///
    /// The UNIQUE(habit_id, completed_date) constraint keeps this idempotent
    /// under concurrent toggles: two racing inserts cannot produce two rows.
    pub fn toggle_completion(&self, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let conn = self.conn.lock().unwrap();

        let exists: i32 = conn
            .query_row("SELECT COUNT(*) FROM habits WHERE id = ?", [habit_id], |r| {
                r.get(0)
            })?;
        if exists == 0 {
            return Err(Error::HabitNotFound(habit_id));
        }

        let date_str = date.format(DATE_FMT).to_string();
        let deleted = conn.execute(
            "DELETE FROM completions WHERE habit_id = ?1 AND completed_date = ?2",
            params![habit_id, date_str],
        )?;
        if deleted > 0 {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO completions (habit_id, completed_date, completed_at)
             VALUES (?1, ?2, ?3)",
            params![habit_id, date_str, Utc::now().to_rfc3339()],
        )?;
        Ok(true)
    }

    /// Distinct completion dates for a habit, ascending, optionally bounded
    /// by an inclusive date range
    pub fn list_completion_dates(
        &self,
        habit_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT completed_date FROM completions
             WHERE habit_id = ?1
               AND (?2 IS NULL OR completed_date >= ?2)
               AND (?3 IS NULL OR completed_date <= ?3)
             ORDER BY completed_date",
        )?;

        let from_str = from.map(|d| d.format(DATE_FMT).to_string());
        let to_str = to.map(|d| d.format(DATE_FMT).to_string());

        let dates = stmt
            .query_map(params![habit_id, from_str, to_str], |row| {
                row.get::<_, String>(0)
            })?
            .filter_map(|r| r.ok())
            .filter_map(|s| NaiveDate::parse_from_str(&s, DATE_FMT).ok())
            .collect();
        Ok(dates)
    }

    /// Count completions for a habit, optionally bounded by an inclusive
    /// date range
    pub fn count_completions(
        &self,
        habit_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();

        let from_str = from.map(|d| d.format(DATE_FMT).to_string());
        let to_str = to.map(|d| d.format(DATE_FMT).to_string());

        let count = conn.query_row(
            "SELECT COUNT(*) FROM completions
             WHERE habit_id = ?1
               AND (?2 IS NULL OR completed_date >= ?2)
               AND (?3 IS NULL OR completed_date <= ?3)",
            params![habit_id, from_str, to_str],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count completions across all habits dated exactly `date`
    pub fn count_completions_on(&self, date: NaiveDate) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM completions WHERE completed_date = ?",
            [date.format(DATE_FMT).to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ============================================
    // Report operations
    // ============================================

    /// Find the report for a given week start, if one was generated
    pub fn find_report(&self, week_start: NaiveDate) -> Result<Option<WeeklyReport>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM weekly_reports WHERE week_start = ?",
            [week_start.format(DATE_FMT).to_string()],
            Self::row_to_report,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Persist a new weekly report; returns the stored row.
    ///
    /// Fails with a constraint violation if a report for the same week_start
    /// already exists (the caller resolves that as first-writer-wins).
    pub fn save_report(&self, report: &NewWeeklyReport) -> Result<WeeklyReport> {
        let conn = self.conn.lock().unwrap();
        let generated_at = Utc::now();
        let report_data = serde_json::json!({ "habit_reports": report.habit_reports });

        conn.execute(
            "INSERT INTO weekly_reports
                 (week_start, week_end, total_habits, total_completions,
                  overall_score, report_data, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                report.week_start.format(DATE_FMT).to_string(),
                report.week_end.format(DATE_FMT).to_string(),
                report.total_habits,
                report.total_completions,
                report.overall_score,
                report_data.to_string(),
                generated_at.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        Ok(WeeklyReport {
            id,
            week_start: report.week_start,
            week_end: report.week_end,
            total_habits: report.total_habits,
            total_completions: report.total_completions,
            overall_score: report.overall_score,
            habit_reports: report.habit_reports.clone(),
            generated_at,
        })
    }

    /// Most recently generated report, if any
    pub fn latest_report(&self) -> Result<Option<WeeklyReport>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM weekly_reports ORDER BY generated_at DESC LIMIT 1",
            [],
            Self::row_to_report,
        )
        .optional()
        .map_err(Error::from)
    }

    /// All reports, most recently generated first
    pub fn list_reports(&self) -> Result<Vec<WeeklyReport>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM weekly_reports ORDER BY generated_at DESC")?;
        let reports = stmt
            .query_map([], Self::row_to_report)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(reports)
    }

    fn row_to_report(row: &Row) -> rusqlite::Result<WeeklyReport> {
        let week_start_str: String = row.get("week_start")?;
        let week_end_str: String = row.get("week_end")?;
        let generated_at_str: String = row.get("generated_at")?;
        let report_data_str: Option<String> = row.get("report_data")?;

        let habit_reports = report_data_str
            .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok())
            .and_then(|v| serde_json::from_value(v["habit_reports"].clone()).ok())
            .unwrap_or_default();

        Ok(WeeklyReport {
            id: row.get("id")?,
            week_start: NaiveDate::parse_from_str(&week_start_str, DATE_FMT)
                .unwrap_or_default(),
            week_end: NaiveDate::parse_from_str(&week_end_str, DATE_FMT).unwrap_or_default(),
            total_habits: row.get("total_habits")?,
            total_completions: row.get("total_completions")?,
            overall_score: row.get("overall_score")?,
            habit_reports,
            generated_at: DateTime::parse_from_rfc3339(&generated_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
