//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS habits (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT NOT NULL,
        description      TEXT,
        created_at       DATETIME NOT NULL,
        is_active        INTEGER NOT NULL DEFAULT 1
    );

    -- One row per (habit, date); a row's presence means "completed that day".
    -- completed_at is the recording timestamp, which differs from
    -- completed_date when a completion is back-filled.
    CREATE TABLE IF NOT EXISTS completions (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        habit_id         INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
        completed_date   DATE NOT NULL,
        completed_at     DATETIME NOT NULL,

        UNIQUE(habit_id, completed_date)
    );

    -- Immutable weekly snapshots; UNIQUE(week_start) backs the
    -- check-then-insert idempotency guard in the report generator.
    CREATE TABLE IF NOT EXISTS weekly_reports (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        week_start        DATE NOT NULL UNIQUE,
        week_end          DATE NOT NULL,
        total_habits      INTEGER NOT NULL DEFAULT 0,
        total_completions INTEGER NOT NULL DEFAULT 0,
        overall_score     REAL NOT NULL DEFAULT 0.0,
        report_data       JSON,
        generated_at      DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_completions_habit_date
        ON completions(habit_id, completed_date);
    CREATE INDEX IF NOT EXISTS idx_completions_date ON completions(completed_date);
    CREATE INDEX IF NOT EXISTS idx_habits_active ON habits(is_active);
    CREATE INDEX IF NOT EXISTS idx_reports_generated
        ON weekly_reports(generated_at DESC);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
