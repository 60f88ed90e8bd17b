//! # cadence-core
//!
//! Core library for cadence - a daily habit tracker.
//!
//! This library provides:
//! - Domain types for habits, completions, and weekly reports
//! - Database storage layer with SQLite
//! - Analytics: streaks, consistency scoring, health tiers, dashboard
//! - Weekly report generation with an idempotent scheduler
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! The store ([`Database`]) holds habits and their completion events. The
//! analytics engine derives metrics from completion history on demand; the
//! report generator snapshots those metrics into one immutable report per
//! calendar week, guarded against duplicate generation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cadence_core::{Config, Database, StatsEngine};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! // Derive metrics
//! let dashboard = StatsEngine::new(&db).dashboard().expect("failed to build dashboard");
//! println!("overall score: {}", dashboard.overall_score);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{DashboardData, HabitHealth, HabitStats, HealthLevel, HistoryDay, StatsEngine};
pub use config::Config;
pub use db::{Database, HabitUpdate};
pub use error::{Error, Result};
pub use report::{ReportGenerator, ReportOutcome, Scheduler};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod report;
pub mod types;
