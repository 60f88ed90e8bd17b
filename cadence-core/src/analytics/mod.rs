//! Analytics engine for cadence
//!
//! Pure derivations over a habit's completion history:
//! - Streaks (current, with the grace-day rule, and longest ever)
//! - Consistency scoring over a creation-clipped trailing window
//! - Health classification into discrete tiers
//! - Per-habit snapshots, dashboard aggregates, and calendar history
//!
//! The calculators in [`streaks`], [`consistency`], and [`health`] are pure
//! functions; [`stats::StatsEngine`] composes them over an injected store
//! handle.

pub mod consistency;
pub mod health;
pub mod stats;
pub mod streaks;

pub use consistency::{consistency_score, effective_window_start, round1};
pub use health::{HabitHealth, HealthLevel};
pub use stats::{DashboardData, HabitStats, HistoryDay, StatsEngine};
pub use streaks::{current_streak, longest_streak};
