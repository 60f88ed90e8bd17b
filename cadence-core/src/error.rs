//! Error types for cadence-core

use thiserror::Error;

/// Main error type for the cadence-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Habit not found
    #[error("habit not found: {0}")]
    HabitNotFound(i64),

    /// No weekly report stored for the requested week
    #[error("weekly report not found")]
    ReportNotFound,

    /// Malformed date input, rejected before any computation
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Result type alias for cadence-core
pub type Result<T> = std::result::Result<T, Error>;
