//! Error types for trakr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in trakr
#[derive(Debug, Error)]
pub enum TrakrError {
    /// Tracker not found in the store
    #[error("Tracker not found: {0}")]
    TrackerNotFound(String),

    /// A name selector matched more than one tracker
    #[error("Name matches multiple trackers: {0}")]
    AmbiguousTracker(String),

    /// Blank tracker name
    #[error("Tracker name cannot be empty")]
    EmptyName,

    /// Unparseable date/time input
    #[error("Unrecognized date/time: {0}")]
    DateParse(String),

    /// Unparseable period input
    #[error("Unrecognized period: {0}")]
    PeriodParse(String),

    /// History index out of range
    #[error("No completion at index {index} (history has {len} entries)")]
    HistoryIndex { index: usize, len: usize },

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for trakr operations
pub type Result<T> = std::result::Result<T, TrakrError>;
