//! Storage layer for trakr.
//!
//! Persists trackers and their completion histories in a single SQLite
//! database, with a JSON backup format for export/import.
//!
//! # Example
//!
//! ```ignore
//! use trakr::store::TrackerStore;
//! use trakr::domain::CompletionRecord;
//! use std::path::Path;
//!
//! let mut store = TrackerStore::open_at(Path::new("/path/to/data"))?;
//!
//! let tracker = store.create_tracker("water plants", 2.0)?;
//! store.record_completion(tracker.id, CompletionRecord::at(chrono::Utc::now()))?;
//!
//! let all = store.list_all()?;
//! ```

mod tracker_store;

pub use tracker_store::TrackerStore;
