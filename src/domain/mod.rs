//! Domain types for trakr
//!
//! This module contains the stored data model:
//! - CompletionRecord: one (timestamp, adjustment) pair in a tracker's history
//! - Tracker: a recurring task with its ordered history and settings
//!
//! Everything else (intervals, window statistics, forecasts, urgency) is
//! derived on demand by the forecast module and never persisted.

pub mod completion;
pub mod tracker;

pub use completion::CompletionRecord;
pub use tracker::{DEFAULT_SIGMA, Tracker};
