//! trakr - due-date forecasting for recurring tasks
//!
//! trakr records when you actually complete recurring tasks and predicts
//! when each is due next from the trailing cadence of its own history.
//! Nothing derived is ever stored: intervals, window statistics, the
//! forecast, and urgency are recomputed on demand from the completion
//! log and the current time.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod format;
pub mod parse;
pub mod store;
pub mod tui;

pub use error::{Result, TrakrError};
