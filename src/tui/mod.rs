//! Terminal User Interface for trakr.
//!
//! This module provides a k9s-style terminal interface with two views:
//! - **List**: Paged tracker table, ranked and urgency-colored
//! - **Detail**: One tracker's history, statistics, and forecast
//!
//! The TUI runs as part of the main process using tokio for async operations.

mod app;
mod events;
mod input;
mod runner;
mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use input::TextInput;
pub use runner::TuiRunner;
pub use state::{AppState, InteractionMode, PendingAction, PromptKind, View};

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode.
///
/// Enables raw mode and switches to the alternate screen.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
///
/// Disables raw mode and leaves the alternate screen.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Urgency colors inspired by k9s.
pub mod colors {
    use ratatui::style::Color;

    pub const OVERDUE: Color = Color::Rgb(255, 140, 0); // Dark orange
    pub const DUE: Color = Color::Rgb(255, 215, 0); // Gold
    pub const NOT_YET: Color = Color::Rgb(135, 206, 250); // Light sky blue
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const DIM: Color = Color::DarkGray;
}
