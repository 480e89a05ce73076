//! TUI Runner - main event loop.
//!
//! The `TuiRunner` owns the terminal, app, event handler, and store. It
//! runs the main loop: render → handle events → apply actions → repeat.

use chrono::Utc;
use eyre::{Context, Result};
use log::info;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::PendingAction;
use super::views::render;
use crate::config::{Config, TimeConfig};
use crate::parse::parse_completion;
use crate::store::TrackerStore;

/// Main TUI runner that owns the event loop.
pub struct TuiRunner {
    /// The terminal instance
    terminal: Tui,
    /// Application state and key handling
    app: App,
    /// Event handler for keyboard and tick events
    event_handler: EventHandler,
    /// Tracker store for persistence
    store: TrackerStore,
    /// Date/time parsing preferences for the completion prompt
    time: TimeConfig,
    /// Sigma assigned to trackers created from the add prompt
    default_sigma: f64,
}

impl TuiRunner {
    /// Create a new TUI runner.
    pub fn new(terminal: Tui, store: TrackerStore, config: &Config) -> Self {
        Self {
            terminal,
            app: App::new(config.tui.page_size),
            event_handler: EventHandler::new(config.tui.tick_rate_ms),
            store,
            time: config.time,
            default_sigma: config.forecast.default_sigma,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI main loop");
        self.refresh_state()?;

        loop {
            self.terminal
                .draw(|frame| render(self.app.state(), frame))?;

            match self.event_handler.next().await? {
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                    self.process_pending_action()?;
                }
                Event::Tick => self.refresh_state()?,
                Event::Resize(_, _) => {}
            }

            if self.app.state().should_quit {
                break;
            }
        }

        info!("TUI main loop ended");
        Ok(())
    }

    /// Reload trackers from the store and re-derive everything against now.
    fn refresh_state(&mut self) -> Result<()> {
        let now = Utc::now();
        let trackers = self
            .store
            .list_all()
            .context("failed to load trackers from store")?;
        self.app.state_mut().update_trackers(trackers, now);
        Ok(())
    }

    /// Apply any action queued by the key handlers.
    fn process_pending_action(&mut self) -> Result<()> {
        let Some(action) = self.app.state_mut().pending_action.take() else {
            return Ok(());
        };

        let status = match apply_action(&mut self.store, &self.time, self.default_sigma, action) {
            Ok(message) => message,
            Err(e) => e.to_string(),
        };
        self.app.state_mut().set_status(status);
        self.refresh_state()
    }
}

/// Apply a queued action against the store, returning the status line.
///
/// Input validation failures return their message directly; store and
/// parse failures propagate as errors.
fn apply_action(
    store: &mut TrackerStore,
    time: &TimeConfig,
    default_sigma: f64,
    action: PendingAction,
) -> crate::error::Result<String> {
    match action {
        PendingAction::AddTracker(name) => {
            let tracker = store.create_tracker(&name, default_sigma)?;
            Ok(format!("added '{}'", tracker.name))
        }
        PendingAction::RecordCompletion { id, text } => {
            let text = text.trim();
            let text = if text.is_empty() { "now" } else { text };
            let record = parse_completion(text, time, Utc::now())?;
            let tracker = store.record_completion(id, record)?;
            Ok(format!("recorded completion for '{}'", tracker.name))
        }
        PendingAction::Rename { id, name } => {
            let tracker = store.rename(id, &name)?;
            Ok(format!("renamed to '{}'", tracker.name))
        }
        PendingAction::SetSigma { id, text } => {
            let Ok(sigma) = text.trim().parse::<f64>() else {
                return Ok(format!("invalid sigma: {text}"));
            };
            if !sigma.is_finite() || sigma < 0.0 {
                return Ok(format!("sigma must be >= 0, got {sigma}"));
            }
            let tracker = store.set_sigma(id, sigma)?;
            Ok(format!("sigma set to {} for '{}'", sigma, tracker.name))
        }
        PendingAction::DeleteTracker(id) => {
            let tracker = store.get(id)?;
            store.delete_tracker(id)?;
            Ok(format!("deleted '{}'", tracker.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, TrackerStore) {
        let dir = TempDir::new().unwrap();
        let store = TrackerStore::open_at(dir.path()).unwrap();
        (dir, store)
    }

    fn apply(store: &mut TrackerStore, action: PendingAction) -> crate::error::Result<String> {
        apply_action(store, &TimeConfig::default(), 2.0, action)
    }

    #[test]
    fn test_add_tracker_action() {
        let (_dir, mut store) = temp_store();
        let status = apply(&mut store, PendingAction::AddTracker("gym".to_string())).unwrap();
        assert_eq!(status, "added 'gym'");
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_add_tracker_rejects_blank_name() {
        let (_dir, mut store) = temp_store();
        let err = apply(&mut store, PendingAction::AddTracker("   ".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "Tracker name cannot be empty");
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_rename_rejects_blank_name() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();

        let err = apply(
            &mut store,
            PendingAction::Rename {
                id: tracker.id,
                name: "  ".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Tracker name cannot be empty");
        assert_eq!(store.get(tracker.id).unwrap().name, "gym");
    }

    #[test]
    fn test_record_defaults_to_now() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();

        let before = Utc::now();
        let status = apply(
            &mut store,
            PendingAction::RecordCompletion {
                id: tracker.id,
                text: String::new(),
            },
        )
        .unwrap();
        assert_eq!(status, "recorded completion for 'gym'");

        let tracker = store.get(tracker.id).unwrap();
        assert_eq!(tracker.history.len(), 1);
        assert!(tracker.history[0].completed_at >= before);
    }

    #[test]
    fn test_record_with_adjustment() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();

        apply(
            &mut store,
            PendingAction::RecordCompletion {
                id: tracker.id,
                text: "2025-06-10 09:30, 2h".to_string(),
            },
        )
        .unwrap();

        let tracker = store.get(tracker.id).unwrap();
        assert_eq!(tracker.history[0].adjustment, Duration::hours(2));
    }

    #[test]
    fn test_record_bad_expression_errors() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();

        let err = apply(
            &mut store,
            PendingAction::RecordCompletion {
                id: tracker.id,
                text: "whenever".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unrecognized date/time"));
    }

    #[test]
    fn test_record_missing_tracker_errors() {
        let (_dir, mut store) = temp_store();
        let err = apply(
            &mut store,
            PendingAction::RecordCompletion {
                id: 42,
                text: String::new(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_rename_action() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();
        let status = apply(
            &mut store,
            PendingAction::Rename {
                id: tracker.id,
                name: "weights".to_string(),
            },
        )
        .unwrap();
        assert_eq!(status, "renamed to 'weights'");
        assert_eq!(store.get(tracker.id).unwrap().name, "weights");
    }

    #[test]
    fn test_set_sigma_action() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();

        let status = apply(
            &mut store,
            PendingAction::SetSigma {
                id: tracker.id,
                text: "1.5".to_string(),
            },
        )
        .unwrap();
        assert_eq!(status, "sigma set to 1.5 for 'gym'");
        assert_eq!(store.get(tracker.id).unwrap().sigma, 1.5);
    }

    #[test]
    fn test_set_sigma_rejects_garbage() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();

        let status = apply(
            &mut store,
            PendingAction::SetSigma {
                id: tracker.id,
                text: "lots".to_string(),
            },
        )
        .unwrap();
        assert_eq!(status, "invalid sigma: lots");

        let status = apply(
            &mut store,
            PendingAction::SetSigma {
                id: tracker.id,
                text: "-1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(status, "sigma must be >= 0, got -1");
        assert_eq!(store.get(tracker.id).unwrap().sigma, 2.0);
    }

    #[test]
    fn test_delete_action() {
        let (_dir, mut store) = temp_store();
        let tracker = store.create_tracker("gym", 2.0).unwrap();

        let status = apply(&mut store, PendingAction::DeleteTracker(tracker.id)).unwrap();
        assert_eq!(status, "deleted 'gym'");
        assert!(store.get(tracker.id).is_err());
    }
}
