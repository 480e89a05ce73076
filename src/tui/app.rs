//! TUI Application
//!
//! Key dispatch layered over `AppState`. Handlers only mutate state and
//! queue pending actions; the runner applies them against the store.

use crossterm::event::{KeyCode, KeyModifiers};

use super::input::KeyEvent;
use super::state::{AppState, ConfirmDialog, InteractionMode, PendingAction, PromptKind, View};

/// The TUI application.
pub struct App {
    state: AppState,
}

impl App {
    /// Create an application with the given list page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: AppState::new(page_size),
        }
    }

    /// Immutable access to application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Mutable access to application state.
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event, returning true when the application should quit.
    pub fn handle_key(&mut self, event: crossterm::event::KeyEvent) -> bool {
        let key = KeyEvent::from(event);

        // Ctrl-C quits from any mode
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.state.should_quit = true;
            return true;
        }

        match self.state.interaction_mode.clone() {
            InteractionMode::Normal => self.handle_normal_key(&key),
            InteractionMode::Prompt(kind) => self.handle_prompt_key(&key, kind),
            InteractionMode::Confirm(dialog) => self.handle_confirm_key(&key, dialog),
            InteractionMode::Help => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
        }

        self.state.should_quit
    }

    fn handle_normal_key(&mut self, key: &KeyEvent) {
        if key.is_quit() {
            self.state.should_quit = true;
            return;
        }

        if key.char() == Some('?') {
            self.state.interaction_mode = InteractionMode::Help;
            return;
        }

        match self.state.current_view {
            View::List => self.handle_list_key(key),
            View::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_list_key(&mut self, key: &KeyEvent) {
        if key.is_up() {
            self.state.select_prev();
        } else if key.is_down() {
            self.state.select_next();
        } else if key.is_left() {
            self.state.prev_page();
        } else if key.is_right() {
            self.state.next_page();
        } else if key.is_enter() {
            if self.state.selected_entry().is_some() {
                self.state.current_view = View::Detail;
            }
        } else if let Some(c) = key.char() {
            self.handle_command_char(c);
        }
    }

    fn handle_detail_key(&mut self, key: &KeyEvent) {
        if key.is_escape() {
            self.state.current_view = View::List;
        } else if let Some(c) = key.char() {
            self.handle_command_char(c);
        }
    }

    /// Command keys shared by the list and detail views.
    fn handle_command_char(&mut self, c: char) {
        match c {
            'a' => self.state.open_prompt(PromptKind::AddTracker, None),
            'c' => {
                if let Some(id) = self.selected_id() {
                    self.state.open_prompt(PromptKind::RecordCompletion(id), None);
                }
            }
            'r' => {
                if let Some(entry) = self.state.selected_entry() {
                    let id = entry.tracker.id;
                    let name = entry.tracker.name.clone();
                    self.state.open_prompt(PromptKind::Rename(id), Some(&name));
                }
            }
            'g' => {
                if let Some(entry) = self.state.selected_entry() {
                    let id = entry.tracker.id;
                    let sigma = entry.tracker.sigma.to_string();
                    self.state.open_prompt(PromptKind::SetSigma(id), Some(&sigma));
                }
            }
            'd' => {
                if let Some(entry) = self.state.selected_entry() {
                    let dialog = ConfirmDialog {
                        message: format!(
                            "Delete '{}' and its history? (y/n)",
                            entry.tracker.name
                        ),
                        action: PendingAction::DeleteTracker(entry.tracker.id),
                    };
                    self.state.interaction_mode = InteractionMode::Confirm(dialog);
                }
            }
            's' => self.state.cycle_sort(),
            'v' => self.state.toggle_reverse(),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: &KeyEvent, kind: PromptKind) {
        if key.is_escape() {
            self.state.close_overlay();
        } else if key.is_enter() {
            let text = self.state.prompt_input.take();
            self.state.interaction_mode = InteractionMode::Normal;
            self.state.pending_action = Some(match kind {
                PromptKind::AddTracker => PendingAction::AddTracker(text),
                PromptKind::RecordCompletion(id) => PendingAction::RecordCompletion { id, text },
                PromptKind::Rename(id) => PendingAction::Rename { id, name: text },
                PromptKind::SetSigma(id) => PendingAction::SetSigma { id, text },
            });
        } else {
            self.state.prompt_input.handle_key(key);
        }
    }

    fn handle_confirm_key(&mut self, key: &KeyEvent, dialog: ConfirmDialog) {
        match key.char() {
            Some('y') | Some('Y') => {
                self.state.pending_action = Some(dialog.action);
                self.state.interaction_mode = InteractionMode::Normal;
            }
            Some('n') | Some('N') => self.state.close_overlay(),
            _ => {
                if key.is_escape() {
                    self.state.close_overlay();
                }
            }
        }
    }

    fn selected_id(&self) -> Option<i64> {
        self.state.selected_entry().map(|entry| entry.tracker.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompletionRecord, Tracker};
    use chrono::{Duration, Utc};

    fn key(code: KeyCode) -> crossterm::event::KeyEvent {
        crossterm::event::KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> crossterm::event::KeyEvent {
        crossterm::event::KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with(count: usize) -> App {
        let mut app = App::new(26);
        let now = Utc::now();
        let trackers = (0..count)
            .map(|i| {
                let mut tracker = Tracker::new(i as i64 + 1, &format!("tracker-{i}"), 2.0, now);
                let start = now - Duration::days(10);
                for day in 0..3 {
                    tracker.record(CompletionRecord::at(start + Duration::days(day)));
                }
                tracker
            })
            .collect();
        app.state_mut().update_trackers(trackers, now);
        app
    }

    #[test]
    fn test_q_quits() {
        let mut app = app_with(1);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Char('a')));
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Prompt(_)
        ));
        assert!(app.handle_key(ctrl('c')));
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app_with(3);
        assert_eq!(app.state().selected, Some(0));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.state().selected, Some(1));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.state().selected, Some(0));
    }

    #[test]
    fn test_enter_opens_detail_and_escape_returns() {
        let mut app = app_with(2);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().current_view, View::Detail);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state().current_view, View::List);
    }

    #[test]
    fn test_enter_without_entries_stays_in_list() {
        let mut app = App::new(26);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().current_view, View::List);
    }

    #[test]
    fn test_add_prompt_flow() {
        let mut app = app_with(0);
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(
            app.state().interaction_mode,
            InteractionMode::Prompt(PromptKind::AddTracker)
        );

        for c in "gym".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert_eq!(
            app.state().pending_action,
            Some(PendingAction::AddTracker("gym".to_string()))
        );
    }

    #[test]
    fn test_escape_cancels_prompt() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert_eq!(app.state().pending_action, None);
        assert!(app.state().prompt_input.is_empty());
    }

    #[test]
    fn test_record_prompt_queues_action() {
        let mut app = app_with(1);
        let id = app.state().entries[0].tracker.id;
        app.handle_key(key(KeyCode::Char('c')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.state().pending_action,
            Some(PendingAction::RecordCompletion {
                id,
                text: String::new()
            })
        );
    }

    #[test]
    fn test_rename_prompt_seeds_current_name() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.state().prompt_input.content(), "tracker-0");
    }

    #[test]
    fn test_sigma_prompt_seeds_current_value() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.state().prompt_input.content(), "2");
    }

    #[test]
    fn test_delete_confirm_flow() {
        let mut app = app_with(1);
        let id = app.state().entries[0].tracker.id;
        app.handle_key(key(KeyCode::Char('d')));
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Confirm(_)
        ));

        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(
            app.state().pending_action,
            Some(PendingAction::DeleteTracker(id))
        );
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }

    #[test]
    fn test_delete_confirm_declined() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.state().pending_action, None);
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }

    #[test]
    fn test_sort_keys() {
        let mut app = app_with(3);
        let initial = app.state().sort_key;
        app.handle_key(key(KeyCode::Char('s')));
        assert_ne!(app.state().sort_key, initial);
        app.handle_key(key(KeyCode::Char('v')));
        assert!(app.state().reverse);
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.state().interaction_mode, InteractionMode::Help);
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }

    #[test]
    fn test_action_keys_require_selection() {
        let mut app = App::new(26);
        for c in ['c', 'r', 'g', 'd'] {
            app.handle_key(key(KeyCode::Char(c)));
            assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        }
        assert_eq!(app.state().pending_action, None);
    }

    #[test]
    fn test_command_keys_work_from_detail() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().current_view, View::Detail);
        app.handle_key(key(KeyCode::Char('c')));
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Prompt(PromptKind::RecordCompletion(_))
        ));
    }

    #[test]
    fn test_prompt_consumes_command_chars() {
        let mut app = app_with(1);
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('q')));
        app.handle_key(key(KeyCode::Char('d')));
        assert!(!app.state().should_quit);
        assert_eq!(app.state().prompt_input.content(), "qd");
    }
}
