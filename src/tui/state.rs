//! Application state for the TUI.
//!
//! This module defines the core state types that drive the TUI:
//! - `AppState`: All mutable application state
//! - `View`: Which view is currently active
//! - `InteractionMode`: Current input mode (normal, prompt, confirm, help)

use chrono::{DateTime, Utc};

use super::input::TextInput;
use crate::domain::Tracker;
use crate::forecast::{SortKey, TrackerEntry, sort_entries};

/// The primary application state.
///
/// Contains all mutable state for the TUI. This is owned by `App` and
/// updated in response to events and store polling.
#[derive(Debug, Clone)]
pub struct AppState {
    // Data state
    /// Assessed trackers in display order
    pub entries: Vec<TrackerEntry>,
    /// Reference time used for every derived value on screen
    pub now: DateTime<Utc>,

    // View state
    /// Currently active view (List or Detail)
    pub current_view: View,
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Index into `entries` of the selected tracker
    pub selected: Option<usize>,
    /// Current page of the list view
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
    /// Active ranking key
    pub sort_key: SortKey,
    /// Whether the ranking is reversed
    pub reverse: bool,

    // Prompt state
    /// Input buffer for the active prompt
    pub prompt_input: TextInput,

    // Pending actions (processed by runner)
    /// Mutation queued for the runner to apply
    pub pending_action: Option<PendingAction>,

    // Feedback
    /// One-line status shown in the footer
    pub status_message: Option<String>,

    // Control flags
    /// Whether the application should quit
    pub should_quit: bool,
}

/// Available views in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Paged tracker table
    #[default]
    List,
    /// Single tracker with history and forecast
    Detail,
}

/// Current interaction mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Collecting a line of text for a prompt
    Prompt(PromptKind),
    /// Waiting for y/n confirmation
    Confirm(ConfirmDialog),
    /// Help overlay is showing
    Help,
}

/// What the active prompt is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Name for a new tracker
    AddTracker,
    /// Completion expression for an existing tracker
    RecordCompletion(i64),
    /// New name for an existing tracker
    Rename(i64),
    /// New sigma for an existing tracker
    SetSigma(i64),
}

impl PromptKind {
    /// Prompt line label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::AddTracker => "New tracker name",
            PromptKind::RecordCompletion(_) => "Completed at (blank = now)",
            PromptKind::Rename(_) => "New name",
            PromptKind::SetSigma(_) => "Sigma",
        }
    }
}

/// Confirmation dialog state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    /// Question shown to the user
    pub message: String,
    /// Action queued when the user confirms
    pub action: PendingAction,
}

/// Mutations queued by key handlers and applied by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Create a tracker with the given name
    AddTracker(String),
    /// Record a completion from a raw expression
    RecordCompletion { id: i64, text: String },
    /// Rename a tracker
    Rename { id: i64, name: String },
    /// Change a tracker's sigma from raw text
    SetSigma { id: i64, text: String },
    /// Delete a tracker and its history
    DeleteTracker(i64),
}

impl AppState {
    /// Create state with the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            now: Utc::now(),
            current_view: View::default(),
            interaction_mode: InteractionMode::default(),
            selected: None,
            page: 0,
            page_size: page_size.max(1),
            sort_key: SortKey::default(),
            reverse: false,
            prompt_input: TextInput::new(),
            pending_action: None,
            status_message: None,
            should_quit: false,
        }
    }

    /// Replace the tracker set and re-derive every entry against `now`.
    pub fn update_trackers(&mut self, trackers: Vec<Tracker>, now: DateTime<Utc>) {
        self.now = now;
        self.entries = trackers
            .into_iter()
            .map(|tracker| TrackerEntry::assess(tracker, now))
            .collect();
        self.resort();
    }

    /// Re-apply the current sort key and clamp selection.
    pub fn resort(&mut self) {
        sort_entries(&mut self.entries, self.sort_key, self.reverse);
        self.clamp_selection();
    }

    /// Advance to the next sort key.
    pub fn cycle_sort(&mut self) {
        self.sort_key = self.sort_key.next();
        self.resort();
    }

    /// Flip the sort direction.
    pub fn toggle_reverse(&mut self) {
        self.reverse = !self.reverse;
        self.resort();
    }

    /// Currently selected entry, if any.
    pub fn selected_entry(&self) -> Option<&TrackerEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Move selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        });
        self.follow_selection();
    }

    /// Move selection up, wrapping at the start.
    pub fn select_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        });
        self.follow_selection();
    }

    /// Jump to the next page, wrapping.
    pub fn next_page(&mut self) {
        let pages = self.page_count();
        if pages <= 1 {
            return;
        }
        self.page = (self.page + 1) % pages;
        self.selected = Some(self.page * self.page_size);
    }

    /// Jump to the previous page, wrapping.
    pub fn prev_page(&mut self) {
        let pages = self.page_count();
        if pages <= 1 {
            return;
        }
        self.page = (self.page + pages - 1) % pages;
        self.selected = Some(self.page * self.page_size);
    }

    /// Number of pages needed for the current entries.
    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(self.page_size).max(1)
    }

    /// Entries visible on the current page.
    pub fn visible_entries(&self) -> &[TrackerEntry] {
        let start = self.page * self.page_size;
        let end = (start + self.page_size).min(self.entries.len());
        if start >= end {
            return &[];
        }
        &self.entries[start..end]
    }

    /// Index into `entries` of the first visible row.
    pub fn page_start(&self) -> usize {
        self.page * self.page_size
    }

    /// Letter tag for a row on the current page.
    pub fn tag_for(row: usize) -> char {
        (b'a' + (row as u8).min(25)) as char
    }

    /// Open a prompt, optionally seeding the input buffer.
    pub fn open_prompt(&mut self, kind: PromptKind, seed: Option<&str>) {
        self.prompt_input = match seed {
            Some(text) => TextInput::with_content(text),
            None => TextInput::new(),
        };
        self.interaction_mode = InteractionMode::Prompt(kind);
    }

    /// Abandon the active prompt or dialog.
    pub fn close_overlay(&mut self) {
        self.prompt_input.clear();
        self.interaction_mode = InteractionMode::Normal;
    }

    /// Set the footer status line.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Keep selection and page inside the entry list.
    fn clamp_selection(&mut self) {
        if self.entries.is_empty() {
            self.selected = None;
            self.page = 0;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.min(self.entries.len() - 1),
            None => 0,
        });
        self.follow_selection();
    }

    /// Move the page to contain the selected row.
    fn follow_selection(&mut self) {
        if let Some(i) = self.selected {
            self.page = i / self.page_size;
        }
    }
}
