//! Input handling for TUI
//!
//! Wraps crossterm key events and provides a small text-editing buffer
//! for the prompt line.

use crossterm::event::{KeyCode, KeyModifiers};

/// Key event representation
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// The key code
    pub code: KeyCode,
    /// Modifier keys held
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a new key event
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Check if this is a quit key (q or Ctrl+C)
    pub fn is_quit(&self) -> bool {
        self.code == KeyCode::Char('q')
            || (self.code == KeyCode::Char('c') && self.modifiers.contains(KeyModifiers::CONTROL))
    }

    /// Check if this is the escape key
    pub fn is_escape(&self) -> bool {
        self.code == KeyCode::Esc
    }

    /// Check if this is the enter key
    pub fn is_enter(&self) -> bool {
        self.code == KeyCode::Enter
    }

    /// Check if this is an up arrow
    pub fn is_up(&self) -> bool {
        self.code == KeyCode::Up
    }

    /// Check if this is a down arrow
    pub fn is_down(&self) -> bool {
        self.code == KeyCode::Down
    }

    /// Check if this is a left arrow
    pub fn is_left(&self) -> bool {
        self.code == KeyCode::Left
    }

    /// Check if this is a right arrow
    pub fn is_right(&self) -> bool {
        self.code == KeyCode::Right
    }

    /// Get the character if this is an unmodified character key
    pub fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.modifiers.contains(KeyModifiers::CONTROL) => Some(c),
            _ => None,
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

/// Text input buffer with cursor for prompt editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    /// Current text content
    content: String,
    /// Cursor position (byte offset)
    cursor: usize,
}

impl TextInput {
    /// Create a new empty text input
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text input seeded with content, cursor at the end
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.len();
        Self { content, cursor }
    }

    /// Get the current content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the cursor position in characters (for rendering)
    pub fn cursor_chars(&self) -> usize {
        self.content[..self.cursor].chars().count()
    }

    /// Check if the input is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Take the content, leaving the input empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Clear the input
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Handle a key event, returning true if the input changed
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => {
                let moved = self.cursor != 0;
                self.cursor = 0;
                moved
            }
            KeyCode::End => {
                let moved = self.cursor != self.content.len();
                self.cursor = self.content.len();
                moved
            }
            _ => false,
        }
    }

    fn insert(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.content.replace_range(prev..self.cursor, "");
        self.cursor = prev;
        true
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }
        let next = self.next_boundary();
        self.content.replace_range(self.cursor..next, "");
        true
    }

    fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.prev_boundary();
        true
    }

    fn move_right(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }
        self.cursor = self.next_boundary();
        true
    }

    /// Byte offset of the previous char boundary from the cursor
    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Byte offset of the next char boundary from the cursor
    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.content.len())
    }
}
