//! Application state definitions
//!
//! UI-side state that does not belong in the wizard controller: the list
//! cursor, the status line, and whichever overlay (custom-value entry,
//! quantity editor, contact form) is currently active.

use crate::input::{ContactForm, TextEntry};
use ulid::Ulid;

/// A modal overlay capturing keyboard input.
#[derive(Debug, Clone)]
pub enum Overlay {
    /// Free-form custom value entry for a choice stage
    CustomValue {
        stage_index: usize,
        entry: TextEntry,
    },
    /// Quantity editor for a cart item
    Quantity { item_id: Ulid, entry: TextEntry },
    /// Customer contact form
    ContactForm(ContactForm),
}

/// Presentation-layer state owned by the event loop.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Highlighted row in the current list (options, products, or items)
    pub cursor: usize,
    /// One-line notice shown at the bottom of the screen
    pub status_message: String,
    pub overlay: Option<Overlay>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            status_message: "Welcome to the strainer selector".to_owned(),
            overlay: None,
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self, len: usize) {
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Keep the cursor inside a list that may have shrunk.
    pub fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_bounds() {
        let mut ui = UiState::new();
        ui.cursor_up();
        assert_eq!(ui.cursor, 0);
        ui.cursor_down(3);
        ui.cursor_down(3);
        ui.cursor_down(3);
        assert_eq!(ui.cursor, 2);
    }

    #[test]
    fn test_clamp_after_removal() {
        let mut ui = UiState::new();
        ui.cursor = 4;
        ui.clamp_cursor(2);
        assert_eq!(ui.cursor, 1);
        ui.clamp_cursor(0);
        assert_eq!(ui.cursor, 0);
    }
}
