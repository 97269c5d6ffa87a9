//! Active cell and the modal cell editor.
//!
//! The active cell is in one of three modes:
//! - `Display`: plain keyboard focus, no editor shown
//! - `Input`: entered by typing a character; the typed text replaces the value
//! - `Edit`: entered by `F2` or double activation; the editor starts with the
//!   cell's editable text
//!
//! Every editing episode ends in `Display` through commit or cancel.

pub mod mutation;

use serde::Serialize;
use tracing::debug;

use crate::types::{CellPos, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Display,
    Input,
    Edit,
}

/// Text buffer behind the editor, with a flag for the multi-line affordance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    text: String,
    multiline: bool,
}

impl EditorBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Replace the content; a line break switches to multi-line.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if self.text.contains('\n') {
            self.multiline = true;
        }
    }

    /// Append a line break (`Alt+Enter`).
    pub fn insert_newline(&mut self) {
        self.text.push('\n');
        self.multiline = true;
    }

    fn take(&mut self) -> String {
        self.multiline = false;
        std::mem::take(&mut self.text)
    }

    fn clear(&mut self) {
        self.text.clear();
        self.multiline = false;
    }
}

/// The single keyboard-focus cell and its editing mode.
#[derive(Debug, Clone, Default)]
pub struct ActiveCell {
    pub row: u32,
    pub col: u32,
    mode: EditMode,
    buffer: EditorBuffer,
}

impl ActiveCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }

    /// The active cell as a 1×1 range.
    pub fn range(&self) -> Range {
        Range::cell(self.pos())
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode != EditMode::Display
    }

    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut EditorBuffer {
        &mut self.buffer
    }

    pub(crate) fn move_to(&mut self, row: u32, col: u32) {
        self.row = row;
        self.col = col;
    }

    /// `Display → Input` with the typed text as initial content.
    pub fn enter_input_mode(&mut self, typed: &str) {
        self.buffer.clear();
        self.buffer.set_text(typed);
        self.mode = EditMode::Input;
        debug!(row = self.row, col = self.col, "enter input mode");
    }

    /// `→ Edit` with the cell's editable text.
    pub fn enter_edit_mode(&mut self, editable: String) {
        self.buffer.clear();
        self.buffer.set_text(editable);
        self.mode = EditMode::Edit;
        debug!(row = self.row, col = self.col, "enter edit mode");
    }

    /// `F2` while editing switches between input and edit.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            EditMode::Input => EditMode::Edit,
            EditMode::Edit => EditMode::Input,
            EditMode::Display => EditMode::Display,
        };
    }

    /// Leave editing, handing back the buffer content if there was an episode.
    pub(crate) fn finish(&mut self) -> Option<String> {
        if self.mode == EditMode::Display {
            return None;
        }
        self.mode = EditMode::Display;
        Some(self.buffer.take())
    }

    /// Leave editing without keeping the content.
    pub fn cancel(&mut self) {
        if self.mode != EditMode::Display {
            debug!(row = self.row, col = self.col, "cancel edit");
        }
        self.mode = EditMode::Display;
        self.buffer.clear();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn input_then_finish_returns_text() {
        let mut cell = ActiveCell::new();
        cell.enter_input_mode("x");
        assert_eq!(cell.mode(), EditMode::Input);
        cell.buffer_mut().set_text("xy");
        assert_eq!(cell.finish().as_deref(), Some("xy"));
        assert_eq!(cell.mode(), EditMode::Display);
        assert_eq!(cell.finish(), None);
    }

    #[test]
    fn f2_toggles_only_while_editing() {
        let mut cell = ActiveCell::new();
        cell.toggle_mode();
        assert_eq!(cell.mode(), EditMode::Display);
        cell.enter_edit_mode("v".into());
        cell.toggle_mode();
        assert_eq!(cell.mode(), EditMode::Input);
        cell.toggle_mode();
        assert_eq!(cell.mode(), EditMode::Edit);
    }

    #[test]
    fn line_break_switches_to_multiline() {
        let mut cell = ActiveCell::new();
        cell.enter_edit_mode("a\nb".into());
        assert!(cell.buffer().is_multiline());
        cell.cancel();
        assert!(!cell.buffer().is_multiline());
        assert_eq!(cell.buffer().text(), "");

        cell.enter_input_mode("a");
        assert!(!cell.buffer().is_multiline());
        cell.buffer_mut().insert_newline();
        assert!(cell.buffer().is_multiline());
        assert_eq!(cell.buffer().text(), "a\n");
    }
}
