//! Keyboard dispatch.
//!
//! Keys are routed by the active cell's mode: while an editor is open only
//! editor keys are handled; otherwise the grid shortcuts apply.

use serde::Deserialize;
use tracing::debug;

use super::Grid;
use crate::editor::EditMode;
use crate::error::Result;
use crate::provider::MatrixView;

/// A key press as reported by the host (`KeyboardEvent.key` / `.code`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyEvent {
    pub key: String,
    pub code: String,
    #[serde(alias = "ctrlKey")]
    pub ctrl: bool,
    #[serde(alias = "shiftKey")]
    pub shift: bool,
    #[serde(alias = "altKey")]
    pub alt: bool,
}

impl KeyEvent {
    /// Key with the same `key` and `code`, as for most named keys.
    pub fn named(code: &str) -> Self {
        Self {
            key: code.to_string(),
            code: code.to_string(),
            ..Self::default()
        }
    }

    /// A printable character.
    pub fn char(c: char) -> Self {
        Self {
            key: c.to_string(),
            code: String::new(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    fn is_printable(&self) -> bool {
        self.key.chars().count() == 1 && !self.ctrl && !self.alt
    }
}

/// What the host should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// The grid consumed the key; suppress the default.
    Handled,
    /// Not a grid key; let the host (or editor element) handle it.
    Ignored,
    /// Write `text` to the system clipboard, then call `finish_copy`.
    WriteClipboard { text: String },
    /// Read the system clipboard, then call `finish_paste`.
    ReadClipboard,
}

impl<V: MatrixView> Grid<V> {
    /// Handle one key press. Precondition failures are returned for the host
    /// to show; grid state is left untouched in that case.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<KeyAction> {
        debug!(code = %event.code, key = %event.key, mode = ?self.active.mode(), "key");
        if self.active.is_editing() {
            Ok(self.handle_editor_key(event))
        } else {
            self.handle_grid_key(event)
        }
    }

    fn handle_editor_key(&mut self, event: &KeyEvent) -> KeyAction {
        let backwards = event.shift;
        match event.code.as_str() {
            "F2" => self.active.toggle_mode(),
            "Enter" if event.alt => self.active.buffer_mut().insert_newline(),
            "Enter" => {
                self.commit();
                self.navigate(if backwards { -1 } else { 1 }, 0, false);
            }
            "Tab" => {
                self.commit();
                self.navigate(0, if backwards { -1 } else { 1 }, false);
            }
            "Escape" => self.cancel(),
            "ArrowLeft" | "ArrowRight" if self.active.mode() == EditMode::Edit => {
                let offset = if event.code == "ArrowLeft" { -1 } else { 1 };
                self.navigate(0, offset, false);
            }
            _ => return KeyAction::Ignored,
        }
        KeyAction::Handled
    }

    fn handle_grid_key(&mut self, event: &KeyEvent) -> Result<KeyAction> {
        let page = i64::from(self.window.page_increment());
        // Shift with Tab or Enter moves backwards instead of expanding.
        let expand = event.shift && !matches!(event.code.as_str(), "Tab" | "Enter");

        match event.code.as_str() {
            "ArrowLeft" => self.navigate(0, -1, expand),
            "Tab" if event.shift => self.navigate(0, -1, false),
            "ArrowRight" | "Tab" => self.navigate(0, 1, expand),
            "ArrowUp" => self.navigate(-1, 0, expand),
            "Enter" if event.shift => self.navigate(-1, 0, false),
            "ArrowDown" | "Enter" => self.navigate(1, 0, expand),
            "PageUp" => self.navigate(-page, 0, expand),
            "PageDown" => self.navigate(page, 0, expand),
            "KeyA" if event.ctrl => self.select_all(),
            "KeyC" | "KeyX" if event.ctrl => {
                let text = self.begin_copy(event.code == "KeyX")?;
                return Ok(KeyAction::WriteClipboard { text });
            }
            "KeyV" if event.ctrl => {
                self.begin_paste()?;
                return Ok(KeyAction::ReadClipboard);
            }
            "Escape" => self.cancel(),
            "Delete" => self.delete_selection()?,
            "Space" if event.ctrl => self.select_column(),
            "Space" if event.shift => self.select_row(),
            "F2" => self.begin_edit(),
            _ if event.ctrl && event.key == "+" => self.insert_row()?,
            _ if event.ctrl && event.key == "-" => self.delete_rows()?,
            _ if event.is_printable() => {
                if !self.begin_input(&event.key) {
                    return Ok(KeyAction::Ignored);
                }
            }
            _ => return Ok(KeyAction::Ignored),
        }
        Ok(KeyAction::Handled)
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
    use crate::grid::tests::grid;
    use crate::types::{CellPos, CellValue, Range};

    fn press(g: &mut Grid<crate::provider::RowMatrixView>, event: KeyEvent) -> KeyAction {
        g.handle_key(&event).unwrap()
    }

    #[test]
    fn typing_enters_input_and_enter_commits_down() {
        let mut g = grid(3);
        assert_eq!(press(&mut g, KeyEvent::char('x')), KeyAction::Handled);
        assert_eq!(g.active().mode(), EditMode::Input);
        g.set_editor_text("xyz");
        press(&mut g, KeyEvent::named("Enter"));
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("xyz")));
        assert_eq!(g.active().pos(), CellPos::new(1, 0));
        assert_eq!(g.active().mode(), EditMode::Display);
    }

    #[test]
    fn escape_cancels() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::char('x'));
        press(&mut g, KeyEvent::named("Escape"));
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("r0")));
        assert_eq!(g.active().mode(), EditMode::Display);
    }

    #[test]
    fn arrows_in_input_mode_move_the_caret() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::char('x'));
        assert_eq!(press(&mut g, KeyEvent::named("ArrowRight")), KeyAction::Ignored);
        assert_eq!(g.active().pos(), CellPos::new(0, 0));
    }

    #[test]
    fn arrows_in_edit_mode_commit_and_move() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::named("F2"));
        assert_eq!(g.active().mode(), EditMode::Edit);
        g.set_editor_text("e");
        press(&mut g, KeyEvent::named("ArrowRight"));
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("e")));
        assert_eq!(g.active().pos(), CellPos::new(0, 1));
    }

    #[test]
    fn f2_toggles_while_editing() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::char('x'));
        press(&mut g, KeyEvent::named("F2"));
        assert_eq!(g.active().mode(), EditMode::Edit);
    }

    #[test]
    fn alt_enter_inserts_newline() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::char('a'));
        press(&mut g, KeyEvent::named("Enter").with_alt());
        assert!(g.active().buffer().is_multiline());
        assert_eq!(g.active().mode(), EditMode::Input);
    }

    #[test]
    fn shift_tab_moves_back_without_expanding() {
        let mut g = grid(3);
        g.select(&Range::new(1, 1, 1, 1));
        press(&mut g, KeyEvent::named("Tab").with_shift());
        assert_eq!(g.active().pos(), CellPos::new(1, 0));
        assert_eq!(g.get_selection(), Range::new(1, 0, 1, 1));
    }

    #[test]
    fn shift_arrow_expands() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::named("ArrowDown").with_shift());
        assert_eq!(g.get_selection(), Range::new(0, 0, 2, 1));
    }

    #[test]
    fn typing_on_read_only_is_ignored() {
        let mut g = grid(3);
        g.select(&Range::new(0, 2, 1, 1));
        assert_eq!(press(&mut g, KeyEvent::char('x')), KeyAction::Ignored);
    }

    #[test]
    fn ctrl_c_asks_host_to_write() {
        let mut g = grid(1);
        let action = press(&mut g, KeyEvent::named("KeyC").with_ctrl());
        assert_eq!(action, KeyAction::WriteClipboard { text: "r0\r\n".into() });
        g.finish_copy(Ok(())).unwrap();
        assert_eq!(press(&mut g, KeyEvent::named("KeyV").with_ctrl()), KeyAction::ReadClipboard);
    }

    #[test]
    fn ctrl_plus_inserts_row() {
        let mut g = grid(2);
        let mut plus = KeyEvent::char('+').with_ctrl();
        plus.code = "Equal".into();
        press(&mut g, plus);
        assert_eq!(g.row_count(), 3);
    }

    #[test]
    fn key_event_decodes_from_dom_names() {
        let e: KeyEvent =
            serde_json::from_str(r#"{"key":"a","code":"KeyA","ctrlKey":true}"#).unwrap();
        assert!(e.ctrl);
        assert!(!e.shift);
    }
}
