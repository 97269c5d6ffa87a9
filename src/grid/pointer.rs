//! Pointer input: click, drag selection, double click and wheel.
//!
//! Coordinates are pixels relative to the cell area's top-left corner.

use tracing::debug;

use super::Grid;
use crate::layout::ScrollSource;
use crate::provider::MatrixView;

/// Drag-to-select gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

impl<V: MatrixView> Grid<V> {
    /// Pointer pressed: Shift expands, Ctrl adds an area, a plain press moves
    /// the active cell. All of them start a drag.
    pub fn pointer_down(&mut self, x: f32, y: f32, shift: bool, ctrl: bool) {
        self.focused = true;
        let cell = self.layout.cell_at_point(x, y, self.window.first_row());
        if !self.window.contains_row(i64::from(cell.row)) {
            return;
        }
        if shift {
            self.expand_selection(cell.row, cell.col);
        } else if ctrl {
            self.add_selection(cell.row, cell.col);
        } else {
            let active = self.active.pos();
            self.navigate(
                i64::from(cell.row) - i64::from(active.row),
                i64::from(cell.col) - i64::from(active.col),
                false,
            );
        }
        self.drag = DragState::Dragging;
        debug!(row = cell.row, col = cell.col, shift, ctrl, "pointer down");
    }

    /// Pointer moved: while dragging, expand to the cell under the pointer
    /// if it lies inside the window.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.drag != DragState::Dragging {
            return;
        }
        let cell = self.layout.cell_at_point(x, y, self.window.first_row());
        if self.window.contains_row(i64::from(cell.row)) && self.selection.head() != cell {
            self.expand_selection(cell.row, cell.col);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Double activation opens the editor on the cell under the pointer.
    pub fn double_click(&mut self, x: f32, y: f32) {
        let cell = self.layout.cell_at_point(x, y, self.window.first_row());
        if self.active.pos() != cell {
            self.pointer_down(x, y, false, false);
            self.pointer_up();
        }
        self.begin_edit();
    }

    /// Wheel tick. Ignored without focus and for Ctrl+wheel (zoom). Returns
    /// whether the window moved.
    pub fn wheel(&mut self, delta_y: f64, ctrl: bool) -> bool {
        if !self.focused || ctrl {
            return false;
        }
        match self.window.wheel_target(delta_y, self.row_count) {
            Some(first_row) => {
                self.set_first_row(i64::from(first_row), ScrollSource::Program);
                true
            }
            None => false,
        }
    }

    /// Scrollbar moved to `value`.
    pub fn scroll_to(&mut self, value: u32) {
        let first_row = value.min(self.window.max_first_row(self.row_count));
        self.set_first_row(i64::from(first_row), ScrollSource::ScrollBar);
        self.scroll.value = first_row;
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
    use crate::editor::EditMode;
    use crate::grid::tests::grid;
    use crate::types::{CellPos, Range};

    // Light theme, default widths: columns end at 108, 216, 324; rows are 24px.

    #[test]
    fn click_moves_active_cell() {
        let mut g = grid(20);
        g.pointer_down(150.0, 50.0, false, false);
        assert_eq!(g.active().pos(), CellPos::new(2, 1));
        assert_eq!(g.get_selection(), Range::new(2, 1, 1, 1));
        assert!(g.is_focused());
    }

    #[test]
    fn drag_expands_until_release() {
        let mut g = grid(20);
        g.pointer_down(10.0, 10.0, false, false);
        assert_eq!(g.drag_state(), DragState::Dragging);
        g.pointer_move(250.0, 80.0);
        assert_eq!(g.get_selection(), Range::new(0, 0, 4, 3));
        g.pointer_up();
        g.pointer_move(10.0, 200.0);
        assert_eq!(g.get_selection(), Range::new(0, 0, 4, 3));
        assert_eq!(g.active().pos(), CellPos::new(0, 0));
    }

    #[test]
    fn modifiers_expand_or_add() {
        let mut g = grid(20);
        g.pointer_down(10.0, 10.0, false, false);
        g.pointer_up();
        g.pointer_down(120.0, 30.0, true, false);
        g.pointer_up();
        assert_eq!(g.get_selection(), Range::new(0, 0, 2, 2));
        g.pointer_down(300.0, 100.0, false, true);
        g.pointer_leave();
        assert!(g.selection().is_multi_area());
        assert_eq!(g.drag_state(), DragState::Idle);
    }

    #[test]
    fn double_click_edits_cell() {
        let mut g = grid(20);
        g.double_click(10.0, 30.0);
        assert_eq!(g.active().pos(), CellPos::new(1, 0));
        assert_eq!(g.active().mode(), EditMode::Edit);
        assert_eq!(g.active().buffer().text(), "r1");
    }

    #[test]
    fn wheel_requires_focus() {
        let mut g = grid(50);
        assert!(!g.wheel(120.0, false));
        g.focus();
        assert!(g.wheel(120.0, false));
        assert_eq!(g.window().first_row(), 3);
        assert!(!g.wheel(120.0, true));
    }

    #[test]
    fn scrollbar_is_clamped() {
        let mut g = grid(50);
        g.scroll_to(500);
        assert_eq!(g.window().first_row(), 40);
        assert_eq!(g.scroll_indicator().value, 40);
    }
}
