//! The grid controller.
//!
//! `Grid` owns all interaction state (selection, active cell and editor,
//! viewport window, drag gesture, clipboard guard) and drives a
//! [`MatrixView`] that owns the data. Only the rows of the current window
//! are materialized.
//!
//! Input handling lives in submodules:
//! - `keyboard`: key dispatch
//! - `pointer`: hit testing, drag selection, wheel
//! - `navigation`: active-cell movement and scroll policy
//! - `commands`: clipboard, delete, insert, select-all, sort

mod commands;
mod keyboard;
mod navigation;
mod pointer;

pub use keyboard::{KeyAction, KeyEvent};
pub use pointer::DragState;

use tracing::debug;

use crate::clipboard::ClipboardGate;
use crate::config::GridConfig;
use crate::editor::{mutation, ActiveCell};
use crate::events::{EventKind, EventListeners, GridEvent, Listener};
use crate::layout::{GridLayout, ScrollIndicator, ScrollSource, ViewportWindow};
use crate::provider::MatrixView;
use crate::render::{paint_window, PaintState, WindowPaint};
use crate::types::{CellValue, GridSchema, Patch, Range, Selection};

pub struct Grid<V: MatrixView> {
    view: V,
    config: GridConfig,
    layout: GridLayout,
    window: ViewportWindow,
    scroll: ScrollIndicator,
    /// Materialized rows of the window; rows past the model's end are absent.
    window_rows: Vec<Vec<Option<CellValue>>>,
    row_count: u32,
    selection: Selection,
    active: ActiveCell,
    drag: DragState,
    focused: bool,
    clipboard: ClipboardGate,
    listeners: EventListeners,
}

impl<V: MatrixView> Grid<V> {
    /// Create a grid over `view` for a container `height` pixels tall.
    pub fn new(view: V, config: GridConfig, height: f32) -> Self {
        let layout = GridLayout::new(view.schema(), &config);
        let viewport_row_count = config.viewport_row_count(height);
        let window = ViewportWindow::new(viewport_row_count, view.schema().column_count());
        let mut grid = Self {
            row_count: view.row_count(),
            view,
            config,
            layout,
            window,
            scroll: ScrollIndicator::default(),
            window_rows: Vec::new(),
            selection: Selection::new(),
            active: ActiveCell::new(),
            drag: DragState::Idle,
            focused: false,
            clipboard: ClipboardGate::default(),
            listeners: EventListeners::new(),
        };
        grid.refresh();
        debug!(
            rows = grid.row_count,
            viewport_rows = viewport_row_count,
            "grid created"
        );
        grid
    }

    // ---- accessors ----------------------------------------------------

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn schema(&self) -> &GridSchema {
        self.view.schema()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn window(&self) -> &ViewportWindow {
        &self.window
    }

    pub fn scroll_indicator(&self) -> ScrollIndicator {
        self.scroll
    }

    pub fn window_rows(&self) -> &[Vec<Option<CellValue>>] {
        &self.window_rows
    }

    /// Logical row count as of the last refresh.
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn col_count(&self) -> u32 {
        self.window.col_count()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active(&self) -> &ActiveCell {
        &self.active
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// The active cell as a 1×1 range.
    pub fn get_active_cell(&self) -> Range {
        self.active.range()
    }

    /// Convex hull of the selection.
    pub fn get_selection(&self) -> Range {
        self.selection.convex_hull()
    }

    pub fn get_range(&self, row: u32, col: u32, row_count: u32, col_count: u32) -> Range {
        Range::new(i64::from(row), i64::from(col), row_count, col_count)
    }

    /// Make `range`'s top-left the active cell and select the whole range.
    pub fn select(&mut self, range: &Range) {
        if range.is_empty() {
            return;
        }
        let row = u32::try_from(range.row_index.max(0)).unwrap_or(0);
        let col = u32::try_from(range.column_index.max(0)).unwrap_or(0);
        self.move_active(row, col);
        self.set_selection(row, col);
        self.expand_selection(
            row.saturating_add(range.row_count - 1),
            col.saturating_add(range.column_count - 1),
        );
    }

    /// Allowed values of the active column, offered while editing.
    pub fn editor_suggestions(&self) -> Option<&[String]> {
        self.schema()
            .column(self.active.col)?
            .enum_values
            .as_deref()
    }

    pub fn on(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.set(kind, listener);
    }

    /// Queue events for [`take_events`](Self::take_events) instead of calling
    /// listeners registered with [`on`](Self::on).
    pub fn queue_events(&mut self) {
        self.listeners.queue();
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        self.listeners.take_queued()
    }

    // ---- window -------------------------------------------------------

    /// Re-read the row count and re-pull the window.
    pub fn refresh(&mut self) {
        self.row_count = self.view.row_count();
        self.set_first_row(i64::from(self.window.first_row()), ScrollSource::Program);
    }

    /// Move the window and re-pull its rows from the provider.
    pub fn set_first_row(&mut self, first_row: i64, source: ScrollSource) {
        let first = self.window.set_first_row(first_row);
        if source != ScrollSource::ScrollBar {
            self.scroll
                .update(self.window.viewport_row_count(), self.row_count, first);
        }
        let end = first
            .saturating_add(self.window.viewport_row_count())
            .min(self.row_count);
        self.window_rows = (first..end).map(|row| self.view.get_row(row)).collect();
        debug!(first_row = first, rows = self.window_rows.len(), "window loaded");
    }

    /// Change the container height.
    pub fn resize(&mut self, height: f32) {
        self.window.resize(self.config.viewport_row_count(height));
        self.refresh();
    }

    pub fn paint(&self) -> WindowPaint {
        paint_window(
            &self.window_rows,
            self.view.schema(),
            &self.config,
            PaintState {
                window: &self.window,
                layout: &self.layout,
                areas: self.selection.areas(),
                active: self.active.range(),
                focused: self.focused,
                header_selected: self.selection.header_selected(),
            },
        )
    }

    // ---- selection and active cell -----------------------------------

    pub fn set_selection(&mut self, row: u32, col: u32) {
        self.selection.set(row, col);
        self.selection_changed();
    }

    pub fn expand_selection(&mut self, row: u32, col: u32) {
        self.selection.expand(row, col);
        self.selection_changed();
    }

    pub fn add_selection(&mut self, row: u32, col: u32) {
        self.selection.add(row, col);
        self.selection_changed();
    }

    fn selection_changed(&mut self) {
        let hull = self.selection.convex_hull();
        debug!(selection = %hull, areas = self.selection.areas().len(), "selection changed");
        self.listeners.emit(&GridEvent::SelectionChanged(hull));
    }

    fn move_active(&mut self, row: u32, col: u32) {
        self.active.move_to(row, col);
        self.listeners
            .emit(&GridEvent::ActiveCellChanged(self.active.range()));
    }

    // ---- focus ---------------------------------------------------------

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Losing focus commits the editor and drops the header flag of select-all.
    pub fn blur(&mut self) {
        self.commit();
        self.focused = false;
        self.selection.clear_header();
    }

    // ---- editing -------------------------------------------------------

    pub fn is_active_read_only(&self) -> bool {
        self.schema().is_column_read_only(self.active.col)
    }

    /// Keep the editor buffer in sync with the host's input element.
    pub fn set_editor_text(&mut self, text: &str) {
        if self.active.is_editing() {
            self.active.buffer_mut().set_text(text);
        }
    }

    /// `Display → Input` with `typed` as content. Returns `false` when the
    /// active cell is read-only or already editing.
    pub fn begin_input(&mut self, typed: &str) -> bool {
        if self.active.is_editing() || self.is_active_read_only() {
            return false;
        }
        self.scroll_active_into_view();
        self.active.enter_input_mode(typed);
        true
    }

    /// `→ Edit` with the cell's editable text.
    pub fn begin_edit(&mut self) {
        self.scroll_active_into_view();
        let (row, col) = (self.active.row, self.active.col);
        let editable = match (self.view.get_cell(row, col), self.schema().column(col)) {
            (Some(value), Some(column)) => column.converter().to_editable(&value),
            _ => String::new(),
        };
        self.active.enter_edit_mode(editable);
    }

    fn scroll_active_into_view(&mut self) {
        if self.active.row < self.window.first_row() {
            self.set_first_row(i64::from(self.active.row), ScrollSource::Program);
        }
    }

    /// Finish the editing episode, writing the editor text unless the cell is
    /// read-only.
    pub fn commit(&mut self) {
        let Some(text) = self.active.finish() else {
            return;
        };
        let (row, col) = (self.active.row, self.active.col);
        if let Some(patches) = mutation::commit_value(&mut self.view, row, col, &text) {
            self.apply(patches);
        }
    }

    /// Discard the editor content.
    pub fn cancel(&mut self) {
        self.active.cancel();
    }

    /// Refresh from the post-write row count, then publish the patches.
    fn apply(&mut self, patches: Vec<Patch>) {
        self.refresh();
        self.listeners.emit(&GridEvent::DataChanged(patches));
    }
}

impl<V: MatrixView + std::fmt::Debug> std::fmt::Debug for Grid<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("view", &self.view)
            .field("window", &self.window)
            .field("row_count", &self.row_count)
            .field("selection", &self.selection)
            .field("active", &self.active)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
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
    use crate::provider::RowMatrixView;
    use crate::types::{ColumnSchema, ColumnType};
    use std::cell::RefCell;
    use std::rc::Rc;

    pub(super) fn grid(rows: u32) -> Grid<RowMatrixView> {
        let schema = GridSchema::new(vec![
            ColumnSchema::new("a", ColumnType::String),
            ColumnSchema::new("n", ColumnType::Number),
            ColumnSchema::new("ro", ColumnType::String).with_read_only(true),
        ]);
        let data = (0..rows)
            .map(|r| vec![Some(CellValue::from(format!("r{r}"))), None, None])
            .collect();
        // 10 window rows: (11 * 24) / 24 - 1
        Grid::new(RowMatrixView::new(schema, data), GridConfig::light(), 264.0)
    }

    #[test]
    fn window_materializes_only_visible_rows() {
        let mut g = grid(100);
        assert_eq!(g.window().viewport_row_count(), 10);
        assert_eq!(g.window_rows().len(), 10);
        g.set_first_row(95, ScrollSource::Program);
        assert_eq!(g.window_rows().len(), 5);
        assert_eq!(g.scroll_indicator().value, 95);
        assert_eq!(g.scroll_indicator().max, 90);
    }

    #[test]
    fn scrollbar_source_leaves_indicator_alone() {
        let mut g = grid(100);
        g.set_first_row(40, ScrollSource::ScrollBar);
        assert_eq!(g.window().first_row(), 40);
        assert_eq!(g.scroll_indicator().value, 0);
    }

    #[test]
    fn commit_writes_then_emits() {
        let mut g = grid(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        g.on(
            EventKind::DataChanged,
            Box::new(move |e| {
                sink.borrow_mut().push(e.clone());
                Ok(())
            }),
        );
        g.select(&Range::new(1, 1, 1, 1));
        assert!(g.begin_input("4"));
        g.set_editor_text(" 42 ");
        g.commit();
        assert_eq!(g.active().mode(), EditMode::Display);
        assert_eq!(g.view().get_cell(1, 1), Some(CellValue::Number(42.0)));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(g.window_rows()[1][1], Some(CellValue::Number(42.0)));
    }

    #[test]
    fn read_only_cell_rejects_input_but_allows_edit() {
        let mut g = grid(3);
        g.select(&Range::new(0, 2, 1, 1));
        assert!(!g.begin_input("x"));
        g.begin_edit();
        assert_eq!(g.active().mode(), EditMode::Edit);
        g.set_editor_text("x");
        g.commit();
        assert_eq!(g.view().get_cell(0, 2), None);
    }

    #[test]
    fn edit_prefills_editable_text() {
        let mut g = grid(3);
        g.begin_edit();
        assert_eq!(g.active().buffer().text(), "r0");
        g.cancel();
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("r0")));
    }

    #[test]
    fn select_range_sets_active_and_hull() {
        let mut g = grid(10);
        let r = g.get_range(2, 0, 3, 2);
        g.select(&r);
        assert_eq!(g.get_active_cell(), Range::new(2, 0, 1, 1));
        assert_eq!(g.get_selection(), r);
    }

    #[test]
    fn blur_commits_and_clears_header_flag() {
        let mut g = grid(3);
        g.focus();
        g.select_all();
        g.select_all();
        assert!(g.selection().header_selected());
        assert!(g.begin_input("z"));
        g.blur();
        assert!(!g.is_focused());
        assert!(!g.selection().header_selected());
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("z")));
    }
}
