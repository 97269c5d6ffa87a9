//! Grid-wide commands: clipboard, deletion, row insertion, whole-axis
//! selection and sorting.

use tracing::{debug, error, warn};

use super::Grid;
use crate::clipboard::{self, ClipboardOp, TAB};
use crate::error::{GridError, Result};
use crate::events::GridEvent;
use crate::provider::MatrixView;
use crate::types::Range;

impl<V: MatrixView> Grid<V> {
    // ---- selection shortcuts -------------------------------------------

    /// First call selects every data cell; a second call while exactly that is
    /// selected also marks the header as selected.
    pub fn select_all(&mut self) {
        let last_row = self.row_count.saturating_sub(1);
        let last_col = self.col_count().saturating_sub(1);
        let all = Range::new(0, 0, last_row + 1, last_col + 1);
        if self.selection.is_exactly(&all) {
            self.selection.select_header();
            debug!("header selected");
        } else {
            self.set_selection(0, 0);
            self.expand_selection(last_row, last_col);
        }
    }

    /// Select the active cell's whole column.
    pub fn select_column(&mut self) {
        let col = self.active.col;
        self.set_selection(0, col);
        self.expand_selection(self.row_count.saturating_sub(1), col);
    }

    /// Select the active cell's whole row.
    pub fn select_row(&mut self) {
        let row = self.active.row;
        self.set_selection(row, 0);
        self.expand_selection(row, self.col_count().saturating_sub(1));
    }

    // ---- clipboard -----------------------------------------------------

    /// Text for `range`: one line per row, absent and out-of-model cells as
    /// empty fields, optionally headed by the copied columns' titles.
    pub fn range_to_text(&self, range: &Range, with_headers: bool) -> String {
        let col_count = self.col_count();
        let columns: Vec<u32> = range.column_indices().filter(|&c| c < col_count).collect();
        let schema = self.view.schema();
        let rows: Vec<Vec<Option<String>>> = range
            .row_indices()
            .map(|row| {
                columns
                    .iter()
                    .map(|&col| {
                        if row >= self.row_count {
                            return None;
                        }
                        let value = self.view.get_cell(row, col)?;
                        Some(schema.column(col)?.converter().to_string(&value))
                    })
                    .collect()
            })
            .collect();
        let header = with_headers.then(|| schema.titles(columns.iter().copied()));
        clipboard::matrix_to_text(&rows, TAB, header.as_deref())
    }

    /// Start a copy (or cut): returns the text the host must write to the
    /// system clipboard before calling [`finish_copy`](Self::finish_copy).
    pub fn begin_copy(&mut self, cut: bool) -> Result<String> {
        if self.selection.is_multi_area() {
            warn!("copy rejected for multi-area selection");
            return Err(GridError::multi_selection());
        }
        self.clipboard.begin(ClipboardOp::Copy { cut })?;
        let text = self.range_to_text(
            &self.selection.convex_hull(),
            self.selection.header_selected(),
        );
        debug!(cut, bytes = text.len(), "copy started");
        Ok(text)
    }

    /// Complete a copy with the outcome of the clipboard write. A successful
    /// cut then deletes the selection.
    pub fn finish_copy(&mut self, written: Result<()>) -> Result<()> {
        let op = self.clipboard.finish(false)?;
        if let Err(e) = written {
            error!(error = %e, "could not copy text");
            return Err(e);
        }
        debug!("text copied to clipboard");
        match op {
            ClipboardOp::Copy { cut: true } => self.delete_selection(),
            _ => Ok(()),
        }
    }

    /// Start a paste: checks the target, then the host reads the clipboard
    /// and calls [`finish_paste`](Self::finish_paste).
    pub fn begin_paste(&mut self) -> Result<()> {
        if let Err(e) = clipboard::paste_precondition(&self.selection, self.view.schema()) {
            warn!(error = %e, "paste rejected");
            return Err(e);
        }
        self.clipboard.begin(ClipboardOp::Read)
    }

    /// Complete a paste with the clipboard text. Nothing is written unless
    /// the text decodes to a rectangular matrix and the target is still
    /// writable.
    pub fn finish_paste(&mut self, read: Result<String>) -> Result<()> {
        self.clipboard.finish(true)?;
        let text = read.map_err(|e| {
            error!(error = %e, "failed to read clipboard contents");
            e
        })?;
        let matrix = clipboard::text_to_matrix(&text, TAB)?;
        // The selection may have changed while the read was pending.
        clipboard::paste_precondition(&self.selection, self.view.schema())?;
        let target = self.selection.convex_hull();
        let outcome = clipboard::paste(&mut self.view, &matrix, &target)?;
        debug!(patches = outcome.patches.len(), rows = outcome.row_count, "pasted");
        self.apply(outcome.patches);
        self.listeners.emit(&GridEvent::Paste);
        Ok(())
    }

    /// Host-side paste in one step, for synchronous clipboards.
    pub fn paste_text(&mut self, text: &str) -> Result<()> {
        self.begin_paste()?;
        self.finish_paste(Ok(text.to_string()))
    }

    // ---- mutations -----------------------------------------------------

    /// Clear every selected cell, then drop trailing empty rows. When no row
    /// is left the model itself is removed.
    pub fn delete_selection(&mut self) -> Result<()> {
        if clipboard::is_selection_read_only(&self.selection, self.view.schema()) {
            warn!("delete rejected for read-only cells");
            return Err(GridError::locked_cells());
        }

        let col_count = self.col_count();
        let row_count = self.view.row_count();
        let mut patches = Vec::new();
        for area in self.selection.areas() {
            for row in area.row_indices().take_while(|&r| r < row_count) {
                for col in area.column_indices().filter(|&c| c < col_count) {
                    patches.extend(self.view.set_cell(row, col, None));
                }
            }
        }

        let mut remaining = self.view.row_count();
        while remaining > 0 {
            let last = remaining - 1;
            if self.view.get_row(last).iter().any(Option::is_some) {
                break;
            }
            patches.extend(self.view.delete_row(last));
            remaining = last;
        }
        if remaining == 0 {
            patches.extend(self.view.remove_model());
        }

        debug!(patches = patches.len(), rows = remaining, "selection deleted");
        self.apply(patches);
        Ok(())
    }

    /// Delete `rowCount` rows at the first row of every area.
    pub fn delete_rows(&mut self) -> Result<()> {
        if self.view.schema().read_only {
            warn!("delete rows rejected for read-only grid");
            return Err(GridError::locked_grid());
        }
        let mut patches = Vec::new();
        for area in self.selection.areas() {
            let first = u32::try_from(area.row_index.max(0)).unwrap_or(u32::MAX);
            for _ in 0..area.row_count {
                patches.extend(self.view.delete_row(first));
            }
        }
        self.apply(patches);
        Ok(())
    }

    /// Insert one empty row before the active row.
    pub fn insert_row(&mut self) -> Result<()> {
        if self.view.schema().read_only {
            warn!("insert row rejected for read-only grid");
            return Err(GridError::locked_grid());
        }
        let patches = self.view.splice(self.active.row);
        self.apply(patches);
        Ok(())
    }

    /// Header click: sort by `col` and reload the window.
    pub fn sort(&mut self, col: u32) -> Result<()> {
        if col >= self.col_count() {
            return Err(GridError::Schema(format!("no column {col}")));
        }
        self.commit();
        self.view.sort(col);
        self.refresh();
        Ok(())
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
    use crate::error::GridError;
    use crate::grid::tests::grid;
    use crate::provider::MatrixView;
    use crate::types::{CellValue, PatchOp, Range};

    #[test]
    fn select_all_toggles_header() {
        let mut g = grid(4);
        g.select_all();
        assert_eq!(g.get_selection(), Range::new(0, 0, 4, 3));
        assert!(!g.selection().header_selected());
        g.select_all();
        assert!(g.selection().header_selected());
        assert_eq!(g.get_selection(), Range::new(0, 0, 4, 3));
    }

    #[test]
    fn whole_row_and_column() {
        let mut g = grid(4);
        g.select(&Range::new(2, 1, 1, 1));
        g.select_column();
        assert_eq!(g.get_selection(), Range::new(0, 1, 4, 1));
        g.select_row();
        assert_eq!(g.get_selection(), Range::new(2, 0, 1, 3));
    }

    #[test]
    fn copy_with_header_after_double_select_all() {
        let mut g = grid(2);
        g.select_all();
        g.select_all();
        let text = g.begin_copy(false).unwrap();
        assert_eq!(text, "a\tn\tro\r\nr0\t\t\r\nr1\t\t\r\n");
        g.finish_copy(Ok(())).unwrap();
    }

    #[test]
    fn copy_rejects_multi_area() {
        let mut g = grid(3);
        g.add_selection(2, 0);
        assert!(matches!(g.begin_copy(false), Err(GridError::Precondition(_))));
    }

    #[test]
    fn pending_clipboard_blocks_second_operation() {
        let mut g = grid(3);
        g.begin_copy(false).unwrap();
        assert!(matches!(g.begin_paste(), Err(GridError::ClipboardBusy)));
        g.finish_copy(Err(GridError::Clipboard("denied".into()))).unwrap_err();
        g.begin_paste().unwrap();
    }

    #[test]
    fn cut_deletes_after_successful_write() {
        let mut g = grid(3);
        g.select(&Range::new(1, 0, 1, 1));
        assert_eq!(g.begin_copy(true).unwrap(), "r1\r\n");
        g.finish_copy(Ok(())).unwrap();
        assert_eq!(g.view().get_cell(1, 0), None);
        assert_eq!(g.row_count(), 3);
    }

    #[test]
    fn failed_read_writes_nothing() {
        let mut g = grid(2);
        g.begin_paste().unwrap();
        assert!(g
            .finish_paste(Err(GridError::Clipboard("denied".into())))
            .is_err());
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("r0")));
    }

    #[test]
    fn ragged_paste_writes_nothing() {
        let mut g = grid(2);
        let err = g.paste_text("x\ty\nz").unwrap_err();
        assert!(matches!(err, GridError::Format { .. }));
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("r0")));
    }

    #[test]
    fn delete_trims_trailing_empty_rows() {
        let mut g = grid(3);
        g.select(&Range::new(1, 0, 2, 2));
        g.delete_selection().unwrap();
        assert_eq!(g.row_count(), 1);
    }

    #[test]
    fn deleting_everything_removes_model() {
        let mut g = grid(2);
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&seen);
        g.on(
            crate::events::EventKind::DataChanged,
            Box::new(move |e| {
                if let crate::events::GridEvent::DataChanged(p) = e {
                    sink.borrow_mut().extend(p.clone());
                }
                Ok(())
            }),
        );
        g.select(&Range::new(0, 0, 2, 2));
        g.delete_selection().unwrap();
        assert_eq!(g.row_count(), 0);
        let last = seen.borrow().last().cloned().unwrap();
        assert_eq!((last.op, last.path.as_str()), (PatchOp::Remove, ""));
    }

    #[test]
    fn delete_rejects_read_only_columns() {
        let mut g = grid(2);
        g.select(&Range::new(0, 1, 1, 2));
        assert_eq!(
            g.delete_selection().unwrap_err().to_string(),
            "Parts of the cells are locked!"
        );
    }

    #[test]
    fn insert_and_delete_rows() {
        let mut g = grid(3);
        g.select(&Range::new(1, 0, 1, 1));
        g.insert_row().unwrap();
        assert_eq!(g.row_count(), 4);
        assert_eq!(g.view().get_cell(1, 0), None);
        assert_eq!(g.view().get_cell(2, 0), Some(CellValue::from("r1")));

        g.select(&Range::new(0, 0, 2, 1));
        g.delete_rows().unwrap();
        assert_eq!(g.row_count(), 2);
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("r1")));
    }

    #[test]
    fn sort_reloads_window() {
        let mut g = grid(3);
        g.sort(0).unwrap();
        g.sort(0).unwrap();
        assert_eq!(g.window_rows()[0][0], Some(CellValue::from("r2")));
        assert!(g.sort(9).is_err());
    }
}
