//! Paste engine: place a decoded clipboard matrix into the target range.

use tracing::{debug, warn};

use crate::error::{GridError, Result};
use crate::provider::MatrixView;
use crate::types::{GridSchema, Patch, Range, Selection};

/// Result of a paste: every patch written and the model's row count after it.
#[derive(Debug, Clone, PartialEq)]
pub struct PasteOutcome {
    pub patches: Vec<Patch>,
    pub row_count: u32,
}

/// Whether any column touched by the selection is read-only.
pub fn is_selection_read_only(selection: &Selection, schema: &GridSchema) -> bool {
    selection.columns().any(|col| schema.is_column_read_only(col))
}

/// Checks run before reading the clipboard: a single area that is fully
/// writable.
pub fn paste_precondition(selection: &Selection, schema: &GridSchema) -> Result<()> {
    if selection.is_multi_area() {
        return Err(GridError::multi_selection());
    }
    if is_selection_read_only(selection, schema) {
        return Err(GridError::locked_cells());
    }
    Ok(())
}

/// Paste `matrix` into `target`.
///
/// When both target extents are exact multiples of the source extents the
/// source is tiled across the target. Otherwise it is placed once at the
/// target's top-left corner, clipped to the schema's columns. Empty source
/// cells clear their destination.
pub fn paste<V: MatrixView + ?Sized>(
    view: &mut V,
    matrix: &[Vec<String>],
    target: &Range,
) -> Result<PasteOutcome> {
    let source_rows = u32::try_from(matrix.len()).unwrap_or(u32::MAX);
    let source_cols = matrix
        .first()
        .map_or(0, |r| u32::try_from(r.len()).unwrap_or(u32::MAX));
    if source_rows == 0 || source_cols == 0 {
        warn!("nothing to paste");
        return Err(GridError::Precondition("You have nothing to paste".into()));
    }

    let top = u32::try_from(target.row_index.max(0)).unwrap_or(u32::MAX);
    let left = u32::try_from(target.column_index.max(0)).unwrap_or(u32::MAX);

    let mut patches = Vec::new();
    if target.row_count % source_rows == 0 && target.column_count % source_cols == 0 {
        let row_tiles = target.row_count / source_rows;
        let col_tiles = target.column_count / source_cols;
        debug!(row_tiles, col_tiles, "tiling paste");
        for i in 0..row_tiles {
            for j in 0..col_tiles {
                patches.extend(paste_single(
                    view,
                    top.saturating_add(i * source_rows),
                    left.saturating_add(j * source_cols),
                    matrix,
                ));
            }
        }
    } else {
        debug!(source_rows, source_cols, "single paste");
        patches = paste_single(view, top, left, matrix);
    }

    Ok(PasteOutcome {
        patches,
        row_count: view.row_count(),
    })
}

/// Write `matrix` once with its top-left cell at `(top, left)`.
fn paste_single<V: MatrixView + ?Sized>(
    view: &mut V,
    top: u32,
    left: u32,
    matrix: &[Vec<String>],
) -> Vec<Patch> {
    let col_count = view.schema().column_count();
    let mut patches = Vec::new();
    for (row, source_row) in (top..).zip(matrix) {
        for (col, text) in (left..col_count).zip(source_row) {
            let value = if text.is_empty() {
                None
            } else {
                view.schema()
                    .column(col)
                    .map(|c| c.converter().from_string(text))
            };
            patches.extend(view.set_cell(row, col, value));
        }
    }
    patches
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
    use crate::provider::RowMatrixView;
    use crate::types::{CellValue, ColumnSchema, ColumnType};

    fn view(cols: usize, rows: usize) -> RowMatrixView {
        let schema = GridSchema::new(
            (0..cols)
                .map(|i| ColumnSchema::new(format!("c{i}"), ColumnType::String))
                .collect(),
        );
        RowMatrixView::new(schema, vec![vec![None; cols]; rows])
    }

    fn text(v: &RowMatrixView, row: u32, col: u32) -> Option<String> {
        v.get_cell(row, col).and_then(|c| c.as_str().map(str::to_string))
    }

    #[test]
    fn tiles_exact_multiples() {
        let mut v = view(4, 2);
        let source = vec![vec!["x".to_string(), "y".to_string()]];
        let outcome = paste(&mut v, &source, &Range::new(0, 0, 2, 4)).unwrap();
        assert_eq!(outcome.patches.len(), 8);
        for row in 0..2 {
            let got: Vec<_> = (0..4).map(|c| text(&v, row, c).unwrap()).collect();
            assert_eq!(got, ["x", "y", "x", "y"]);
        }
    }

    #[test]
    fn single_placement_clips_columns_and_grows_rows() {
        let mut v = view(3, 1);
        let source = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ];
        let outcome = paste(&mut v, &source, &Range::new(0, 2, 1, 1)).unwrap();
        assert_eq!(outcome.row_count, 2);
        assert_eq!(text(&v, 0, 2).as_deref(), Some("a"));
        assert_eq!(text(&v, 1, 2).as_deref(), Some("c"));
    }

    #[test]
    fn empty_source_cell_clears() {
        let mut v = view(2, 1);
        v.set_cell(0, 0, Some(CellValue::from("old")));
        let source = vec![vec![String::new(), "n".to_string()]];
        paste(&mut v, &source, &Range::new(0, 0, 1, 2)).unwrap();
        assert_eq!(v.get_cell(0, 0), None);
    }

    #[test]
    fn nothing_to_paste() {
        let mut v = view(2, 1);
        let err = paste(&mut v, &[], &Range::new(0, 0, 1, 1)).unwrap_err();
        assert!(matches!(err, GridError::Precondition(_)));
    }

    #[test]
    fn precondition_rejects_multi_area_and_read_only() {
        let schema = GridSchema::new(vec![
            ColumnSchema::new("a", ColumnType::String),
            ColumnSchema::new("b", ColumnType::String).with_read_only(true),
        ]);
        let mut sel = Selection::new();
        assert!(paste_precondition(&sel, &schema).is_ok());
        sel.add(3, 0);
        assert_eq!(
            paste_precondition(&sel, &schema).unwrap_err().to_string(),
            "This action is not possible with multi-selections."
        );
        sel.set(0, 0);
        sel.expand(0, 1);
        assert_eq!(
            paste_precondition(&sel, &schema).unwrap_err().to_string(),
            "Parts of the cells are locked!"
        );
    }
}
