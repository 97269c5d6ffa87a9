//! Cell editing mutations.
//!
//! Applies committed editor text to the data provider.

use tracing::debug;

use crate::provider::MatrixView;
use crate::types::Patch;

/// Write committed editor text into `(row, col)`.
///
/// Returns `None` when the column is read-only and the text is discarded.
/// Otherwise the text is trimmed:
/// - Empty → clears the cell
/// - Anything else → parsed by the column's converter
pub(crate) fn commit_value<V: MatrixView + ?Sized>(
    view: &mut V,
    row: u32,
    col: u32,
    text: &str,
) -> Option<Vec<Patch>> {
    if view.schema().is_column_read_only(col) {
        debug!(row, col, "discarding edit of read-only cell");
        return None;
    }

    let trimmed = text.trim();
    let value = if trimmed.is_empty() {
        None
    } else {
        let converter = view.schema().column(col)?.converter();
        Some(converter.from_string(trimmed))
    };

    debug!(row, col, cleared = value.is_none(), "commit cell");
    Some(view.set_cell(row, col, value))
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
    use crate::types::{CellValue, ColumnSchema, ColumnType, GridSchema};

    fn view() -> RowMatrixView {
        let schema = GridSchema::new(vec![
            ColumnSchema::new("n", ColumnType::Number),
            ColumnSchema::new("locked", ColumnType::String).with_read_only(true),
        ]);
        RowMatrixView::new(schema, vec![vec![Some(CellValue::Number(1.0)), None]])
    }

    #[test]
    fn trims_and_parses() {
        let mut v = view();
        let patches = commit_value(&mut v, 0, 0, "  2.5 ").unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(v.get_cell(0, 0), Some(CellValue::Number(2.5)));
    }

    #[test]
    fn blank_text_clears_cell() {
        let mut v = view();
        commit_value(&mut v, 0, 0, "   ").unwrap();
        assert_eq!(v.get_cell(0, 0), None);
    }

    #[test]
    fn read_only_discards() {
        let mut v = view();
        assert!(commit_value(&mut v, 0, 1, "x").is_none());
        assert_eq!(v.get_cell(0, 1), None);
    }
}
