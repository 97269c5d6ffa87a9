//! Active-cell movement.

use tracing::debug;

use super::Grid;
use crate::layout::ScrollSource;
use crate::provider::MatrixView;

impl<V: MatrixView> Grid<V> {
    /// Move the active cell (or, with `expand`, the selection head) by the
    /// given offsets.
    ///
    /// A pending edit is committed first. Moving left from column 0 wraps to
    /// the last column of the previous row (of the last row when already on
    /// row 0); moving right from the last column wraps to column 0 of the next
    /// row. The window scrolls as decided by
    /// [`ViewportWindow::navigation_scroll`](crate::layout::ViewportWindow::navigation_scroll).
    pub fn navigate(&mut self, row_offset: i64, col_offset: i64, expand: bool) {
        if self.active.is_editing() {
            self.commit();
        }
        let col_count = i64::from(self.col_count());
        if col_count == 0 {
            return;
        }

        let origin = if expand {
            self.selection.head()
        } else {
            self.active.pos()
        };
        let mut row = i64::from(origin.row) + row_offset;
        let mut col = i64::from(origin.col) + col_offset;
        if col < 0 {
            if row > 0 {
                row -= 1;
            } else {
                row = i64::from(self.row_count) - 1;
            }
            col = col_count - 1;
        } else if col >= col_count {
            col = 0;
            row += 1;
        }

        let (row, scroll) = self
            .window
            .navigation_scroll(row, i64::from(origin.row), row_offset);
        if let Some(first_row) = scroll {
            self.set_first_row(first_row, ScrollSource::Program);
        }

        let row = u32::try_from(row.max(0)).unwrap_or(u32::MAX);
        let col = u32::try_from(col).unwrap_or(0);
        debug!(row, col, expand, "navigate");
        if expand {
            self.expand_selection(row, col);
        } else {
            self.set_selection(row, col);
            self.move_active(row, col);
        }
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
    use crate::grid::tests::grid;
    use crate::types::{CellPos, Range};

    #[test]
    fn right_from_last_column_wraps_to_next_row() {
        let mut g = grid(5);
        g.select(&Range::new(2, 2, 1, 1));
        g.navigate(0, 1, false);
        assert_eq!(g.active().pos(), CellPos::new(3, 0));
        assert_eq!(g.get_selection(), Range::new(3, 0, 1, 1));
    }

    #[test]
    fn left_from_first_column_wraps_to_previous_row() {
        let mut g = grid(5);
        g.select(&Range::new(2, 0, 1, 1));
        g.navigate(0, -1, false);
        assert_eq!(g.active().pos(), CellPos::new(1, 2));
    }

    #[test]
    fn left_from_origin_wraps_to_last_row() {
        let mut g = grid(5);
        g.navigate(0, -1, false);
        assert_eq!(g.active().pos(), CellPos::new(4, 2));
    }

    #[test]
    fn up_at_top_stays_on_row_zero() {
        let mut g = grid(50);
        g.navigate(-1, 0, false);
        assert_eq!(g.active().pos(), CellPos::new(0, 0));
        assert_eq!(g.window().first_row(), 0);
    }

    #[test]
    fn page_up_at_top_keeps_row() {
        let mut g = grid(50);
        g.select(&Range::new(3, 0, 1, 1));
        g.navigate(-10, 0, false);
        assert_eq!(g.active().pos(), CellPos::new(3, 0));
    }

    #[test]
    fn stepping_past_bottom_scrolls_one_row() {
        let mut g = grid(50);
        g.select(&Range::new(9, 0, 1, 1));
        g.navigate(1, 0, false);
        assert_eq!(g.active().pos(), CellPos::new(10, 0));
        assert_eq!(g.window().first_row(), 1);
    }

    #[test]
    fn page_down_preserves_view_row() {
        let mut g = grid(50);
        g.select(&Range::new(4, 0, 1, 1));
        for _ in 0..2 {
            g.navigate(10, 0, false);
        }
        assert_eq!(g.active().pos(), CellPos::new(24, 0));
        assert_eq!(g.window().first_row(), 20);
    }

    #[test]
    fn shift_arrow_expands_from_head() {
        let mut g = grid(10);
        g.select(&Range::new(2, 1, 1, 1));
        g.navigate(1, 0, true);
        g.navigate(0, 1, true);
        assert_eq!(g.get_selection(), Range::new(2, 1, 2, 2));
        assert_eq!(g.active().pos(), CellPos::new(2, 1));
    }

    #[test]
    fn navigation_commits_pending_edit() {
        let mut g = grid(3);
        assert!(g.begin_input("q"));
        g.navigate(1, 0, false);
        assert_eq!(
            g.view().rows()[0][0],
            Some(crate::types::CellValue::from("q"))
        );
    }
}
