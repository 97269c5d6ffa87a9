//! Viewport window state: which logical rows are materialized.

use crate::types::Range;

/// Rows moved per wheel tick.
pub const WHEEL_ROWS: i64 = 3;

/// Who asked for a scroll. The scroll indicator is not updated when it is the
/// source itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    Program,
    ScrollBar,
}

/// Contiguous slice of logical rows currently materialized for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWindow {
    first_row: u32,
    viewport_row_count: u32,
    col_count: u32,
}

impl ViewportWindow {
    pub fn new(viewport_row_count: u32, col_count: u32) -> Self {
        Self {
            first_row: 0,
            viewport_row_count,
            col_count,
        }
    }

    pub fn first_row(&self) -> u32 {
        self.first_row
    }

    pub fn viewport_row_count(&self) -> u32 {
        self.viewport_row_count
    }

    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    /// Rows moved by `PageUp` / `PageDown`.
    pub fn page_increment(&self) -> u32 {
        self.viewport_row_count.max(1)
    }

    /// The logical rectangle covered by the window.
    pub fn range(&self) -> Range {
        Range::new(
            i64::from(self.first_row),
            0,
            self.viewport_row_count,
            self.col_count,
        )
    }

    /// Move the window; negative targets clamp to row 0.
    pub fn set_first_row(&mut self, first_row: i64) -> u32 {
        self.first_row = u32::try_from(first_row.max(0)).unwrap_or(u32::MAX);
        self.first_row
    }

    pub fn resize(&mut self, viewport_row_count: u32) {
        self.viewport_row_count = viewport_row_count;
    }

    /// Position of `row` inside the window, negative above it.
    pub fn view_row(&self, row: i64) -> i64 {
        row - i64::from(self.first_row)
    }

    pub fn contains_row(&self, row: i64) -> bool {
        let view_row = self.view_row(row);
        view_row >= 0 && view_row < i64::from(self.viewport_row_count)
    }

    /// Highest first row that still fills the window from the model.
    pub fn max_first_row(&self, row_count: u32) -> u32 {
        row_count.saturating_sub(self.viewport_row_count)
    }

    /// Target first row for one wheel tick; `None` when the window does not move.
    pub fn wheel_target(&self, delta_y: f64, row_count: u32) -> Option<u32> {
        let sign = if delta_y > 0.0 {
            1
        } else if delta_y < 0.0 {
            -1
        } else {
            return None;
        };
        let target = i64::from(self.first_row) + WHEEL_ROWS * sign;
        if target < 0 {
            return None;
        }
        let target = target.min(i64::from(self.max_first_row(row_count).max(self.first_row)));
        let target = u32::try_from(target).ok()?;
        (target != self.first_row).then_some(target)
    }

    /// Decide how keyboard navigation scrolls.
    ///
    /// `row` is the navigation target, `origin` the row navigation started
    /// from and `row_offset` the requested vertical move. Returns the row the
    /// active cell should end on and the new first row, if the window moves.
    /// Scrolling by the same offset keeps the active row's position inside
    /// the window.
    pub fn navigation_scroll(&self, row: i64, origin: i64, row_offset: i64) -> (i64, Option<i64>) {
        if self.contains_row(row) {
            return (row, None);
        }
        let first = i64::from(self.first_row);
        if first == 0 && row_offset < 0 {
            if self.view_row(row) >= 0 {
                (row, None)
            } else if row_offset == -1 {
                (0, None)
            } else {
                (origin, None)
            }
        } else if first + row_offset < 0 {
            (row, Some(0))
        } else if row_offset != 0 {
            (row, Some(first + row_offset))
        } else if row < first {
            (row, Some(row))
        } else {
            // Sideways move (column wrap) below the window.
            (row, Some(row - i64::from(self.viewport_row_count) + 1))
        }
    }
}

/// Model of the vertical scrollbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollIndicator {
    pub max: u32,
    pub value: u32,
}

impl ScrollIndicator {
    pub fn update(&mut self, viewport_row_count: u32, row_count: u32, first_row: u32) {
        self.max = viewport_row_count.max(row_count.saturating_sub(viewport_row_count));
        self.value = first_row;
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
    use test_case::test_case;

    fn window(first_row: i64) -> ViewportWindow {
        let mut w = ViewportWindow::new(10, 4);
        w.set_first_row(first_row);
        w
    }

    #[test]
    fn first_row_clamps_at_zero() {
        let mut w = window(0);
        assert_eq!(w.set_first_row(-5), 0);
        assert_eq!(w.range(), Range::new(0, 0, 10, 4));
    }

    #[test]
    fn page_increment_never_zero() {
        assert_eq!(ViewportWindow::new(0, 3).page_increment(), 1);
        assert_eq!(window(0).page_increment(), 10);
    }

    #[test_case(0, 100.0, 100, Some(3) ; "down one tick")]
    #[test_case(2, -100.0, 100, None ; "would go above top")]
    #[test_case(6, -1.0, 100, Some(3) ; "up one tick")]
    #[test_case(89, 5.0, 100, Some(90) ; "clamped at bottom")]
    #[test_case(90, 5.0, 100, None ; "already at bottom")]
    #[test_case(0, 0.0, 100, None ; "no delta")]
    fn wheel(first_row: i64, delta: f64, rows: u32, expected: Option<u32>) {
        assert_eq!(window(first_row).wheel_target(delta, rows), expected);
    }

    #[test_case(0, 3, 2, 1, (3, None) ; "inside window")]
    #[test_case(0, 10, 9, 1, (10, Some(1)) ; "step past bottom")]
    #[test_case(0, -1, 0, -1, (0, None) ; "up at top snaps to zero")]
    #[test_case(0, -7, 3, -10, (3, None) ; "page up at top keeps row")]
    #[test_case(5, 0, 10, -10, (0, Some(0)) ; "page up near top")]
    #[test_case(20, 30, 20, 10, (30, Some(30)) ; "page down keeps view row")]
    #[test_case(20, 19, 20, -1, (19, Some(19)) ; "step above window")]
    fn navigation(first: i64, row: i64, origin: i64, dr: i64, expected: (i64, Option<i64>)) {
        assert_eq!(window(first).navigation_scroll(row, origin, dr), expected);
    }

    #[test]
    fn sideways_wrap_below_window_scrolls_minimally() {
        assert_eq!(window(0).navigation_scroll(10, 9, 0), (10, Some(1)));
        assert_eq!(window(5).navigation_scroll(4, 5, 0), (4, Some(4)));
    }

    #[test]
    fn indicator_max_covers_short_models() {
        let mut s = ScrollIndicator::default();
        s.update(10, 4, 0);
        assert_eq!(s.max, 10);
        s.update(10, 100, 7);
        assert_eq!((s.max, s.value), (90, 7));
    }
}
