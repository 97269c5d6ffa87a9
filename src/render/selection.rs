//! Selection overlay helpers.
//!
//! These helpers keep highlight math testable without depending on DOM APIs.
//! Ranges are logical; they are shifted into window coordinates and clipped
//! to the window before use.

use serde::Serialize;

use crate::layout::{GridLayout, ViewportWindow};
use crate::types::Range;

/// Background state of one rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    #[default]
    None,
    Selected,
    Active,
}

/// Pixel rectangle of a selection area inside the cell area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Part of `range` visible in `window`, in window-relative coordinates.
pub fn window_clip(range: &Range, window: &ViewportWindow) -> Option<Range> {
    let local = range.offset(-i64::from(window.first_row()), 0);
    let bounds = Range::new(0, 0, window.viewport_row_count(), window.col_count());
    local.intersect(&bounds)
}

/// Per-cell highlight for the window: selected areas, then the active cell
/// on top. Everything stays `None` when the grid has no focus.
pub fn highlight_matrix(
    areas: &[Range],
    active: &Range,
    window: &ViewportWindow,
    focused: bool,
) -> Vec<Vec<Highlight>> {
    let cols = usize::try_from(window.col_count()).unwrap_or(0);
    let rows = usize::try_from(window.viewport_row_count()).unwrap_or(0);
    let mut matrix = vec![vec![Highlight::None; cols]; rows];
    if !focused {
        return matrix;
    }

    let mut mark = |range: &Range, highlight: Highlight| {
        let Some(clip) = window_clip(range, window) else {
            return;
        };
        for row in clip.row_indices() {
            for col in clip.column_indices() {
                let cell = usize::try_from(row)
                    .ok()
                    .and_then(|r| matrix.get_mut(r))
                    .and_then(|cells| cells.get_mut(usize::try_from(col).ok()?));
                if let Some(cell) = cell {
                    *cell = highlight;
                }
            }
        }
    };

    for area in areas {
        mark(area, Highlight::Selected);
    }
    mark(active, Highlight::Active);
    matrix
}

/// Overlay rectangles for every selection area visible in the window.
pub fn selection_rects(
    areas: &[Range],
    window: &ViewportWindow,
    layout: &GridLayout,
) -> Vec<SelectionRect> {
    areas
        .iter()
        .filter_map(|area| window_clip(area, window))
        .map(|clip| {
            let top = u32::try_from(clip.row_index).unwrap_or(0);
            let left = u32::try_from(clip.column_index).unwrap_or(0);
            let first = layout.cell_rect(top, left);
            let last = layout.cell_rect(
                top + clip.row_count.saturating_sub(1),
                left + clip.column_count.saturating_sub(1),
            );
            SelectionRect {
                x: first.x,
                y: first.y,
                w: last.x + last.width - first.x,
                h: last.y + last.height - first.y,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::types::{ColumnSchema, ColumnType, GridSchema};

    fn window(first_row: i64) -> ViewportWindow {
        let mut w = ViewportWindow::new(3, 2);
        w.set_first_row(first_row);
        w
    }

    #[test]
    fn clip_shifts_into_window() {
        let clip = window_clip(&Range::new(4, 0, 10, 1), &window(5)).unwrap();
        assert_eq!(clip, Range::new(0, 0, 3, 1));
        assert!(window_clip(&Range::new(0, 0, 2, 2), &window(5)).is_none());
    }

    #[test]
    fn active_overrides_selection() {
        let m = highlight_matrix(
            &[Range::new(5, 0, 2, 2)],
            &Range::new(6, 1, 1, 1),
            &window(5),
            true,
        );
        assert_eq!(m[0], vec![Highlight::Selected, Highlight::Selected]);
        assert_eq!(m[1], vec![Highlight::Selected, Highlight::Active]);
        assert_eq!(m[2], vec![Highlight::None, Highlight::None]);
    }

    #[test]
    fn unfocused_has_no_highlight() {
        let m = highlight_matrix(&[Range::new(0, 0, 3, 2)], &Range::new(0, 0, 1, 1), &window(0), false);
        assert!(m.iter().flatten().all(|h| *h == Highlight::None));
    }

    #[test]
    fn rect_spans_clipped_area() {
        let schema = GridSchema::new(vec![
            ColumnSchema::new("a", ColumnType::String).with_width(92.0),
            ColumnSchema::new("b", ColumnType::String).with_width(42.0),
        ]);
        let layout = GridLayout::new(&schema, &GridConfig::light());
        let rects = selection_rects(&[Range::new(4, 0, 10, 2)], &window(5), &layout);
        assert_eq!(rects, vec![SelectionRect { x: 0.0, y: 0.0, w: 150.0, h: 72.0 }]);
    }
}
