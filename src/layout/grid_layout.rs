//! Pre-computed column geometry and pixel hit testing.

use crate::config::GridConfig;
use crate::types::{CellPos, GridSchema};

/// Rectangle of a rendered cell, relative to the cell area's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Column positions and row height for the cell area.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Right edge of each column (`column_ends[i]` = x where column i ends)
    pub column_ends: Vec<f32>,
    pub row_height: f32,
}

impl GridLayout {
    /// Each column occupies its content width plus padding and borders.
    pub fn new(schema: &GridSchema, config: &GridConfig) -> Self {
        let chrome = 2.0 * (config.cell_padding + config.border_width);
        let mut x = 0.0;
        let column_ends = schema
            .column_schemas
            .iter()
            .map(|column| {
                x += column.width + chrome;
                x
            })
            .collect();
        Self {
            column_ends,
            row_height: config.row_height(),
        }
    }

    pub fn total_width(&self) -> f32 {
        self.column_ends.last().copied().unwrap_or(0.0)
    }

    pub fn column_start(&self, col: u32) -> f32 {
        match col.checked_sub(1) {
            Some(prev) => usize::try_from(prev)
                .ok()
                .and_then(|i| self.column_ends.get(i))
                .copied()
                .unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Rectangle of window row `view_row`, column `col`.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_rect(&self, view_row: u32, col: u32) -> CellRect {
        let x = self.column_start(col);
        let end = usize::try_from(col)
            .ok()
            .and_then(|i| self.column_ends.get(i))
            .copied()
            .unwrap_or(x);
        CellRect {
            x,
            y: view_row as f32 * self.row_height,
            width: end - x,
            height: self.row_height,
        }
    }

    /// Logical cell under a point of the cell area. The column is the first
    /// one whose right edge lies past `x`, clamped to the last column.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell_at_point(&self, x: f32, y: f32, first_row: u32) -> CellPos {
        let view_row = if self.row_height > 0.0 && y > 0.0 {
            (y / self.row_height).trunc().min(u32::MAX as f32) as u32
        } else {
            0
        };
        let last = self.column_ends.len().saturating_sub(1);
        let col = self
            .column_ends
            .iter()
            .position(|&end| end > x)
            .unwrap_or(last);
        CellPos::new(
            first_row.saturating_add(view_row),
            u32::try_from(col).unwrap_or(u32::MAX),
        )
    }
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
    use crate::types::{ColumnSchema, ColumnType};

    fn layout() -> GridLayout {
        let schema = GridSchema::new(vec![
            ColumnSchema::new("a", ColumnType::String).with_width(92.0),
            ColumnSchema::new("b", ColumnType::String).with_width(42.0),
        ]);
        GridLayout::new(&schema, &GridConfig::light())
    }

    #[test]
    fn column_edges_include_padding_and_border() {
        let l = layout();
        assert_eq!(l.column_ends, vec![100.0, 150.0]);
        assert_eq!(l.row_height, 24.0);
        assert_eq!(l.total_width(), 150.0);
    }

    #[test]
    fn hit_test() {
        let l = layout();
        assert_eq!(l.cell_at_point(10.0, 5.0, 0), CellPos::new(0, 0));
        assert_eq!(l.cell_at_point(100.0, 30.0, 7), CellPos::new(8, 1));
        // Right of the last column clamps to it.
        assert_eq!(l.cell_at_point(500.0, 0.0, 0), CellPos::new(0, 1));
    }

    #[test]
    fn rects() {
        let l = layout();
        let r = l.cell_rect(2, 1);
        assert_eq!((r.x, r.y, r.width, r.height), (100.0, 48.0, 50.0, 24.0));
    }
}
