use super::{CellPos, Range};

/// Multi-area cell selection.
///
/// `areas` keeps insertion order: the last area is the one that `expand`
/// reshapes. The convex hull is derived from the areas on every read, so it
/// can never go stale.
#[derive(Debug, Clone)]
pub struct Selection {
    areas: Vec<Range>,
    /// Anchor cell of the most recent area.
    initial: CellPos,
    /// Cell opposite the anchor.
    head: CellPos,
    /// Set by the second "select all"; makes copy include the header row.
    header_selected: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    /// A selection holding the single cell `(0, 0)`.
    pub fn new() -> Self {
        let origin = CellPos::default();
        Self {
            areas: vec![Range::cell(origin)],
            initial: origin,
            head: origin,
            header_selected: false,
        }
    }

    /// Clear all areas and select the single cell `(row, col)`.
    pub fn set(&mut self, row: u32, col: u32) {
        let cell = CellPos::new(row, col);
        self.initial = cell;
        self.head = cell;
        self.areas.clear();
        self.areas.push(Range::cell(cell));
        self.header_selected = false;
    }

    /// Move the head and reshape the most recent area to span anchor..head.
    pub fn expand(&mut self, row: u32, col: u32) {
        self.head = CellPos::new(row, col);
        let area = Range::spanning(self.initial, self.head);
        match self.areas.last_mut() {
            Some(last) => *last = area,
            None => self.areas.push(area),
        }
        self.header_selected = false;
    }

    /// Append an independent 1×1 area; it becomes the area `expand` acts on.
    pub fn add(&mut self, row: u32, col: u32) {
        let cell = CellPos::new(row, col);
        self.initial = cell;
        self.head = cell;
        self.areas.push(Range::cell(cell));
        self.header_selected = false;
    }

    pub fn areas(&self) -> &[Range] {
        &self.areas
    }

    pub fn initial(&self) -> CellPos {
        self.initial
    }

    pub fn head(&self) -> CellPos {
        self.head
    }

    pub fn is_multi_area(&self) -> bool {
        self.areas.len() > 1
    }

    /// Smallest rectangle containing every area.
    pub fn convex_hull(&self) -> Range {
        Range::bounding(&self.areas).unwrap_or_else(|| Range::cell(self.initial))
    }

    pub fn header_selected(&self) -> bool {
        self.header_selected
    }

    pub(crate) fn select_header(&mut self) {
        self.header_selected = true;
    }

    pub(crate) fn clear_header(&mut self) {
        self.header_selected = false;
    }

    /// Whether `range` is exactly the hull of a single-area selection.
    pub fn is_exactly(&self, range: &Range) -> bool {
        self.areas.len() == 1 && self.convex_hull() == *range
    }

    /// Logical columns touched by any area.
    pub fn columns(&self) -> impl Iterator<Item = u32> + '_ {
        self.areas.iter().flat_map(Range::column_indices)
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

    fn assert_hull_consistent(sel: &Selection) {
        let recomputed = Range::bounding(sel.areas()).unwrap();
        assert_eq!(sel.convex_hull(), recomputed);
        let last = sel.areas().last().unwrap();
        assert!(last.contains(i64::from(sel.initial().row), i64::from(sel.initial().col)));
        assert!(last.contains(i64::from(sel.head().row), i64::from(sel.head().col)));
    }

    #[test]
    fn starts_at_origin() {
        let sel = Selection::new();
        assert_eq!(sel.areas(), &[Range::new(0, 0, 1, 1)]);
        assert_eq!(sel.convex_hull(), Range::new(0, 0, 1, 1));
    }

    #[test]
    fn set_then_expand_spans_rectangle() {
        let mut sel = Selection::new();
        sel.set(2, 3);
        sel.expand(4, 1);
        assert_eq!(sel.areas(), &[Range::new(2, 1, 3, 3)]);
        assert_eq!(sel.head(), CellPos::new(4, 1));
        assert_eq!(sel.initial(), CellPos::new(2, 3));
        assert_hull_consistent(&sel);
    }

    #[test]
    fn add_keeps_previous_areas() {
        let mut sel = Selection::new();
        sel.set(0, 0);
        sel.expand(1, 1);
        sel.add(5, 4);
        assert!(sel.is_multi_area());
        assert_eq!(sel.areas().len(), 2);
        assert_eq!(sel.convex_hull(), Range::new(0, 0, 6, 5));
        assert_hull_consistent(&sel);
    }

    #[test]
    fn expand_after_add_reshapes_only_last_area() {
        let mut sel = Selection::new();
        sel.set(0, 0);
        sel.add(3, 3);
        sel.expand(4, 5);
        assert_eq!(sel.areas(), &[Range::new(0, 0, 1, 1), Range::new(3, 3, 2, 3)]);
        assert_hull_consistent(&sel);
    }

    #[test]
    fn hull_stays_consistent_over_mixed_operations() {
        let mut sel = Selection::new();
        let ops: [(u8, u32, u32); 8] = [
            (0, 3, 3),
            (1, 0, 7),
            (2, 10, 1),
            (1, 12, 0),
            (2, 2, 2),
            (1, 2, 2),
            (0, 1, 1),
            (1, 9, 9),
        ];
        for (op, row, col) in ops {
            match op {
                0 => sel.set(row, col),
                1 => sel.expand(row, col),
                _ => sel.add(row, col),
            }
            assert_hull_consistent(&sel);
        }
    }

    #[test]
    fn header_flag_cleared_by_selection_change() {
        let mut sel = Selection::new();
        sel.select_header();
        assert!(sel.header_selected());
        sel.expand(1, 1);
        assert!(!sel.header_selected());
    }
}
