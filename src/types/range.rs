use serde::{Deserialize, Serialize};

/// Half-open interval `[min, sup)` on one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub min: i64,
    pub sup: i64,
}

impl Interval {
    pub fn new(min: i64, sup: i64) -> Self {
        Self { min, sup }
    }

    /// Number of indices covered, `0` for an empty or inverted interval.
    pub fn len(&self) -> u32 {
        u32::try_from((self.sup - self.min).max(0)).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.sup <= self.min
    }
}

/// Overlap of two intervals, or `None` when they do not overlap.
pub fn intersect_interval(i1: Interval, i2: Interval) -> Option<Interval> {
    let min = i1.min.max(i2.min);
    let sup = i1.sup.min(i2.sup);
    if sup <= min {
        return None;
    }
    Some(Interval { min, sup })
}

/// A single cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Rectangular region in logical grid coordinates.
///
/// Origins are signed so a range can be translated into window-relative
/// coordinates (rows above the window become negative) and then clipped with
/// [`Range::intersect`]. A zero-area range is empty and never intersects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub row_index: i64,
    pub column_index: i64,
    pub row_count: u32,
    pub column_count: u32,
}

impl Range {
    pub fn new(row_index: i64, column_index: i64, row_count: u32, column_count: u32) -> Self {
        Self {
            row_index,
            column_index,
            row_count,
            column_count,
        }
    }

    /// The 1×1 range covering `cell`.
    pub fn cell(cell: CellPos) -> Self {
        Self::new(i64::from(cell.row), i64::from(cell.col), 1, 1)
    }

    /// Smallest range spanning both corner cells (inclusive).
    pub fn spanning(a: CellPos, b: CellPos) -> Self {
        let row = a.row.min(b.row);
        let col = a.col.min(b.col);
        Self::new(
            i64::from(row),
            i64::from(col),
            1 + a.row.max(b.row) - row,
            1 + a.col.max(b.col) - col,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.column_count == 0
    }

    /// Exclusive end row.
    pub fn row_end(&self) -> i64 {
        self.row_index + i64::from(self.row_count)
    }

    /// Exclusive end column.
    pub fn column_end(&self) -> i64 {
        self.column_index + i64::from(self.column_count)
    }

    pub fn rows(&self) -> Interval {
        Interval::new(self.row_index, self.row_end())
    }

    pub fn columns(&self) -> Interval {
        Interval::new(self.column_index, self.column_end())
    }

    /// Intersect both axes independently; `None` if either axis has no overlap.
    pub fn intersect(&self, other: &Range) -> Option<Range> {
        let row = intersect_interval(self.rows(), other.rows())?;
        let col = intersect_interval(self.columns(), other.columns())?;
        Some(Range::new(row.min, col.min, row.len(), col.len()))
    }

    /// Copy of this range translated by the given offsets.
    #[must_use]
    pub fn offset(&self, row_offset: i64, col_offset: i64) -> Range {
        Range::new(
            self.row_index + row_offset,
            self.column_index + col_offset,
            self.row_count,
            self.column_count,
        )
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= self.row_index && row < self.row_end() && col >= self.column_index && col < self.column_end()
    }

    /// Tight bounding box of `ranges`, `None` when there are none.
    pub fn bounding<'a>(ranges: impl IntoIterator<Item = &'a Range>) -> Option<Range> {
        let mut iter = ranges.into_iter();
        let first = iter.next()?;
        let (mut row_min, mut row_sup) = (first.row_index, first.row_end());
        let (mut col_min, mut col_sup) = (first.column_index, first.column_end());
        for r in iter {
            row_min = row_min.min(r.row_index);
            row_sup = row_sup.max(r.row_end());
            col_min = col_min.min(r.column_index);
            col_sup = col_sup.max(r.column_end());
        }
        Some(Range::new(
            row_min,
            col_min,
            Interval::new(row_min, row_sup).len(),
            Interval::new(col_min, col_sup).len(),
        ))
    }

    /// Logical row indices covered by this range, skipping negative rows.
    pub fn row_indices(&self) -> impl Iterator<Item = u32> {
        let start = u32::try_from(self.row_index.max(0)).unwrap_or(u32::MAX);
        let end = u32::try_from(self.row_end().max(0)).unwrap_or(u32::MAX);
        start..end
    }

    /// Logical column indices covered by this range, skipping negative columns.
    pub fn column_indices(&self) -> impl Iterator<Item = u32> {
        let start = u32::try_from(self.column_index.max(0)).unwrap_or(u32::MAX);
        let end = u32::try_from(self.column_end().max(0)).unwrap_or(u32::MAX);
        start..end
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Range({}, {}, {}, {})",
            self.row_index, self.column_index, self.row_count, self.column_count
        )
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

    #[test]
    fn interval_overlap() {
        let i = intersect_interval(Interval::new(0, 5), Interval::new(3, 8)).unwrap();
        assert_eq!(i, Interval::new(3, 5));
        assert_eq!(i.len(), 2);
    }

    #[test]
    fn interval_touching_is_none() {
        assert!(intersect_interval(Interval::new(0, 3), Interval::new(3, 6)).is_none());
    }

    #[test]
    fn intersect_is_commutative() {
        let ranges = [
            Range::new(0, 0, 3, 3),
            Range::new(2, 1, 4, 1),
            Range::new(-2, 0, 3, 10),
            Range::new(5, 5, 1, 1),
            Range::new(1, 1, 0, 4),
        ];
        for a in &ranges {
            for b in &ranges {
                assert_eq!(a.intersect(b), b.intersect(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn intersect_none_iff_axis_disjoint() {
        let a = Range::new(0, 0, 2, 2);
        // Rows overlap, columns do not.
        assert!(a.intersect(&Range::new(1, 2, 2, 2)).is_none());
        // Columns overlap, rows do not.
        assert!(a.intersect(&Range::new(2, 1, 2, 2)).is_none());
        assert_eq!(
            a.intersect(&Range::new(1, 1, 5, 5)),
            Some(Range::new(1, 1, 1, 1))
        );
    }

    #[test]
    fn empty_range_never_intersects() {
        let empty = Range::new(0, 0, 0, 5);
        assert!(empty.is_empty());
        assert!(empty.intersect(&Range::new(0, 0, 10, 10)).is_none());
    }

    #[test]
    fn offset_preserves_extent() {
        let r = Range::new(10, 2, 3, 4).offset(-12, 1);
        assert_eq!(r, Range::new(-2, 3, 3, 4));
    }

    #[test]
    fn spanning_normalizes_corners() {
        let r = Range::spanning(CellPos::new(2, 3), CellPos::new(4, 1));
        assert_eq!(r, Range::new(2, 1, 3, 3));
    }

    #[test]
    fn bounding_box() {
        let hull = Range::bounding(&[Range::new(1, 4, 1, 1), Range::new(3, 0, 2, 2)]).unwrap();
        assert_eq!(hull, Range::new(1, 0, 4, 5));
        assert!(Range::bounding(std::iter::empty()).is_none());
    }

    #[test]
    fn negative_rows_are_skipped() {
        let r = Range::new(-2, 0, 4, 1);
        assert_eq!(r.row_indices().collect::<Vec<_>>(), vec![0, 1]);
    }
}
