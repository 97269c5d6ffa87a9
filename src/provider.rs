//! Data-provider contract consumed by the grid, plus an in-memory provider.
//!
//! The grid never owns cell values: it reads the rows of the visible window
//! and funnels every mutation through the patch-returning write operations
//! below, so the host sees exactly what changed.

use std::cmp::Ordering;

use tracing::debug;

use crate::types::{patch_value, CellValue, GridSchema, Patch};

/// A row-major matrix of optional cell values with a column schema.
pub trait MatrixView {
    fn schema(&self) -> &GridSchema;

    /// Number of logical rows.
    fn row_count(&self) -> u32;

    fn get_cell(&self, row: u32, col: u32) -> Option<CellValue>;

    fn get_column(&self, col: u32) -> Vec<Option<CellValue>> {
        (0..self.row_count())
            .map(|row| self.get_cell(row, col))
            .collect()
    }

    fn get_row(&self, row: u32) -> Vec<Option<CellValue>> {
        (0..self.schema().column_count())
            .map(|col| self.get_cell(row, col))
            .collect()
    }

    /// Write (or clear, with `None`) one cell. Writing past the last row grows
    /// the model.
    fn set_cell(&mut self, row: u32, col: u32, value: Option<CellValue>) -> Vec<Patch>;

    fn delete_row(&mut self, row: u32) -> Vec<Patch>;

    /// Insert one empty row before `before_row`.
    fn splice(&mut self, before_row: u32) -> Vec<Patch>;

    /// Drop the whole model.
    fn remove_model(&mut self) -> Vec<Patch>;

    /// Sort rows by `col`, toggling the column's sort direction.
    fn sort(&mut self, col: u32);
}

type Row = Vec<Option<CellValue>>;

/// In-memory [`MatrixView`] over a `Vec` of rows.
#[derive(Debug, Clone)]
pub struct RowMatrixView {
    schema: GridSchema,
    rows: Vec<Row>,
}

impl RowMatrixView {
    pub fn new(mut schema: GridSchema, rows: Vec<Row>) -> Self {
        schema.normalize_sort_directions();
        let width = schema.column_schemas.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { schema, rows }
    }

    /// Build from string rows, parsing each cell with its column converter.
    /// Empty strings become absent values.
    pub fn from_strings(schema: GridSchema, rows: &[Vec<String>]) -> Self {
        let parsed = rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&schema.column_schemas)
                    .map(|(text, column)| {
                        (!text.is_empty()).then(|| column.converter().from_string(text))
                    })
                    .collect()
            })
            .collect();
        Self::new(schema, parsed)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn empty_row(&self) -> Row {
        vec![None; self.schema.column_schemas.len()]
    }

    fn row_json(row: &Row) -> serde_json::Value {
        serde_json::Value::Array(
            row.iter()
                .map(|v| patch_value(v.as_ref()).unwrap_or(serde_json::Value::Null))
                .collect(),
        )
    }
}

impl MatrixView for RowMatrixView {
    fn schema(&self) -> &GridSchema {
        &self.schema
    }

    fn row_count(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    fn get_cell(&self, row: u32, col: u32) -> Option<CellValue> {
        self.rows
            .get(usize::try_from(row).ok()?)?
            .get(usize::try_from(col).ok()?)?
            .clone()
    }

    fn set_cell(&mut self, row: u32, col: u32, value: Option<CellValue>) -> Vec<Patch> {
        let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(col)) else {
            return Vec::new();
        };
        if c >= self.schema.column_schemas.len() {
            return Vec::new();
        }

        let mut patches = Vec::new();
        while self.rows.len() <= r {
            let empty = self.empty_row();
            let index = u32::try_from(self.rows.len()).unwrap_or(u32::MAX);
            patches.push(Patch::add(Patch::row_path(index), Some(Self::row_json(&empty))));
            self.rows.push(empty);
        }

        let payload = Some(patch_value(value.as_ref()).unwrap_or(serde_json::Value::Null));
        if let Some(slot) = self.rows.get_mut(r).and_then(|cells| cells.get_mut(c)) {
            *slot = value;
            patches.push(Patch::replace(Patch::cell_path(row, col), payload));
        }
        patches
    }

    fn delete_row(&mut self, row: u32) -> Vec<Patch> {
        let Ok(r) = usize::try_from(row) else {
            return Vec::new();
        };
        if r >= self.rows.len() {
            return Vec::new();
        }
        self.rows.remove(r);
        vec![Patch::remove(Patch::row_path(row))]
    }

    fn splice(&mut self, before_row: u32) -> Vec<Patch> {
        let index = usize::try_from(before_row)
            .unwrap_or(usize::MAX)
            .min(self.rows.len());
        let empty = self.empty_row();
        let patch = Patch::add(
            Patch::row_path(u32::try_from(index).unwrap_or(u32::MAX)),
            Some(Self::row_json(&empty)),
        );
        self.rows.insert(index, empty);
        vec![patch]
    }

    fn remove_model(&mut self) -> Vec<Patch> {
        self.rows.clear();
        vec![Patch::remove("")]
    }

    fn sort(&mut self, col: u32) {
        let Some(column) = self.schema.column(col) else {
            return;
        };
        let direction: i8 = if column.sort_direction == Some(1) { -1 } else { 1 };
        self.schema.set_sort_direction(col, direction);

        let Ok(c) = usize::try_from(col) else {
            return;
        };
        self.rows.sort_by(|a, b| {
            let (a, b) = (a.get(c).and_then(Option::as_ref), b.get(c).and_then(Option::as_ref));
            match (a, b) {
                (None, None) => Ordering::Equal,
                // Absent values sort last in either direction.
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => {
                    let ord = a.cmp_value(b);
                    if direction < 0 {
                        ord.reverse()
                    } else {
                        ord
                    }
                }
            }
        });
        debug!(col, direction, rows = self.rows.len(), "sorted rows");
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
    use crate::types::{ColumnSchema, ColumnType, PatchOp};

    fn schema() -> GridSchema {
        GridSchema::new(vec![
            ColumnSchema::new("Name", ColumnType::String),
            ColumnSchema::new("Score", ColumnType::Number),
        ])
    }

    fn view(rows: &[[&str; 2]]) -> RowMatrixView {
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|r| r.iter().map(|s| (*s).to_string()).collect())
            .collect();
        RowMatrixView::from_strings(schema(), &rows)
    }

    #[test]
    fn from_strings_parses_with_converters() {
        let v = view(&[["a", "1.5"], ["", "x"]]);
        assert_eq!(v.get_cell(0, 1), Some(CellValue::Number(1.5)));
        assert_eq!(v.get_cell(1, 0), None);
        assert_eq!(v.get_cell(1, 1), Some(CellValue::String("x".into())));
    }

    #[test]
    fn set_cell_grows_rows() {
        let mut v = view(&[["a", "1"]]);
        let patches = v.set_cell(2, 0, Some("z".into()));
        assert_eq!(v.row_count(), 3);
        assert_eq!(patches.len(), 3);
        assert_eq!(patches[0].op, PatchOp::Add);
        assert_eq!(patches[0].path, "/1");
        assert_eq!(patches[2].path, "/2/0");
        assert_eq!(patches[2].value, Some(serde_json::json!("z")));
    }

    #[test]
    fn set_cell_outside_schema_is_ignored() {
        let mut v = view(&[["a", "1"]]);
        assert!(v.set_cell(0, 5, Some("z".into())).is_empty());
    }

    #[test]
    fn clearing_cell_writes_null() {
        let mut v = view(&[["a", "1"]]);
        let patches = v.set_cell(0, 0, None);
        assert_eq!(patches, vec![Patch::replace("/0/0", Some(serde_json::Value::Null))]);
        assert_eq!(v.get_cell(0, 0), None);
    }

    #[test]
    fn splice_and_delete_rows() {
        let mut v = view(&[["a", "1"], ["b", "2"]]);
        v.splice(1);
        assert_eq!(v.row_count(), 3);
        assert_eq!(v.get_row(1), vec![None, None]);
        v.delete_row(0);
        assert_eq!(v.get_cell(1, 0), Some("b".into()));
        assert_eq!(v.remove_model(), vec![Patch::remove("")]);
        assert_eq!(v.row_count(), 0);
    }

    #[test]
    fn sort_toggles_direction_and_keeps_absent_last() {
        let mut v = view(&[["a", "2"], ["b", ""], ["c", "1"]]);
        v.sort(1);
        assert_eq!(v.get_column(0), vec![Some("c".into()), Some("a".into()), Some("b".into())]);
        assert_eq!(v.schema().column(1).unwrap().sort_direction, Some(1));
        v.sort(1);
        assert_eq!(v.get_column(0), vec![Some("a".into()), Some("c".into()), Some("b".into())]);
        assert_eq!(v.schema().column(1).unwrap().sort_direction, Some(-1));
    }

    #[test]
    fn sort_orders_mixed_kinds_consistently() {
        let mut v = view(&[
            ["s1", "zeta"],
            ["n1", "3"],
            ["e", ""],
            ["s2", "alpha"],
            ["n2", "-1"],
            ["n3", "2.5"],
        ]);
        v.sort(1);
        assert_eq!(
            v.get_column(0),
            ["n2", "n3", "n1", "s2", "s1", "e"]
                .iter()
                .map(|s| Some(CellValue::from(*s)))
                .collect::<Vec<_>>()
        );
        v.sort(1);
        assert_eq!(
            v.get_column(0),
            ["s1", "s2", "n1", "n3", "n2", "e"]
                .iter()
                .map(|s| Some(CellValue::from(*s)))
                .collect::<Vec<_>>()
        );
    }
}
