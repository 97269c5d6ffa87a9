//! Common test utilities for grid integration tests.
//!
//! Builds small grids over an in-memory provider and records emitted events.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use cellgrid::{
    CellValue, ColumnSchema, ColumnType, EventKind, Grid, GridConfig, GridEvent, GridSchema,
    KeyAction, KeyEvent, MatrixView, RowMatrixView,
};

/// Height giving a 10-row window with the light theme (24px rows + header).
pub const TEN_ROWS: f32 = 264.0;

/// Columns: `name` (string), `qty` (integer), `price` (number), `id` (read-only string).
pub fn schema() -> GridSchema {
    GridSchema::new(vec![
        ColumnSchema::new("name", ColumnType::String),
        ColumnSchema::new("qty", ColumnType::Integer),
        ColumnSchema::new("price", ColumnType::Number),
        ColumnSchema::new("id", ColumnType::String).with_read_only(true),
    ])
}

/// `rows` rows of `item{r}`, `r`, `r * 1.5`, `id{r}`.
#[allow(clippy::cast_precision_loss)]
pub fn rows(rows: u32) -> Vec<Vec<Option<CellValue>>> {
    (0..rows)
        .map(|r| {
            vec![
                Some(CellValue::from(format!("item{r}"))),
                Some(CellValue::Integer(i64::from(r))),
                Some(CellValue::Number(f64::from(r) * 1.5)),
                Some(CellValue::from(format!("id{r}"))),
            ]
        })
        .collect()
}

pub fn grid(row_count: u32) -> Grid<RowMatrixView> {
    Grid::new(
        RowMatrixView::new(schema(), rows(row_count)),
        GridConfig::light(),
        TEN_ROWS,
    )
}

/// Grid with only string columns, for clipboard tests.
pub fn text_grid(cols: usize, data: &[&[&str]]) -> Grid<RowMatrixView> {
    let schema = GridSchema::new(
        (0..cols)
            .map(|i| ColumnSchema::new(format!("c{i}"), ColumnType::String))
            .collect(),
    );
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| r.iter().map(|s| (*s).to_string()).collect())
        .collect();
    Grid::new(
        RowMatrixView::from_strings(schema, &rows),
        GridConfig::light(),
        TEN_ROWS,
    )
}

pub fn text_at<V: MatrixView>(grid: &Grid<V>, row: u32, col: u32) -> Option<String> {
    grid.view()
        .get_cell(row, col)
        .and_then(|v| v.as_str().map(str::to_string))
}

pub fn press<V: MatrixView>(grid: &mut Grid<V>, event: KeyEvent) -> KeyAction {
    grid.handle_key(&event).expect("key handled")
}

/// Events of every kind, in emission order.
pub type Recorded = Rc<RefCell<Vec<GridEvent>>>;

pub fn record<V: MatrixView>(grid: &mut Grid<V>) -> Recorded {
    let seen: Recorded = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::DataChanged,
        EventKind::ActiveCellChanged,
        EventKind::SelectionChanged,
        EventKind::Paste,
    ] {
        let sink = Rc::clone(&seen);
        grid.on(
            kind,
            Box::new(move |event| {
                sink.borrow_mut().push(event.clone());
                Ok(())
            }),
        );
    }
    seen
}
