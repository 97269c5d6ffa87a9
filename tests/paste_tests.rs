//! Copy, cut and paste through the grid
//!
//! Covers tiling, clipping, model growth, preconditions and the
//! asynchronous clipboard protocol (begin / finish).

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use cellgrid::{CellValue, GridError, GridEvent, MatrixView, Range};
use common::{grid, record, text_at, text_grid};

fn abc() -> cellgrid::Grid<cellgrid::RowMatrixView> {
    text_grid(3, &[&["a", "b", "c"], &["d", "e", "f"]])
}

// ============================================================================
// Paste
// ============================================================================

#[test]
fn single_placement_grows_the_model() {
    let mut g = abc();
    g.select(&Range::new(1, 1, 1, 1));
    g.paste_text("1\t2\r\n3\t4").unwrap();

    assert_eq!(g.row_count(), 3);
    assert_eq!(text_at(&g, 1, 1).as_deref(), Some("1"));
    assert_eq!(text_at(&g, 1, 2).as_deref(), Some("2"));
    assert_eq!(text_at(&g, 2, 1).as_deref(), Some("3"));
    assert_eq!(text_at(&g, 2, 2).as_deref(), Some("4"));
    assert_eq!(text_at(&g, 2, 0), None);
    assert_eq!(text_at(&g, 1, 0).as_deref(), Some("d"));
}

#[test]
fn columns_past_the_schema_are_dropped() {
    let mut g = abc();
    g.select(&Range::new(0, 2, 1, 1));
    g.paste_text("x\ty\tz").unwrap();
    assert_eq!(text_at(&g, 0, 2).as_deref(), Some("x"));
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("a"));
    assert_eq!(g.col_count(), 3);
}

#[test]
fn exact_multiples_tile() {
    let mut g = abc();
    g.select(&Range::new(0, 0, 2, 2));
    g.paste_text("z").unwrap();
    for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        assert_eq!(text_at(&g, row, col).as_deref(), Some("z"));
    }
    assert_eq!(text_at(&g, 0, 2).as_deref(), Some("c"));
}

#[test]
fn two_by_one_source_tiles_down_a_column() {
    let mut g = text_grid(2, &[&["", ""], &["", ""], &["", ""], &["", ""]]);
    g.select(&Range::new(0, 1, 4, 1));
    g.paste_text("p\r\nq\r\n").unwrap();
    let column: Vec<_> = (0..4).map(|r| text_at(&g, r, 1)).collect();
    assert_eq!(
        column,
        vec![
            Some("p".to_string()),
            Some("q".to_string()),
            Some("p".to_string()),
            Some("q".to_string())
        ]
    );
}

#[test]
fn non_multiple_target_pastes_once() {
    let mut g = abc();
    g.select(&Range::new(0, 0, 2, 3));
    g.paste_text("p\tq").unwrap();
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("p"));
    assert_eq!(text_at(&g, 0, 1).as_deref(), Some("q"));
    assert_eq!(text_at(&g, 0, 2).as_deref(), Some("c"));
    assert_eq!(text_at(&g, 1, 0).as_deref(), Some("d"));
}

#[test]
fn empty_fields_clear_cells() {
    let mut g = abc();
    g.paste_text("\tk").unwrap();
    assert_eq!(text_at(&g, 0, 0), None);
    assert_eq!(text_at(&g, 0, 1).as_deref(), Some("k"));
}

#[test]
fn pasted_text_goes_through_column_converters() {
    let mut g = grid(2);
    g.select(&Range::new(0, 1, 1, 1));
    g.paste_text("7\t2.25\n8\tn/a").unwrap();
    assert_eq!(g.view().get_cell(0, 1), Some(CellValue::Integer(7)));
    assert_eq!(g.view().get_cell(0, 2), Some(CellValue::Number(2.25)));
    assert_eq!(g.view().get_cell(1, 1), Some(CellValue::Integer(8)));
    assert_eq!(g.view().get_cell(1, 2), Some(CellValue::from("n/a")));
}

#[test]
fn paste_emits_data_changed_then_paste() {
    let mut g = abc();
    let seen = record(&mut g);
    g.paste_text("q").unwrap();
    let events = seen.borrow();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], GridEvent::DataChanged(p) if p.len() == 1));
    assert_eq!(events[1], GridEvent::Paste);
}

#[test]
fn read_only_target_is_rejected() {
    let mut g = grid(3);
    let seen = record(&mut g);
    g.select(&Range::new(0, 2, 1, 2));
    let err = g.paste_text("x\ty").unwrap_err();
    assert_eq!(err.to_string(), "Parts of the cells are locked!");
    assert_eq!(g.view().get_cell(0, 2), Some(CellValue::Number(0.0)));
    assert!(!seen
        .borrow()
        .iter()
        .any(|e| matches!(e, GridEvent::DataChanged(_))));
}

#[test]
fn multi_area_target_is_rejected() {
    let mut g = abc();
    g.add_selection(1, 2);
    let err = g.paste_text("x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "This action is not possible with multi-selections."
    );
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("a"));
}

#[test]
fn nothing_to_paste() {
    let mut g = abc();
    let err = g.paste_text("").unwrap_err();
    assert!(matches!(err, GridError::Precondition(ref m) if m == "You have nothing to paste"));
}

#[test]
fn ragged_clipboard_writes_nothing() {
    let mut g = abc();
    let err = g.paste_text("1\t2\n3").unwrap_err();
    assert!(matches!(err, GridError::Format { .. }));
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("a"));
    assert_eq!(text_at(&g, 1, 0).as_deref(), Some("d"));
}

// ============================================================================
// Asynchronous protocol
// ============================================================================

#[test]
fn second_operation_while_pending_is_busy() {
    let mut g = abc();
    g.begin_paste().unwrap();
    assert!(matches!(g.begin_copy(false), Err(GridError::ClipboardBusy)));
    assert!(matches!(g.begin_paste(), Err(GridError::ClipboardBusy)));
    g.finish_paste(Ok("n".into())).unwrap();
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("n"));
    assert!(g.begin_copy(false).is_ok());
}

#[test]
fn failed_read_releases_the_gate() {
    let mut g = abc();
    g.begin_paste().unwrap();
    let err = g
        .finish_paste(Err(GridError::Clipboard("permission denied".into())))
        .unwrap_err();
    assert!(matches!(err, GridError::Clipboard(_)));
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("a"));
    g.begin_paste().unwrap();
}

#[test]
fn selection_moving_onto_read_only_cancels_pending_paste() {
    let mut g = grid(3);
    g.begin_paste().unwrap();
    g.select(&Range::new(1, 3, 1, 1));
    let err = g.finish_paste(Ok("x".into())).unwrap_err();
    assert_eq!(err.to_string(), "Parts of the cells are locked!");
    assert_eq!(g.view().get_cell(1, 3), Some(CellValue::from("id1")));
}

#[test]
fn completion_without_start_is_an_error() {
    let mut g = abc();
    assert!(g.finish_paste(Ok("x".into())).is_err());
    assert!(g.finish_copy(Ok(())).is_err());
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("a"));
}

// ============================================================================
// Copy and cut
// ============================================================================

#[test]
fn copy_uses_display_text() {
    let mut g = grid(3);
    g.select(&Range::new(0, 0, 2, 3));
    let text = g.begin_copy(false).unwrap();
    assert_eq!(text, "item0\t0\t0\r\nitem1\t1\t1.5\r\n");
    g.finish_copy(Ok(())).unwrap();
    assert_eq!(g.row_count(), 3);
}

#[test]
fn copy_after_second_select_all_includes_titles() {
    let mut g = abc();
    g.select_all();
    g.select_all();
    let text = g.begin_copy(false).unwrap();
    assert_eq!(text, "c0\tc1\tc2\r\na\tb\tc\r\nd\te\tf\r\n");
}

#[test]
fn copy_of_rows_past_the_end_is_empty_fields() {
    let g = abc();
    assert_eq!(
        g.range_to_text(&Range::new(1, 0, 2, 3), false),
        "d\te\tf\r\n\t\t\r\n"
    );
}

#[test]
fn copy_of_read_only_cells_is_allowed() {
    let mut g = grid(2);
    g.select(&Range::new(1, 3, 1, 1));
    assert_eq!(g.begin_copy(false).unwrap(), "id1\r\n");
}

#[test]
fn copy_with_several_areas_is_rejected() {
    let mut g = abc();
    g.add_selection(1, 1);
    assert!(matches!(g.begin_copy(false), Err(GridError::Precondition(_))));
    assert!(g.begin_paste().is_err());
}

#[test]
fn cut_clears_after_successful_write() {
    let mut g = abc();
    g.select(&Range::new(1, 0, 1, 3));
    assert_eq!(g.begin_copy(true).unwrap(), "d\te\tf\r\n");
    assert_eq!(g.row_count(), 2);
    g.finish_copy(Ok(())).unwrap();
    // The emptied last row is trimmed.
    assert_eq!(g.row_count(), 1);
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("a"));
}

#[test]
fn cut_keeps_data_when_write_fails() {
    let mut g = abc();
    g.select(&Range::new(0, 0, 1, 1));
    g.begin_copy(true).unwrap();
    assert!(g
        .finish_copy(Err(GridError::Clipboard("denied".into())))
        .is_err());
    assert_eq!(text_at(&g, 0, 0).as_deref(), Some("a"));
}

#[test]
fn cut_everything_removes_the_model() {
    let mut g = abc();
    let seen = record(&mut g);
    g.select_all();
    g.begin_copy(true).unwrap();
    g.finish_copy(Ok(())).unwrap();
    assert_eq!(g.row_count(), 0);
    let events = seen.borrow();
    let Some(GridEvent::DataChanged(patches)) = events.last() else {
        panic!("expected dataChanged");
    };
    assert_eq!(patches.last().map(|p| p.path.as_str()), Some(""));
}

#[test]
fn copied_empty_cell_pastes_as_a_clear() {
    let mut g = text_grid(2, &[&["", "keep"], &["x", "y"]]);
    let text = g.range_to_text(&Range::new(0, 0, 1, 1), false);
    assert_eq!(text, "\r\n");
    g.select(&Range::new(1, 1, 1, 1));
    g.paste_text(&text).unwrap();
    assert_eq!(text_at(&g, 1, 1), None);
    assert_eq!(text_at(&g, 1, 0).as_deref(), Some("x"));
}

#[test]
fn quoted_values_round_trip_through_the_grid() {
    let mut g = text_grid(2, &[&["tab\there", ""]]);
    let text = g.range_to_text(&Range::new(0, 0, 1, 1), false);
    assert_eq!(text, "\"tab\there\"\r\n");
    g.select(&Range::new(0, 1, 1, 1));
    g.paste_text(&text).unwrap();
    assert_eq!(text_at(&g, 0, 1).as_deref(), Some("tab\there"));
}
