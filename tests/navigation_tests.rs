//! Keyboard navigation tests
//!
//! Active-cell movement, wrapping at row edges, paging and the scroll
//! decisions that keep the active cell on screen.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use cellgrid::{GridEvent, KeyEvent, Range};
use common::{grid, press, record};

fn key(code: &str) -> KeyEvent {
    KeyEvent::named(code)
}

#[test]
fn arrows_move_one_cell() {
    let mut g = grid(20);
    press(&mut g, key("ArrowDown"));
    press(&mut g, key("ArrowRight"));
    press(&mut g, key("ArrowRight"));
    press(&mut g, key("ArrowLeft"));
    assert_eq!(g.get_active_cell(), Range::new(1, 1, 1, 1));
    assert_eq!(g.get_selection(), Range::new(1, 1, 1, 1));
}

#[test]
fn right_at_last_column_wraps_to_next_row() {
    let mut g = grid(20);
    g.select(&Range::new(4, 3, 1, 1));
    press(&mut g, key("ArrowRight"));
    assert_eq!(g.get_active_cell(), Range::new(5, 0, 1, 1));
}

#[test]
fn tab_wraps_like_arrow_right() {
    let mut g = grid(20);
    g.select(&Range::new(0, 3, 1, 1));
    press(&mut g, key("Tab"));
    assert_eq!(g.get_active_cell(), Range::new(1, 0, 1, 1));
    press(&mut g, key("Tab").with_shift());
    assert_eq!(g.get_active_cell(), Range::new(0, 3, 1, 1));
}

#[test]
fn left_at_origin_wraps_to_last_row_and_scrolls() {
    let mut g = grid(50);
    press(&mut g, key("ArrowLeft"));
    assert_eq!(g.get_active_cell(), Range::new(49, 3, 1, 1));
    // The window ends at the active row.
    assert_eq!(g.window().first_row(), 40);
}

#[test]
fn up_at_top_clamps_to_row_zero() {
    let mut g = grid(20);
    press(&mut g, key("ArrowUp"));
    assert_eq!(g.get_active_cell(), Range::new(0, 0, 1, 1));
    assert_eq!(g.window().first_row(), 0);
}

#[test]
fn page_up_near_top_does_not_move() {
    let mut g = grid(50);
    g.select(&Range::new(3, 1, 1, 1));
    press(&mut g, key("PageUp"));
    assert_eq!(g.get_active_cell(), Range::new(3, 1, 1, 1));
    assert_eq!(g.window().first_row(), 0);
}

#[test]
fn page_down_keeps_the_view_row() {
    let mut g = grid(50);
    g.select(&Range::new(4, 0, 1, 1));
    press(&mut g, key("PageDown"));
    assert_eq!(g.get_active_cell(), Range::new(14, 0, 1, 1));
    assert_eq!(g.window().first_row(), 10);
    press(&mut g, key("PageUp"));
    assert_eq!(g.get_active_cell(), Range::new(4, 0, 1, 1));
    assert_eq!(g.window().first_row(), 0);
}

#[test]
fn stepping_above_the_window_scrolls_one_row() {
    let mut g = grid(50);
    g.select(&Range::new(4, 0, 1, 1));
    press(&mut g, key("PageDown"));
    for _ in 0..5 {
        press(&mut g, key("ArrowUp"));
    }
    assert_eq!(g.get_active_cell(), Range::new(9, 0, 1, 1));
    assert_eq!(g.window().first_row(), 9);
}

#[test]
fn stepping_below_the_window_scrolls_one_row() {
    let mut g = grid(50);
    g.select(&Range::new(9, 0, 1, 1));
    press(&mut g, key("ArrowDown"));
    assert_eq!(g.window().first_row(), 1);
    assert_eq!(g.window_rows()[0][0], Some(cellgrid::CellValue::from("item1")));
}

#[test]
fn shift_arrows_expand_from_the_head() {
    let mut g = grid(20);
    g.select(&Range::new(2, 1, 1, 1));
    press(&mut g, key("ArrowDown").with_shift());
    press(&mut g, key("ArrowDown").with_shift());
    press(&mut g, key("ArrowLeft").with_shift());
    assert_eq!(g.get_selection(), Range::new(2, 0, 3, 2));
    assert_eq!(g.get_active_cell(), Range::new(2, 1, 1, 1));
    press(&mut g, key("ArrowUp").with_shift());
    assert_eq!(g.get_selection(), Range::new(2, 0, 2, 2));
}

#[test]
fn plain_move_collapses_the_selection() {
    let mut g = grid(20);
    g.select(&Range::new(2, 1, 3, 2));
    press(&mut g, key("ArrowDown"));
    assert_eq!(g.get_selection(), Range::new(3, 1, 1, 1));
    assert!(!g.selection().is_multi_area());
}

#[test]
fn navigation_publishes_selection_then_active_cell() {
    let mut g = grid(20);
    let seen = record(&mut g);
    press(&mut g, key("ArrowDown"));
    assert_eq!(
        *seen.borrow(),
        vec![
            GridEvent::SelectionChanged(Range::new(1, 0, 1, 1)),
            GridEvent::ActiveCellChanged(Range::new(1, 0, 1, 1)),
        ]
    );
}

#[test]
fn queued_events_wait_until_taken() {
    let mut g = grid(20);
    let seen = record(&mut g);
    g.queue_events();
    press(&mut g, key("ArrowDown"));
    assert!(seen.borrow().is_empty());
    // The grid is free again while the events are delivered.
    let events = g.take_events();
    assert_eq!(g.get_selection(), Range::new(1, 0, 1, 1));
    assert_eq!(
        events,
        vec![
            GridEvent::SelectionChanged(Range::new(1, 0, 1, 1)),
            GridEvent::ActiveCellChanged(Range::new(1, 0, 1, 1)),
        ]
    );
    assert!(g.take_events().is_empty());
}

#[test]
fn expanding_does_not_move_the_active_cell() {
    let mut g = grid(20);
    let seen = record(&mut g);
    press(&mut g, key("ArrowRight").with_shift());
    assert!(seen
        .borrow()
        .iter()
        .all(|e| matches!(e, GridEvent::SelectionChanged(_))));
}

#[test]
fn typing_above_the_window_scrolls_back_to_the_active_row() {
    let mut g = grid(50);
    g.select(&Range::new(2, 0, 1, 1));
    g.focus();
    assert!(g.wheel(100.0, false));
    assert!(g.wheel(100.0, false));
    assert_eq!(g.window().first_row(), 6);
    press(&mut g, KeyEvent::char('x'));
    assert_eq!(g.window().first_row(), 2);
}

#[test]
fn enter_moves_down_and_shift_enter_up() {
    let mut g = grid(20);
    press(&mut g, key("Enter"));
    press(&mut g, key("Enter"));
    press(&mut g, key("Enter").with_shift());
    assert_eq!(g.get_active_cell(), Range::new(1, 0, 1, 1));
    assert_eq!(g.get_selection(), Range::new(1, 0, 1, 1));
}
