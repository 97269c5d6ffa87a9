//! Viewport and scroll tests
//!
//! Window sizing from the container height, wheel and scrollbar scrolling,
//! the scrollbar model and which rows are materialized.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use cellgrid::layout::{ScrollSource, ViewportWindow};
use cellgrid::{CellValue, GridConfig};
use common::grid;
use test_case::test_case;

#[test_case(264.0, 10 ; "exact multiple minus header")]
#[test_case(270.0, 10 ; "partial row dropped")]
#[test_case(48.0, 1 ; "header and one row")]
#[test_case(20.0, 0 ; "shorter than a row")]
fn window_rows_from_height(height: f32, expected: u32) {
    assert_eq!(GridConfig::light().viewport_row_count(height), expected);
}

#[test]
fn dark_theme_has_thinner_borders() {
    let dark = GridConfig::dark();
    assert_eq!(dark.row_height(), 23.0);
    assert_eq!(dark.viewport_row_count(240.0), 9);
}

// ============================================================================
// Window
// ============================================================================

#[test]
fn window_range_covers_visible_rows() {
    let mut w = ViewportWindow::new(10, 4);
    w.set_first_row(7);
    assert_eq!(w.range(), cellgrid::Range::new(7, 0, 10, 4));
    assert!(w.contains_row(16));
    assert!(!w.contains_row(17));
    assert!(!w.contains_row(6));
}

#[test]
fn negative_first_row_clamps_to_zero() {
    let mut w = ViewportWindow::new(10, 4);
    assert_eq!(w.set_first_row(-5), 0);
}

#[test]
fn only_visible_rows_are_materialized() {
    let mut g = grid(1000);
    assert_eq!(g.window_rows().len(), 10);
    g.set_first_row(500, ScrollSource::Program);
    assert_eq!(g.window_rows().len(), 10);
    assert_eq!(g.window_rows()[0][0], Some(CellValue::from("item500")));
}

#[test]
fn window_past_the_end_is_partially_filled() {
    let mut g = grid(25);
    g.set_first_row(20, ScrollSource::Program);
    assert_eq!(g.window_rows().len(), 5);
    let paint = g.paint();
    assert_eq!(paint.rows.len(), 10);
    assert_eq!(paint.rows[4][0].text, "item24");
    assert_eq!(paint.rows[5][0].text, "");
}

// ============================================================================
// Wheel
// ============================================================================

#[test]
fn wheel_moves_three_rows() {
    let mut g = grid(100);
    g.focus();
    assert!(g.wheel(53.0, false));
    assert_eq!(g.window().first_row(), 3);
    assert!(g.wheel(-1.0, false));
    assert_eq!(g.window().first_row(), 0);
}

#[test]
fn wheel_up_at_top_is_not_consumed() {
    let mut g = grid(100);
    g.focus();
    assert!(!g.wheel(-120.0, false));
    assert_eq!(g.window().first_row(), 0);
}

#[test]
fn wheel_stops_at_last_full_window() {
    let mut g = grid(25);
    g.focus();
    for _ in 0..10 {
        g.wheel(120.0, false);
    }
    assert_eq!(g.window().first_row(), 15);
    assert!(!g.wheel(120.0, false));
}

#[test]
fn wheel_on_short_model_does_not_scroll() {
    let mut g = grid(4);
    g.focus();
    assert!(!g.wheel(120.0, false));
}

#[test]
fn ctrl_wheel_and_unfocused_wheel_are_ignored() {
    let mut g = grid(100);
    assert!(!g.wheel(120.0, false));
    g.focus();
    assert!(!g.wheel(120.0, true));
    assert_eq!(g.window().first_row(), 0);
}

// ============================================================================
// Scrollbar
// ============================================================================

#[test]
fn indicator_tracks_programmatic_scrolls() {
    let mut g = grid(100);
    assert_eq!(g.scroll_indicator().max, 90);
    g.focus();
    g.wheel(120.0, false);
    assert_eq!(g.scroll_indicator().value, 3);
}

#[test]
fn indicator_max_is_at_least_the_window() {
    let g = grid(12);
    assert_eq!(g.scroll_indicator().max, 10);
}

#[test]
fn scrollbar_drag_loads_rows() {
    let mut g = grid(100);
    g.scroll_to(42);
    assert_eq!(g.window().first_row(), 42);
    assert_eq!(g.window_rows()[0][0], Some(CellValue::from("item42")));
    assert_eq!(g.scroll_indicator().value, 42);
}

#[test]
fn scrollbar_is_clamped_to_last_full_window() {
    let mut g = grid(100);
    g.scroll_to(1000);
    assert_eq!(g.window().first_row(), 90);
}

#[test]
fn resize_recomputes_the_window() {
    let mut g = grid(100);
    g.resize(144.0);
    assert_eq!(g.window().viewport_row_count(), 5);
    assert_eq!(g.window_rows().len(), 5);
    assert_eq!(g.window().page_increment(), 5);
}

#[test]
fn data_change_refreshes_the_indicator() {
    let mut g = grid(20);
    g.select(&cellgrid::Range::new(19, 0, 1, 1));
    g.insert_row().unwrap();
    assert_eq!(g.row_count(), 21);
    assert_eq!(g.scroll_indicator().max, 11);
}
