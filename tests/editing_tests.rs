//! Tests for the cell editing pipeline: keys → editor → provider → patches.

mod common;

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::common::{grid, press, record};
    use cellgrid::editor::EditMode;
    use cellgrid::{CellValue, GridEvent, KeyAction, KeyEvent, MatrixView, PatchOp, Range};

    // ================================================================
    // Input mode
    // ================================================================

    #[test]
    fn typing_replaces_the_value() {
        let mut g = grid(3);
        assert_eq!(press(&mut g, KeyEvent::char('Z')), KeyAction::Handled);
        assert_eq!(g.active().mode(), EditMode::Input);
        assert_eq!(g.active().buffer().text(), "Z");

        g.set_editor_text("Zed");
        press(&mut g, KeyEvent::named("Enter"));

        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("Zed")));
        assert_eq!(g.active().mode(), EditMode::Display);
        assert_eq!(g.get_active_cell(), Range::new(1, 0, 1, 1));
    }

    #[test]
    fn integer_column_parses_trimmed_text() {
        let mut g = grid(3);
        g.select(&Range::new(0, 1, 1, 1));
        assert!(g.begin_input("4"));
        g.set_editor_text("  42 ");
        g.commit();
        assert_eq!(g.view().get_cell(0, 1), Some(CellValue::Integer(42)));
    }

    #[test]
    fn unparseable_text_is_kept_as_string() {
        let mut g = grid(3);
        g.select(&Range::new(0, 1, 1, 1));
        g.begin_input("a");
        g.set_editor_text("abc");
        g.commit();
        assert_eq!(g.view().get_cell(0, 1), Some(CellValue::from("abc")));
    }

    #[test]
    fn blank_text_clears_the_cell() {
        let mut g = grid(3);
        g.begin_input("x");
        g.set_editor_text("   ");
        g.commit();
        assert_eq!(g.view().get_cell(0, 0), None);
    }

    #[test]
    fn tab_commits_and_moves_right() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::char('q'));
        press(&mut g, KeyEvent::named("Tab"));
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("q")));
        assert_eq!(g.get_active_cell(), Range::new(0, 1, 1, 1));
    }

    #[test]
    fn shift_enter_commits_and_moves_up() {
        let mut g = grid(3);
        g.select(&Range::new(2, 0, 1, 1));
        press(&mut g, KeyEvent::char('u'));
        press(&mut g, KeyEvent::named("Enter").with_shift());
        assert_eq!(g.view().get_cell(2, 0), Some(CellValue::from("u")));
        assert_eq!(g.get_active_cell(), Range::new(1, 0, 1, 1));
    }

    #[test]
    fn escape_discards() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::char('x'));
        g.set_editor_text("xyz");
        press(&mut g, KeyEvent::named("Escape"));
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("item0")));
        assert_eq!(g.active().mode(), EditMode::Display);
        assert_eq!(g.active().buffer().text(), "");
    }

    // ================================================================
    // Edit mode
    // ================================================================

    #[test]
    fn f2_prefills_editable_text() {
        let mut g = grid(3);
        g.select(&Range::new(2, 2, 1, 1));
        press(&mut g, KeyEvent::named("F2"));
        assert_eq!(g.active().mode(), EditMode::Edit);
        assert_eq!(g.active().buffer().text(), "3");
    }

    #[test]
    fn f2_toggles_between_modes() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::char('a'));
        press(&mut g, KeyEvent::named("F2"));
        assert_eq!(g.active().mode(), EditMode::Edit);
        press(&mut g, KeyEvent::named("F2"));
        assert_eq!(g.active().mode(), EditMode::Input);
    }

    #[test]
    fn alt_enter_makes_the_editor_multiline() {
        let mut g = grid(3);
        press(&mut g, KeyEvent::named("F2"));
        press(&mut g, KeyEvent::named("Enter").with_alt());
        assert!(g.active().buffer().is_multiline());
        assert_eq!(g.active().buffer().text(), "item0\n");
        press(&mut g, KeyEvent::named("Enter"));
        // Trimmed on commit.
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("item0")));
    }

    #[test]
    fn double_click_opens_the_editor() {
        let mut g = grid(3);
        g.double_click(120.0, 30.0);
        assert_eq!(g.get_active_cell(), Range::new(1, 1, 1, 1));
        assert_eq!(g.active().mode(), EditMode::Edit);
        assert_eq!(g.active().buffer().text(), "1");
    }

    // ================================================================
    // Read-only cells
    // ================================================================

    #[test]
    fn read_only_cell_ignores_typing() {
        let mut g = grid(3);
        g.select(&Range::new(0, 3, 1, 1));
        assert_eq!(press(&mut g, KeyEvent::char('x')), KeyAction::Ignored);
        assert_eq!(g.active().mode(), EditMode::Display);
    }

    #[test]
    fn read_only_cell_edit_is_never_written() {
        let mut g = grid(3);
        let seen = record(&mut g);
        g.select(&Range::new(0, 3, 1, 1));
        press(&mut g, KeyEvent::named("F2"));
        assert_eq!(g.active().buffer().text(), "id0");
        g.set_editor_text("changed");
        press(&mut g, KeyEvent::named("Enter"));
        assert_eq!(g.view().get_cell(0, 3), Some(CellValue::from("id0")));
        assert!(!seen
            .borrow()
            .iter()
            .any(|e| matches!(e, GridEvent::DataChanged(_))));
    }

    #[test]
    fn delete_on_read_only_column_is_rejected() {
        let mut g = grid(3);
        g.select(&Range::new(0, 2, 2, 2));
        assert!(g.handle_key(&KeyEvent::named("Delete")).is_err());
        assert_eq!(g.view().get_cell(0, 2), Some(CellValue::Number(0.0)));
    }

    // ================================================================
    // Patches
    // ================================================================

    #[test]
    fn commit_publishes_a_replace_patch() {
        let mut g = grid(3);
        let seen = record(&mut g);
        g.select(&Range::new(1, 0, 1, 1));
        g.begin_input("n");
        g.set_editor_text("new");
        g.commit();

        let events = seen.borrow();
        let Some(GridEvent::DataChanged(patches)) = events.last() else {
            panic!("expected dataChanged");
        };
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].op, PatchOp::Replace);
        assert_eq!(patches[0].path, "/1/0");
        assert_eq!(patches[0].value, Some(serde_json::json!("new")));
    }

    #[test]
    fn commit_below_the_last_row_grows_the_model() {
        let mut g = grid(2);
        let seen = record(&mut g);
        press(&mut g, KeyEvent::named("ArrowDown"));
        press(&mut g, KeyEvent::named("ArrowDown"));
        assert_eq!(g.get_active_cell(), Range::new(2, 0, 1, 1));

        press(&mut g, KeyEvent::char('n'));
        press(&mut g, KeyEvent::named("Enter"));
        assert_eq!(g.row_count(), 3);
        assert_eq!(g.view().get_cell(2, 0), Some(CellValue::from("n")));

        let events = seen.borrow();
        let patches = events
            .iter()
            .find_map(|e| match e {
                GridEvent::DataChanged(p) => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(patches[0].op, PatchOp::Add);
        assert_eq!(patches[0].path, "/2");
        assert_eq!(patches[1].path, "/2/0");
    }

    #[test]
    fn blur_commits_pending_edit() {
        let mut g = grid(3);
        g.focus();
        press(&mut g, KeyEvent::char('b'));
        g.blur();
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("b")));
        assert!(!g.is_focused());
    }

    // ================================================================
    // Row commands and sorting
    // ================================================================

    #[test]
    fn ctrl_minus_deletes_selected_rows() {
        let mut g = grid(5);
        g.select(&Range::new(1, 0, 2, 1));
        let mut minus = KeyEvent::char('-').with_ctrl();
        minus.code = "Minus".into();
        press(&mut g, minus);
        assert_eq!(g.row_count(), 3);
        assert_eq!(g.view().get_cell(1, 0), Some(CellValue::from("item3")));
    }

    #[test]
    fn insert_row_before_active() {
        let mut g = grid(3);
        g.select(&Range::new(1, 0, 1, 1));
        g.insert_row().unwrap();
        assert_eq!(g.row_count(), 4);
        assert_eq!(g.view().get_row(1), vec![None, None, None, None]);
        assert_eq!(g.view().get_cell(2, 0), Some(CellValue::from("item1")));
    }

    #[test]
    fn sorting_toggles_direction() {
        let mut g = grid(3);
        g.sort(1).unwrap();
        assert_eq!(g.paint().header[1].label, "qty ↑");
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("item0")));

        g.sort(1).unwrap();
        assert_eq!(g.paint().header[1].label, "qty ↓");
        assert_eq!(g.view().get_cell(0, 0), Some(CellValue::from("item2")));
        assert_eq!(g.window_rows()[0][0], Some(CellValue::from("item2")));

        assert!(g.sort(9).is_err());
    }
}
