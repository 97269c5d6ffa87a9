//! TSV clipboard codec tests
//!
//! Encoding of grid ranges, decoding of foreign clipboard text and the
//! quoting rules shared by both directions.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use cellgrid::clipboard::{escape_field, matrix_to_text, text_to_matrix, TAB};
use cellgrid::GridError;
use test_case::test_case;

fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|s| (*s).to_string()).collect())
        .collect()
}

#[test_case("plain", "plain" ; "plain text untouched")]
#[test_case("", "" ; "empty stays empty")]
#[test_case("a\tb", "\"a\tb\"" ; "separator")]
#[test_case("line\nbreak", "\"line\nbreak\"" ; "line feed")]
#[test_case("cr\rhere", "\"cr\rhere\"" ; "carriage return")]
#[test_case("say \"hi\"", "\"say \"\"hi\"\"\"" ; "quotes doubled")]
fn escapes_fields(value: &str, expected: &str) {
    assert_eq!(escape_field(value, TAB), expected);
}

#[test]
fn encodes_absent_cells_as_empty_fields() {
    let rows = vec![
        vec![Some("a"), None, Some("c")],
        vec![None, None, None],
    ];
    assert_eq!(matrix_to_text(&rows, TAB, None), "a\t\tc\r\n\t\t\r\n");
}

#[test]
fn encodes_header_row_first() {
    let rows = vec![vec![Some("1".to_string()), Some("2".to_string())]];
    let header = vec!["qty".to_string(), "price".to_string()];
    assert_eq!(
        matrix_to_text(&rows, TAB, Some(header.as_slice())),
        "qty\tprice\r\n1\t2\r\n"
    );
}

#[test]
fn every_row_is_terminated() {
    let rows = vec![vec![Some("x")], vec![Some("y")]];
    assert_eq!(matrix_to_text(&rows, TAB, None), "x\r\ny\r\n");
}

#[test]
fn empty_cells_survive_encoding() {
    let single: Vec<Vec<Option<&str>>> = vec![vec![Some("")]];
    assert_eq!(
        text_to_matrix(&matrix_to_text(&single, TAB, None), TAB).unwrap(),
        strings(&[&[""]])
    );
    let trailing = vec![vec![Some("a"), Some("b")], vec![None, None]];
    assert_eq!(
        text_to_matrix(&matrix_to_text(&trailing, TAB, None), TAB).unwrap(),
        strings(&[&["a", "b"], &["", ""]])
    );
}

#[test]
fn special_values_survive_encoding() {
    let values = ["a\tb", "two\r\nlines", "\"quoted\"", "trailing\"", ""];
    let rows = vec![values.iter().map(|v| Some(*v)).collect::<Vec<_>>()];
    let decoded = text_to_matrix(&matrix_to_text(&rows, TAB, None), TAB).unwrap();
    assert_eq!(decoded, strings(&[&values]));
}

#[test]
fn spreadsheet_export_with_trailing_crlf() {
    let text = "Name\tQty\r\nApple\t3\r\nPear\t\r\n";
    assert_eq!(
        text_to_matrix(text, TAB).unwrap(),
        strings(&[&["Name", "Qty"], &["Apple", "3"], &["Pear", ""]])
    );
}

#[test]
fn other_separators() {
    assert_eq!(
        text_to_matrix("\"a,b\",c\n1,2", ',').unwrap(),
        strings(&[&["a,b", "c"], &["1", "2"]])
    );
    let rows = vec![vec![Some("a,b"), Some("c")]];
    assert_eq!(matrix_to_text(&rows, ',', None), "\"a,b\",c");
}

#[test]
fn ragged_rows_name_the_offending_row() {
    let err = text_to_matrix("a\tb\r\nc\td\r\ne", TAB).unwrap_err();
    assert!(matches!(
        err,
        GridError::Format {
            row: 2,
            expected: 2,
            found: 1
        }
    ));
    assert_eq!(
        err.to_string(),
        "Pasted text must be rectangular: row 2 has 1 columns, expected 2"
    );
}

#[test]
fn lone_tab_is_two_empty_fields() {
    assert_eq!(text_to_matrix("\t", TAB).unwrap(), strings(&[&["", ""]]));
}
