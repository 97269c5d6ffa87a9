//! Matrix ⇄ clipboard text.
//!
//! Fields are separated by a single character (tab for the system clipboard).
//! On output every row ends with CRLF; on input rows end with CRLF or LF. A field containing the
//! separator, a line break or a quote is wrapped in quotes with interior
//! quotes doubled. On input a quoted span opens only at the start of a field;
//! an unterminated quote is kept as literal text.

use crate::error::{GridError, Result};

/// Field separator used for the system clipboard.
pub const TAB: char = '\t';

const ROW_TERMINATOR: &str = "\r\n";

fn needs_quoting(value: &str, separator: char) -> bool {
    value.contains(separator) || value.contains(['\n', '\r', '"'])
}

/// Quote a field for output if it needs it.
pub fn escape_field(value: &str, separator: char) -> String {
    if needs_quoting(value, separator) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize rows of optional cell text. Absent cells become empty fields.
/// With `header`, a row of titles is written first. Every row, the last one
/// included, ends with CRLF, so a trailing empty row survives decoding.
pub fn matrix_to_text<S: AsRef<str>>(
    rows: &[Vec<Option<S>>],
    separator: char,
    header: Option<&[String]>,
) -> String {
    let mut out = String::new();
    if let Some(titles) = header {
        out.push_str(&join_fields(titles.iter().map(String::as_str), separator));
        out.push_str(ROW_TERMINATOR);
    }
    for row in rows {
        let cells = row
            .iter()
            .map(|cell| cell.as_ref().map_or("", |s| s.as_ref()));
        out.push_str(&join_fields(cells, separator));
        out.push_str(ROW_TERMINATOR);
    }
    out
}

fn join_fields<'a>(fields: impl Iterator<Item = &'a str>, separator: char) -> String {
    let mut out = String::new();
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(&escape_field(field, separator));
    }
    out
}

/// Parse clipboard text into a rectangular matrix.
///
/// One trailing line terminator is ignored, so `""` gives no rows and `"\n"`
/// gives a single empty cell. Rows of unequal length are a
/// [`GridError::Format`] error.
pub fn text_to_matrix(text: &str, separator: char) -> Result<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_start = true;
    let mut line_open = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if field_start => {
                let checkpoint = chars.clone();
                match read_quoted(&mut chars) {
                    Some(quoted) => field.push_str(&quoted),
                    None => {
                        chars = checkpoint;
                        field.push('"');
                    }
                }
                field_start = false;
                line_open = true;
            }
            c if c == separator => {
                row.push(std::mem::take(&mut field));
                field_start = true;
                line_open = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                field_start = true;
                line_open = false;
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                field_start = true;
                line_open = false;
            }
            c => {
                field.push(c);
                field_start = false;
                line_open = true;
            }
        }
    }
    if line_open {
        row.push(field);
        rows.push(row);
    }

    check_rectangular(&rows)?;
    Ok(rows)
}

/// Read the rest of a quoted span after its opening quote. `None` when the
/// text ends before the closing quote.
fn read_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut out = String::new();
    loop {
        match chars.next()? {
            '"' => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    out.push('"');
                } else {
                    return Some(out);
                }
            }
            c => out.push(c),
        }
    }
}

fn check_rectangular(rows: &[Vec<String>]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let expected = first.len();
    match rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        Some((row, r)) => Err(GridError::Format {
            row,
            expected,
            found: r.len(),
        }),
        None => Ok(()),
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
    use test_case::test_case;

    fn m(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test_case("a\tb\r\nc\td\r\n", &[&["a", "b"], &["c", "d"]] ; "crlf with trailing terminator")]
    #[test_case("a\tb\nc\td", &[&["a", "b"], &["c", "d"]] ; "lf without terminator")]
    #[test_case("\n", &[&[""]] ; "single empty line")]
    #[test_case("a\n\n", &[&["a"], &[""]] ; "only one trailing line dropped")]
    #[test_case("\"a\tb\"\tc", &[&["a\tb", "c"]] ; "quoted separator")]
    #[test_case("\"x\r\ny\"\n", &[&["x\r\ny"]] ; "quoted line break")]
    #[test_case("\"say \"\"hi\"\"\"", &[&["say \"hi\""]] ; "doubled quotes")]
    #[test_case("a\"b\tc", &[&["a\"b", "c"]] ; "quote inside field is literal")]
    #[test_case("\"open\tx", &[&["\"open", "x"]] ; "unterminated quote is literal")]
    #[test_case("a\rb", &[&["a\rb"]] ; "bare cr is data")]
    fn decodes(text: &str, expected: &[&[&str]]) {
        assert_eq!(text_to_matrix(text, TAB).unwrap(), m(expected));
    }

    #[test]
    fn empty_text_is_empty_matrix() {
        assert!(text_to_matrix("", TAB).unwrap().is_empty());
    }

    #[test]
    fn ragged_is_format_error() {
        let err = text_to_matrix("a\tb\nc", TAB).unwrap_err();
        assert!(matches!(
            err,
            GridError::Format {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn encode_quotes_and_header() {
        let rows = vec![
            vec![Some("a\tb"), None],
            vec![Some("q\"x"), Some("plain")],
        ];
        let header = ["T1".to_string(), "T2".to_string()];
        assert_eq!(
            matrix_to_text(&rows, TAB, Some(&header[..])),
            "T1\tT2\r\n\"a\tb\"\t\r\n\"q\"\"x\"\tplain\r\n"
        );
    }

    #[test]
    fn roundtrip_with_embedded_separator_and_newline() {
        let source = m(&[&["a\tb", "line\nbreak"], &["\"quoted\"", ""]]);
        let rows: Vec<Vec<Option<&str>>> = source
            .iter()
            .map(|r| r.iter().map(|s| Some(s.as_str())).collect())
            .collect();
        let text = matrix_to_text(&rows, TAB, None);
        assert_eq!(text_to_matrix(&text, TAB).unwrap(), source);
    }

    #[test]
    fn single_empty_cell_survives_roundtrip() {
        let text = matrix_to_text(&[vec![Some("")]], TAB, None);
        assert_eq!(text, "\r\n");
        assert_eq!(text_to_matrix(&text, TAB).unwrap(), m(&[&[""]]));
    }

    #[test]
    fn trailing_empty_row_survives_roundtrip() {
        let rows = vec![vec![Some("a")], vec![None]];
        let text = matrix_to_text(&rows, TAB, None);
        assert_eq!(text, "a\r\n\r\n");
        assert_eq!(text_to_matrix(&text, TAB).unwrap(), m(&[&["a"], &[""]]));
    }
}
