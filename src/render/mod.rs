//! Window paint computation.
//!
//! This module provides:
//! - Display text for every cell of the viewport window
//! - Hyperlinks for `uri` columns, including markdown `[text](href)` links
//! - Highlight state with colors resolved from [`GridConfig`]
//! - Overlay rectangles for the visible selection areas
//! - The header row with sort indicators
//!
//! The host turns a [`WindowPaint`] into DOM or canvas output.

pub mod selection;

pub use selection::{highlight_matrix, selection_rects, window_clip, Highlight, SelectionRect};

use serde::Serialize;

use crate::config::GridConfig;
use crate::layout::{GridLayout, ViewportWindow};
use crate::types::{CellValue, GridSchema, Range};

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub highlight: Highlight,
    /// Resolved color of `highlight`; absent for the default background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Right-aligned (non-string) column.
    pub non_string: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    /// Title with a trailing sort arrow when the column is sorted.
    pub label: String,
    pub title: String,
    pub width: f32,
}

/// Everything needed to paint the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPaint {
    pub first_row: u32,
    pub header: Vec<HeaderCell>,
    pub header_color: String,
    pub rows: Vec<Vec<RenderedCell>>,
    /// Empty while the grid has no focus.
    pub selection_rects: Vec<SelectionRect>,
    pub focused: bool,
}

/// Parse `[text](href)`. Both parts must be non-empty.
pub fn parse_markdown_link(value: &str) -> Option<(&str, &str)> {
    let inner = value.strip_prefix('[')?.strip_suffix(')')?;
    let split = inner.rfind("](")?;
    let (text, href) = (inner.get(..split)?, inner.get(split + 2..)?);
    (!text.is_empty() && !href.is_empty()).then_some((text, href))
}

/// Display text and link target of a `uri` column value.
pub fn uri_cell(value: &str) -> (String, Option<String>) {
    if let Some((text, href)) = parse_markdown_link(value) {
        return (text.to_string(), Some(href.to_string()));
    }
    let href = (!value.is_empty()).then(|| value.to_string());
    (value.to_string(), href)
}

pub fn header_cells(schema: &GridSchema) -> Vec<HeaderCell> {
    schema
        .column_schemas
        .iter()
        .map(|column| {
            let label = match column.sort_direction {
                Some(1) => format!("{} ↑", column.title),
                Some(-1) => format!("{} ↓", column.title),
                _ => column.title.clone(),
            };
            HeaderCell {
                label,
                title: column.title.clone(),
                width: column.width,
            }
        })
        .collect()
}

/// Background color for a highlight, `None` for the default background.
pub fn highlight_color(highlight: Highlight, config: &GridConfig) -> Option<&str> {
    match highlight {
        Highlight::None => None,
        Highlight::Selected => Some(config.selection_color.as_str()),
        Highlight::Active => Some(config.active_cell_color.as_str()),
    }
}

/// Inputs of [`paint_window`] that describe grid state.
#[derive(Debug, Clone, Copy)]
pub struct PaintState<'a> {
    pub window: &'a ViewportWindow,
    pub layout: &'a GridLayout,
    pub areas: &'a [Range],
    pub active: Range,
    pub focused: bool,
    pub header_selected: bool,
}

/// Paint the window from its materialized `rows` (window-relative; rows past
/// the model's end are absent).
pub fn paint_window(
    rows: &[Vec<Option<CellValue>>],
    schema: &GridSchema,
    config: &GridConfig,
    state: PaintState<'_>,
) -> WindowPaint {
    let highlights = highlight_matrix(state.areas, &state.active, state.window, state.focused);
    let painted = highlights
        .into_iter()
        .enumerate()
        .map(|(view_row, row_highlights)| {
            let values = rows.get(view_row);
            row_highlights
                .into_iter()
                .zip(&schema.column_schemas)
                .enumerate()
                .map(|(col, (highlight, column))| {
                    let text = values
                        .and_then(|r| r.get(col))
                        .and_then(Option::as_ref)
                        .map(|v| column.converter().to_string(v))
                        .unwrap_or_default();
                    let (text, href) = if column.is_uri() {
                        uri_cell(&text)
                    } else {
                        (text, None)
                    };
                    RenderedCell {
                        text,
                        href,
                        highlight,
                        background: highlight_color(highlight, config).map(str::to_string),
                        non_string: column.is_non_string(),
                    }
                })
                .collect()
        })
        .collect();

    let header_color = if state.header_selected && state.focused {
        config.header_selected_color.clone()
    } else {
        config.header_color.clone()
    };

    let rects = if state.focused {
        selection_rects(state.areas, state.window, state.layout)
    } else {
        Vec::new()
    };

    WindowPaint {
        first_row: state.window.first_row(),
        header: header_cells(schema),
        header_color,
        rows: painted,
        selection_rects: rects,
        focused: state.focused,
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
    use crate::types::{ColumnSchema, ColumnType};
    use test_case::test_case;

    #[test_case("[Docs](https://x.org)", Some(("Docs", "https://x.org")) ; "link")]
    #[test_case("[a](b)(c)", Some(("a", "b)(c")) ; "parens inside href")]
    #[test_case("[](b)", None ; "empty text")]
    #[test_case("plain", None ; "no brackets")]
    fn markdown_links(value: &str, expected: Option<(&str, &str)>) {
        assert_eq!(parse_markdown_link(value), expected);
    }

    #[test]
    fn plain_uri_is_own_href() {
        assert_eq!(uri_cell("https://a"), ("https://a".into(), Some("https://a".into())));
        assert_eq!(uri_cell(""), (String::new(), None));
    }

    #[test]
    fn paints_window() {
        let schema = GridSchema::new(vec![
            ColumnSchema {
                sort_direction: Some(-1),
                ..ColumnSchema::new("Name", ColumnType::String)
            },
            ColumnSchema::new("Link", ColumnType::String).with_format("uri"),
        ]);
        let window = ViewportWindow::new(2, 2);
        let layout = GridLayout::new(&schema, &GridConfig::light());
        let rows = vec![vec![Some(CellValue::from("a")), Some(CellValue::from("[x](y)"))]];
        let paint = paint_window(
            &rows,
            &schema,
            &GridConfig::light(),
            PaintState {
                window: &window,
                layout: &layout,
                areas: &[Range::new(0, 0, 1, 2)],
                active: Range::new(0, 0, 1, 1),
                focused: true,
                header_selected: true,
            },
        );
        assert_eq!(paint.header[0].label, "Name ↓");
        assert_eq!(paint.header_color, "#c6c6c6");
        assert_eq!(paint.rows.len(), 2);
        assert_eq!(paint.rows[0][0].highlight, Highlight::Active);
        assert_eq!(paint.rows[0][1].text, "x");
        assert_eq!(paint.rows[0][1].href.as_deref(), Some("y"));
        assert!(paint.rows[0][1].non_string);
        assert_eq!(paint.rows[1][0].text, "");
        assert_eq!(paint.rows[0][0].background.as_deref(), Some("#e6e6e6"));
        assert_eq!(paint.rows[0][1].background.as_deref(), Some("#c6c6c6"));
        assert_eq!(paint.rows[1][0].background, None);
        assert_eq!(paint.selection_rects.len(), 1);
    }

    #[test]
    fn unfocused_paint_has_no_backgrounds_or_rects() {
        let schema = GridSchema::new(vec![ColumnSchema::new("Name", ColumnType::String)]);
        let window = ViewportWindow::new(2, 1);
        let layout = GridLayout::new(&schema, &GridConfig::dark());
        let paint = paint_window(
            &[],
            &schema,
            &GridConfig::dark(),
            PaintState {
                window: &window,
                layout: &layout,
                areas: &[Range::new(0, 0, 2, 1)],
                active: Range::new(0, 0, 1, 1),
                focused: false,
                header_selected: false,
            },
        );
        assert!(paint.selection_rects.is_empty());
        assert!(paint.rows.iter().flatten().all(|c| c.background.is_none()));
    }
}
