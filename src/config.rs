//! Theme and geometry configuration supplied by the host.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Named theme preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Colors are CSS color strings handed through to the host's painter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub selection_color: String,
    pub active_cell_color: String,
    pub header_color: String,
    pub header_selected_color: String,
    pub border_width: f32,
    pub line_height: f32,
    pub cell_padding: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::light()
    }
}

impl GridConfig {
    pub fn light() -> Self {
        Self {
            selection_color: "#c6c6c6".into(),
            active_cell_color: "#e6e6e6".into(),
            header_color: "#e6e6e6".into(),
            header_selected_color: "#c6c6c6".into(),
            border_width: 1.0,
            line_height: 22.0,
            cell_padding: 3.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            selection_color: "slategrey".into(),
            active_cell_color: "dimgrey".into(),
            header_color: "dimgrey".into(),
            header_selected_color: "slategrey".into(),
            border_width: 0.5,
            ..Self::light()
        }
    }

    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
        }
    }

    /// Decode from JSON; missing fields take the light preset's values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pixel height of one row including its top and bottom border.
    pub fn row_height(&self) -> f32 {
        self.line_height + 2.0 * self.border_width
    }

    /// Data rows that fit into `total_height` pixels, one row being taken by
    /// the header.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn viewport_row_count(&self, total_height: f32) -> u32 {
        let row_height = self.row_height();
        if row_height <= 0.0 || !total_height.is_finite() {
            return 0;
        }
        let rows = (total_height / row_height).floor() - 1.0;
        if rows <= 0.0 {
            0
        } else {
            rows.min(u32::MAX as f32) as u32
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn partial_json_falls_back_to_light() {
        let config = GridConfig::from_json(r##"{"selectionColor": "#336699"}"##).unwrap();
        assert_eq!(config.selection_color, "#336699");
        assert_eq!(config.active_cell_color, "#e6e6e6");
        assert_eq!(config.line_height, 22.0);
    }

    #[test]
    fn bad_json_is_config_error() {
        let err = GridConfig::from_json("{").unwrap_err();
        assert!(matches!(err, crate::error::GridError::Config(_)));
    }

    #[test]
    fn dark_preset_has_thin_borders() {
        let dark = GridConfig::for_scheme(ColorScheme::Dark);
        assert_eq!(dark.border_width, 0.5);
        assert_eq!(dark.row_height(), 23.0);
    }

    #[test_case(240.0, 9 ; "ten rows minus header")]
    #[test_case(247.0, 9 ; "partial row ignored")]
    #[test_case(24.0, 0 ; "header only")]
    #[test_case(0.0, 0 ; "no height")]
    fn viewport_rows_for_height(height: f32, expected: u32) {
        assert_eq!(GridConfig::light().viewport_row_count(height), expected);
    }
}
