use serde::{Deserialize, Serialize};

use super::{
    BooleanConverter, Converter, IntegerConverter, NumberConverter, StringConverter,
};

/// Value kind of a column; selects the column's converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
}

/// Per-column schema as supplied by the data provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub title: String,
    /// Pixel width of the cell content box.
    #[serde(default = "default_column_width")]
    pub width: f32,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// Allowed values, offered as editor suggestions.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Display format hint, e.g. `"uri"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `1` ascending, `-1` descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<i8>,
}

fn default_column_width() -> f32 {
    100.0
}

impl ColumnSchema {
    pub fn new(title: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            title: title.into(),
            width: default_column_width(),
            column_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_enum(mut self, values: Vec<String>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn converter(&self) -> &'static dyn Converter {
        match self.column_type {
            ColumnType::String => &StringConverter,
            ColumnType::Number => &NumberConverter,
            ColumnType::Integer => &IntegerConverter,
            ColumnType::Boolean => &BooleanConverter,
        }
    }

    pub fn is_uri(&self) -> bool {
        self.format.as_deref() == Some("uri")
    }

    /// Right-aligned display for anything that is not a plain string.
    pub fn is_non_string(&self) -> bool {
        self.column_type != ColumnType::String || self.format.is_some()
    }
}

/// Grid-level schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSchema {
    #[serde(default)]
    pub title: String,
    /// Default for columns without their own `readOnly`.
    #[serde(default)]
    pub read_only: bool,
    pub column_schemas: Vec<ColumnSchema>,
}

impl GridSchema {
    pub fn new(column_schemas: Vec<ColumnSchema>) -> Self {
        Self {
            title: String::new(),
            read_only: false,
            column_schemas,
        }
    }

    pub fn column_count(&self) -> u32 {
        u32::try_from(self.column_schemas.len()).unwrap_or(u32::MAX)
    }

    pub fn column(&self, col: u32) -> Option<&ColumnSchema> {
        self.column_schemas.get(usize::try_from(col).ok()?)
    }

    /// Column read-only flag, falling back to the grid-level default.
    pub fn is_column_read_only(&self, col: u32) -> bool {
        self.column(col)
            .and_then(|c| c.read_only)
            .unwrap_or(self.read_only)
    }

    /// Keep the sort direction only on the first column that has one.
    pub fn normalize_sort_directions(&mut self) {
        let mut seen = false;
        for column in &mut self.column_schemas {
            if matches!(column.sort_direction, Some(1 | -1)) {
                if seen {
                    column.sort_direction = None;
                }
                seen = true;
            }
        }
    }

    /// Set `direction` on `col`, clearing every other column's direction.
    pub fn set_sort_direction(&mut self, col: u32, direction: i8) {
        for (index, column) in self.column_schemas.iter_mut().enumerate() {
            column.sort_direction = if u32::try_from(index).ok() == Some(col) {
                Some(direction)
            } else {
                None
            };
        }
    }

    pub fn titles(&self, columns: impl Iterator<Item = u32>) -> Vec<String> {
        columns
            .filter_map(|c| self.column(c).map(|s| s.title.clone()))
            .collect()
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

    #[test]
    fn decodes_host_schema_json() {
        let json = r#"{
            "title": "Prices",
            "readOnly": true,
            "columnSchemas": [
                {"title": "Date", "width": 120, "type": "string", "readOnly": false},
                {"title": "Price", "width": 80, "type": "number", "sortDirection": 1},
                {"title": "Kind", "width": 60, "type": "string", "enum": ["a", "b"]},
                {"title": "Link", "width": 60, "type": "string", "format": "uri"}
            ]
        }"#;
        let schema: GridSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.column_count(), 4);
        assert!(!schema.is_column_read_only(0));
        assert!(schema.is_column_read_only(1));
        assert_eq!(schema.column(1).unwrap().column_type, ColumnType::Number);
        assert_eq!(
            schema.column(2).unwrap().enum_values.as_deref(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert!(schema.column(3).unwrap().is_uri());
        assert_eq!(schema.column(0).unwrap().width, 120.0);
    }

    #[test]
    fn only_first_sort_direction_survives() {
        let mut schema = GridSchema::new(vec![
            ColumnSchema::new("a", ColumnType::String),
            ColumnSchema {
                sort_direction: Some(-1),
                ..ColumnSchema::new("b", ColumnType::String)
            },
            ColumnSchema {
                sort_direction: Some(1),
                ..ColumnSchema::new("c", ColumnType::String)
            },
        ]);
        schema.normalize_sort_directions();
        assert_eq!(schema.column(1).unwrap().sort_direction, Some(-1));
        assert_eq!(schema.column(2).unwrap().sort_direction, None);
    }

    #[test]
    fn setting_sort_direction_clears_others() {
        let mut schema = GridSchema::new(vec![
            ColumnSchema {
                sort_direction: Some(1),
                ..ColumnSchema::new("a", ColumnType::String)
            },
            ColumnSchema::new("b", ColumnType::String),
        ]);
        schema.set_sort_direction(1, -1);
        assert_eq!(schema.column(0).unwrap().sort_direction, None);
        assert_eq!(schema.column(1).unwrap().sort_direction, Some(-1));
    }
}
