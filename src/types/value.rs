use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single logical cell value as stored by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl CellValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Total ordering used for sorting. Kinds rank numbers first, then
    /// booleans, then strings; integers and numbers compare as one kind.
    pub fn cmp_value(&self, other: &CellValue) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => match (self, other) {
                (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
                (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
                _ => self.kind_rank().cmp(&other.kind_rank()),
            },
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Integer(_) | CellValue::Number(_) => 0,
            CellValue::Boolean(_) => 1,
            CellValue::String(_) => 2,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

/// Converts between stored values and the text shown, copied and edited.
pub trait Converter {
    /// Display / clipboard representation.
    fn to_string(&self, value: &CellValue) -> String;

    /// Parse user or clipboard text. Unparseable text is kept as a string value.
    fn from_string(&self, text: &str) -> CellValue;

    /// Text placed into the editor when entering edit mode.
    fn to_editable(&self, value: &CellValue) -> String {
        self.to_string(value)
    }
}

fn plain_text(value: &CellValue) -> String {
    match value {
        CellValue::Boolean(b) => b.to_string(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Number(n) => n.to_string(),
        CellValue::String(s) => s.clone(),
    }
}

pub struct StringConverter;

impl Converter for StringConverter {
    fn to_string(&self, value: &CellValue) -> String {
        plain_text(value)
    }

    fn from_string(&self, text: &str) -> CellValue {
        CellValue::String(text.to_string())
    }
}

pub struct NumberConverter;

impl Converter for NumberConverter {
    fn to_string(&self, value: &CellValue) -> String {
        plain_text(value)
    }

    fn from_string(&self, text: &str) -> CellValue {
        match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::String(text.to_string()),
        }
    }
}

pub struct IntegerConverter;

impl Converter for IntegerConverter {
    fn to_string(&self, value: &CellValue) -> String {
        plain_text(value)
    }

    fn from_string(&self, text: &str) -> CellValue {
        match text.trim().parse::<i64>() {
            Ok(i) => CellValue::Integer(i),
            Err(_) => CellValue::String(text.to_string()),
        }
    }
}

pub struct BooleanConverter;

impl Converter for BooleanConverter {
    fn to_string(&self, value: &CellValue) -> String {
        plain_text(value)
    }

    fn from_string(&self, text: &str) -> CellValue {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            CellValue::Boolean(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            CellValue::Boolean(false)
        } else {
            CellValue::String(text.to_string())
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

    #[test_case("42", CellValue::Number(42.0) ; "integer text")]
    #[test_case(" 3.5 ", CellValue::Number(3.5) ; "padded decimal")]
    #[test_case("abc", CellValue::String("abc".into()) ; "not a number")]
    #[test_case("NaN", CellValue::String("NaN".into()) ; "non finite")]
    fn number_from_string(text: &str, expected: CellValue) {
        assert_eq!(NumberConverter.from_string(text), expected);
    }

    #[test_case("7", CellValue::Integer(7) ; "plain")]
    #[test_case("7.5", CellValue::String("7.5".into()) ; "fraction kept as text")]
    fn integer_from_string(text: &str, expected: CellValue) {
        assert_eq!(IntegerConverter.from_string(text), expected);
    }

    #[test]
    fn boolean_is_case_insensitive() {
        assert_eq!(BooleanConverter.from_string("TRUE"), CellValue::Boolean(true));
        assert_eq!(BooleanConverter.from_string("False"), CellValue::Boolean(false));
        assert_eq!(BooleanConverter.to_string(&CellValue::Boolean(true)), "true");
    }

    #[test]
    fn untagged_json_roundtrip_picks_narrowest_kind() {
        let values: Vec<CellValue> = serde_json::from_str(r#"[true, 3, 3.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Boolean(true),
                CellValue::Integer(3),
                CellValue::Number(3.5),
                CellValue::String("x".into()),
            ]
        );
    }

    #[test]
    fn numbers_compare_across_integer_and_float() {
        assert_eq!(
            CellValue::from(2_i64).cmp_value(&CellValue::from(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            CellValue::from(1.5).cmp_value(&CellValue::from(1.5)),
            Ordering::Equal
        );
    }

    #[test]
    fn kinds_rank_numbers_booleans_strings() {
        let mut values = vec![
            CellValue::from("b"),
            CellValue::from(true),
            CellValue::from(3.0),
            CellValue::from("a"),
            CellValue::from(false),
            CellValue::from(-1_i64),
        ];
        values.sort_by(CellValue::cmp_value);
        assert_eq!(
            values,
            vec![
                CellValue::from(-1_i64),
                CellValue::from(3.0),
                CellValue::from(false),
                CellValue::from(true),
                CellValue::from("a"),
                CellValue::from("b"),
            ]
        );
    }
}
