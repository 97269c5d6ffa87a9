use serde::{Deserialize, Serialize};

use super::CellValue;

/// JSON-Patch style operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

/// One change record returned by a data-provider mutation.
///
/// Paths address the provider's row-major model: `/{row}/{col}` for cells,
/// `/{row}` for whole rows and `""` for the model itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Patch {
    pub fn add(path: impl Into<String>, value: Option<serde_json::Value>) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value,
        }
    }

    pub fn replace(path: impl Into<String>, value: Option<serde_json::Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value,
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }

    pub fn cell_path(row: u32, col: u32) -> String {
        format!("/{row}/{col}")
    }

    pub fn row_path(row: u32) -> String {
        format!("/{row}")
    }
}

/// Serialize an optional cell value for a patch payload.
pub fn patch_value(value: Option<&CellValue>) -> Option<serde_json::Value> {
    value.and_then(|v| serde_json::to_value(v).ok())
}
