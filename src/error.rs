//! Structured error types for cellgrid.
//!
//! Every failure is terminal for the single user action that caused it; the
//! grid never retries.

/// All errors that can occur while driving the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Pasted text is not a rectangular matrix.
    #[error("Pasted text must be rectangular: row {row} has {found} columns, expected {expected}")]
    Format {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The action is not allowed for the current selection or grid state.
    #[error("{0}")]
    Precondition(String),

    /// The system clipboard rejected a read or write.
    #[error("Clipboard: {0}")]
    Clipboard(String),

    /// A clipboard operation was started while another one is still pending.
    #[error("Another clipboard operation is still pending")]
    ClipboardBusy,

    /// Schema lookup or decode failure.
    #[error("Schema: {0}")]
    Schema(String),

    /// A host listener reported a failure.
    #[error("Listener: {0}")]
    Listener(String),

    /// Configuration could not be decoded.
    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// Pasting into or copying from several areas at once.
    pub(crate) fn multi_selection() -> Self {
        Self::Precondition("This action is not possible with multi-selections.".into())
    }

    /// Parts of the target touch a read-only column.
    pub(crate) fn locked_cells() -> Self {
        Self::Precondition("Parts of the cells are locked!".into())
    }

    /// The whole grid is read-only.
    pub(crate) fn locked_grid() -> Self {
        Self::Precondition("This grid is locked!".into())
    }
}

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
