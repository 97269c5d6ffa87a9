//! cellgrid - spreadsheet-like grid engine for the web
//!
//! Drives an editable data grid in the browser via WebAssembly:
//! - Virtualized viewport: only the visible rows are read from the data provider
//! - Multi-area selection with keyboard and pointer navigation
//! - In-cell editing with input/edit modes and typed converters
//! - Copy, cut and paste as TSV through the system clipboard
//! - Every mutation published as JSON-Patch operations
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'cellgrid';
//! await init();
//! const grid = new GridView(provider, container.clientHeight);
//! grid.addEventListener('dataChanged', patches => sync(patches));
//! container.onkeydown = e => { if (grid.handleKey(e)) e.preventDefault(); draw(grid.paint()); };
//! ```

pub mod clipboard;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod provider;
pub mod render;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use config::{ColorScheme, GridConfig};
pub use error::{GridError, Result};
pub use events::{EventKind, GridEvent};
pub use grid::{Grid, KeyAction, KeyEvent};
pub use provider::{MatrixView, RowMatrixView};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use wasm::GridView;

/// Decode TSV clipboard text into a JSON matrix of strings.
///
/// # Errors
/// Returns an error if the rows do not all have the same length.
#[wasm_bindgen(js_name = "tsvToJson")]
pub fn tsv_to_json(text: &str) -> std::result::Result<String, JsValue> {
    let matrix = clipboard::text_to_matrix(text, clipboard::TAB)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&matrix)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
