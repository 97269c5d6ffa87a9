//! JavaScript bindings.
//!
//! `GridView` is the exported handle. The data provider is any JS object
//! exposing `schema`, `rowCount()`, `getCell(row, col)`, `setCell(row, col, value)`,
//! `deleteRow(row)`, `splice(row)`, `removeModel()` and `sort(col)`; the write
//! methods return JSON-Patch arrays.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use tracing::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::events::EventKind;
use crate::grid::{Grid, KeyAction, KeyEvent};
use crate::provider::MatrixView;
use crate::types::{CellValue, GridSchema, Patch, Range};

fn to_js<T: serde::Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

/// [`MatrixView`] backed by a JS object.
pub struct JsMatrixView {
    source: JsValue,
    schema: GridSchema,
}

impl JsMatrixView {
    pub fn new(source: JsValue) -> Result<Self> {
        let schema = Self::read_schema(&source)?;
        Ok(Self { source, schema })
    }

    fn read_schema(source: &JsValue) -> Result<GridSchema> {
        let raw = Reflect::get(source, &JsValue::from_str("schema"))
            .map_err(|e| GridError::Schema(describe(&e)))?;
        let mut schema: GridSchema = serde_wasm_bindgen::from_value(raw)
            .map_err(|e| GridError::Schema(e.to_string()))?;
        schema.normalize_sort_directions();
        Ok(schema)
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Result<JsValue> {
        let method: Function = Reflect::get(&self.source, &JsValue::from_str(name))
            .map_err(|e| GridError::Other(describe(&e)))?
            .dyn_into()
            .map_err(|_| GridError::Other(format!("provider has no method {name}")))?;
        let args: js_sys::Array = args.iter().collect();
        method
            .apply(&self.source, &args)
            .map_err(|e| GridError::Other(format!("{name}: {}", describe(&e))))
    }

    /// Call a write method; failures are logged and yield no patches.
    fn call_patches(&self, name: &str, args: &[JsValue]) -> Vec<Patch> {
        let result = self.call(name, args).and_then(|value| {
            if value.is_undefined() || value.is_null() {
                return Ok(Vec::new());
            }
            serde_wasm_bindgen::from_value(value).map_err(|e| GridError::Other(e.to_string()))
        });
        result.unwrap_or_else(|e| {
            error!(method = name, error = %e, "provider write failed");
            Vec::new()
        })
    }
}

impl MatrixView for JsMatrixView {
    fn schema(&self) -> &GridSchema {
        &self.schema
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn row_count(&self) -> u32 {
        match self.call("rowCount", &[]).map(|v| v.as_f64()) {
            Ok(Some(n)) if n > 0.0 => n.min(f64::from(u32::MAX)) as u32,
            Ok(_) => 0,
            Err(e) => {
                error!(error = %e, "rowCount failed");
                0
            }
        }
    }

    fn get_cell(&self, row: u32, col: u32) -> Option<CellValue> {
        let value = match self.call("getCell", &[row.into(), col.into()]) {
            Ok(value) => value,
            Err(e) => {
                error!(row, col, error = %e, "getCell failed");
                return None;
            }
        };
        if value.is_undefined() || value.is_null() {
            return None;
        }
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| warn!(row, col, error = %e, "unsupported cell value"))
            .ok()
    }

    fn set_cell(&mut self, row: u32, col: u32, value: Option<CellValue>) -> Vec<Patch> {
        let js_value = match value.as_ref().map(serde_wasm_bindgen::to_value) {
            Some(Ok(v)) => v,
            Some(Err(e)) => {
                error!(row, col, error = %e, "cell value not serializable");
                return Vec::new();
            }
            None => JsValue::UNDEFINED,
        };
        self.call_patches("setCell", &[row.into(), col.into(), js_value])
    }

    fn delete_row(&mut self, row: u32) -> Vec<Patch> {
        self.call_patches("deleteRow", &[row.into()])
    }

    fn splice(&mut self, before_row: u32) -> Vec<Patch> {
        self.call_patches("splice", &[before_row.into()])
    }

    fn remove_model(&mut self) -> Vec<Patch> {
        self.call_patches("removeModel", &[])
    }

    fn sort(&mut self, col: u32) {
        if let Err(e) = self.call("sort", &[col.into()]) {
            error!(col, error = %e, "sort failed");
            return;
        }
        // The provider flips the column's sort direction.
        match Self::read_schema(&self.source) {
            Ok(schema) => self.schema = schema,
            Err(e) => warn!(error = %e, "schema reload after sort failed"),
        }
    }
}

type SharedGrid = Rc<RefCell<Grid<JsMatrixView>>>;
type JsListeners = Rc<RefCell<HashMap<EventKind, Function>>>;

/// Grid handle exported to JavaScript.
///
/// The grid queues its events; they reach JS listeners only after the grid
/// borrow is released, so a listener may call straight back into the view.
#[wasm_bindgen]
pub struct GridView {
    grid: SharedGrid,
    listeners: JsListeners,
    /// Receives failures of asynchronous clipboard completions.
    error_handler: Rc<RefCell<Option<Function>>>,
}

#[wasm_bindgen]
impl GridView {
    /// `config` may be `undefined` for the light theme.
    #[wasm_bindgen(constructor)]
    pub fn new(
        provider: JsValue,
        height: f32,
        config: JsValue,
    ) -> std::result::Result<GridView, JsValue> {
        console_error_panic_hook::set_once();
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Config: {e}")))?
        };
        let view = JsMatrixView::new(provider).map_err(JsValue::from)?;
        let mut grid = Grid::new(view, config, height);
        grid.queue_events();
        Ok(GridView {
            grid: Rc::new(RefCell::new(grid)),
            listeners: Rc::new(RefCell::new(HashMap::new())),
            error_handler: Rc::new(RefCell::new(None)),
        })
    }

    #[wasm_bindgen(js_name = "setErrorHandler")]
    pub fn set_error_handler(&self, handler: Option<Function>) {
        *self.error_handler.borrow_mut() = handler;
    }

    /// Returns whether the key was consumed. Precondition failures are
    /// thrown.
    #[wasm_bindgen(js_name = "handleKey")]
    pub fn handle_key(&self, event: JsValue) -> std::result::Result<bool, JsValue> {
        let event: KeyEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|e| JsValue::from_str(&format!("Key event: {e}")))?;
        let action = self.grid.borrow_mut().handle_key(&event);
        self.dispatch();
        match action.map_err(JsValue::from)? {
            KeyAction::Handled => Ok(true),
            KeyAction::Ignored => Ok(false),
            KeyAction::WriteClipboard { text } => {
                self.write_clipboard(text);
                Ok(true)
            }
            KeyAction::ReadClipboard => {
                self.read_clipboard();
                Ok(true)
            }
        }
    }

    fn dispatch(&self) {
        dispatch(&self.grid, &self.listeners);
    }

    fn write_clipboard(&self, text: String) {
        let grid = Rc::clone(&self.grid);
        let listeners = Rc::clone(&self.listeners);
        let handler = Rc::clone(&self.error_handler);
        spawn_local(async move {
            let written = match web_sys::window() {
                Some(window) => JsFuture::from(window.navigator().clipboard().write_text(&text))
                    .await
                    .map(|_| ())
                    .map_err(|e| GridError::Clipboard(describe(&e))),
                None => Err(GridError::Clipboard("no window".into())),
            };
            let result = grid.borrow_mut().finish_copy(written);
            dispatch(&grid, &listeners);
            report(&handler, result);
        });
    }

    fn read_clipboard(&self) {
        let grid = Rc::clone(&self.grid);
        let listeners = Rc::clone(&self.listeners);
        let handler = Rc::clone(&self.error_handler);
        spawn_local(async move {
            let read = match web_sys::window() {
                Some(window) => JsFuture::from(window.navigator().clipboard().read_text())
                    .await
                    .map(|v| v.as_string().unwrap_or_default())
                    .map_err(|e| GridError::Clipboard(describe(&e))),
                None => Err(GridError::Clipboard("no window".into())),
            };
            let result = grid.borrow_mut().finish_paste(read);
            dispatch(&grid, &listeners);
            report(&handler, result);
        });
    }

    /// Paste `text` directly, bypassing the system clipboard.
    #[wasm_bindgen(js_name = "pasteText")]
    pub fn paste_text(&self, text: &str) -> std::result::Result<(), JsValue> {
        let result = self.grid.borrow_mut().paste_text(text);
        self.dispatch();
        result.map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&self, x: f32, y: f32, shift: bool, ctrl: bool) {
        self.grid.borrow_mut().pointer_down(x, y, shift, ctrl);
        self.dispatch();
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&self, x: f32, y: f32) {
        self.grid.borrow_mut().pointer_move(x, y);
        self.dispatch();
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&self) {
        self.grid.borrow_mut().pointer_up();
        self.dispatch();
    }

    #[wasm_bindgen(js_name = "pointerLeave")]
    pub fn pointer_leave(&self) {
        self.grid.borrow_mut().pointer_leave();
        self.dispatch();
    }

    #[wasm_bindgen(js_name = "doubleClick")]
    pub fn double_click(&self, x: f32, y: f32) {
        self.grid.borrow_mut().double_click(x, y);
        self.dispatch();
    }

    /// Returns whether the window moved (the host then prevents default).
    pub fn wheel(&self, delta_y: f64, ctrl: bool) -> bool {
        let moved = self.grid.borrow_mut().wheel(delta_y, ctrl);
        self.dispatch();
        moved
    }

    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&self, value: u32) {
        self.grid.borrow_mut().scroll_to(value);
        self.dispatch();
    }

    #[wasm_bindgen(js_name = "scrollIndicator")]
    pub fn scroll_indicator(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.borrow().scroll_indicator())
    }

    pub fn resize(&self, height: f32) {
        self.grid.borrow_mut().resize(height);
        self.dispatch();
    }

    pub fn refresh(&self) {
        self.grid.borrow_mut().refresh();
        self.dispatch();
    }

    /// Everything the host needs to draw the window.
    pub fn paint(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.borrow().paint())
    }

    pub fn focus(&self) {
        self.grid.borrow_mut().focus();
        self.dispatch();
    }

    pub fn blur(&self) {
        self.grid.borrow_mut().blur();
        self.dispatch();
    }

    #[wasm_bindgen(js_name = "setEditorText")]
    pub fn set_editor_text(&self, text: &str) {
        self.grid.borrow_mut().set_editor_text(text);
    }

    #[wasm_bindgen(js_name = "editorState")]
    pub fn editor_state(&self) -> std::result::Result<JsValue, JsValue> {
        let grid = self.grid.borrow();
        let active = grid.active();
        to_js(&serde_json::json!({
            "mode": active.mode(),
            "text": active.buffer().text(),
            "multiline": active.buffer().is_multiline(),
            "suggestions": grid.editor_suggestions(),
        }))
    }

    pub fn sort(&self, col: u32) -> std::result::Result<(), JsValue> {
        let result = self.grid.borrow_mut().sort(col);
        self.dispatch();
        result.map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "getActiveCell")]
    pub fn get_active_cell(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.borrow().get_active_cell())
    }

    #[wasm_bindgen(js_name = "getSelection")]
    pub fn get_selection(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.borrow().get_selection())
    }

    #[wasm_bindgen(js_name = "getRange")]
    pub fn get_range(
        &self,
        row: u32,
        col: u32,
        row_count: u32,
        col_count: u32,
    ) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.borrow().get_range(row, col, row_count, col_count))
    }

    pub fn select(&self, range: JsValue) -> std::result::Result<(), JsValue> {
        let range: Range = serde_wasm_bindgen::from_value(range)
            .map_err(|e| JsValue::from_str(&format!("Range: {e}")))?;
        self.grid.borrow_mut().select(&range);
        self.dispatch();
        Ok(())
    }

    /// Register `callback` for `dataChanged`, `activeCellChanged`,
    /// `selectionChanged` or `paste`, replacing any previous one.
    #[wasm_bindgen(js_name = "addEventListener")]
    pub fn add_event_listener(
        &self,
        name: &str,
        callback: Function,
    ) -> std::result::Result<(), JsValue> {
        let kind = EventKind::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown event: {name}")))?;
        self.listeners.borrow_mut().insert(kind, callback);
        Ok(())
    }
}

/// Deliver the grid's queued events with no borrow held.
fn dispatch(grid: &SharedGrid, listeners: &JsListeners) {
    let events = grid.borrow_mut().take_events();
    for event in events {
        let kind = event.kind();
        let callback = listeners.borrow().get(&kind).cloned();
        let Some(callback) = callback else {
            continue;
        };
        let delivered = serde_wasm_bindgen::to_value(&event)
            .map_err(|e| GridError::Listener(e.to_string()))
            .and_then(|detail| {
                callback
                    .call1(&JsValue::NULL, &detail)
                    .map_err(|e| GridError::Listener(describe(&e)))
            });
        if let Err(e) = delivered {
            error!(event = kind.name(), error = %e, "listener failed");
        }
    }
}

fn report(handler: &Rc<RefCell<Option<Function>>>, result: Result<()>) {
    let Err(e) = result else {
        return;
    };
    error!(error = %e, "clipboard operation failed");
    let callback = handler.borrow().clone();
    if let Some(callback) = callback {
        if let Err(js) = callback.call1(&JsValue::NULL, &JsValue::from_str(&e.to_string())) {
            error!(error = %describe(&js), "error handler failed");
        }
    }
}
