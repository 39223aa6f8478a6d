//! WebAssembly entry point and the JS-facing editor handle.

use crate::state::{EditorState, shortcut_hints};
use kurbo::Point;
use postercraft_core::{
    EditingSession, EditorConfig, EditorError, KeyEvent, Modifiers, PointerEvent,
};
use wasm_bindgen::prelude::*;

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Starting PosterCraft (WASM)");
}

fn js_error(err: EditorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// Editor handle owned by the page.
///
/// Every mutating call returns whether anything changed; the page then
/// re-reads [`WebEditor::state`] and [`WebEditor::markup`] to redraw, and
/// calls [`WebEditor::tick`] when the `nextCommitMs` timer expires.
#[wasm_bindgen]
pub struct WebEditor {
    session: EditingSession,
}

#[wasm_bindgen]
impl WebEditor {
    /// Create an editor. `config_json` overrides the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebEditor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(js_error)?,
            None => EditorConfig::default(),
        };
        let session = EditingSession::new(config).map_err(js_error)?;
        Ok(Self { session })
    }

    #[wasm_bindgen(js_name = importHtml)]
    pub fn import_html(&mut self, raw: &str) -> Result<(), JsValue> {
        self.session.import(raw).map_err(js_error)
    }

    #[wasm_bindgen(js_name = loadSample)]
    pub fn load_sample(&mut self) -> Result<(), JsValue> {
        self.session.load_sample().map_err(js_error)
    }

    /// `{ filename, mime_type, content }` for a download.
    #[wasm_bindgen(js_name = exportHtml)]
    pub fn export_html(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.export())
    }

    /// Current document markup for the canvas.
    pub fn markup(&self) -> String {
        self.session.markup()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&EditorState::from_session(&self.session))
    }

    pub fn shortcuts(&self) -> Result<JsValue, JsValue> {
        to_js(&shortcut_hints())
    }

    /// Add a text element; returns its id.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self) -> Result<String, JsValue> {
        let id = self.session.add_text().map_err(js_error)?;
        Ok(id.to_string())
    }

    /// Add an image element; returns its id.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self) -> Result<String, JsValue> {
        let id = self.session.add_image().map_err(js_error)?;
        Ok(id.to_string())
    }

    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    /// Click at canvas-relative coordinates.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f64, y: f64) -> bool {
        self.session.click_at(Point::new(x, y))
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) -> bool {
        self.session.clear_selection()
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<bool, JsValue> {
        self.pointer(PointerEvent::Down { position: Point::new(x, y) })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<bool, JsValue> {
        self.pointer(PointerEvent::Move { position: Point::new(x, y) })
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<bool, JsValue> {
        self.pointer(PointerEvent::Up { position: Point::new(x, y) })
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self) -> bool {
        self.session.double_click()
    }

    #[wasm_bindgen(js_name = endTextEdit)]
    pub fn end_text_edit(&mut self) -> Result<bool, JsValue> {
        self.session.end_text_edit().map_err(js_error)
    }

    #[wasm_bindgen(js_name = setTextContent)]
    pub fn set_text_content(&mut self, text: &str) -> bool {
        self.session.set_text_content(text)
    }

    #[wasm_bindgen(js_name = updateProperty)]
    pub fn update_property(&mut self, name: &str, value: &str) -> bool {
        self.session.update_property(name, value)
    }

    /// Replace the selected image with uploaded file bytes.
    #[wasm_bindgen(js_name = setImageData)]
    pub fn set_image_data(&mut self, bytes: &[u8]) -> Result<bool, JsValue> {
        self.session.set_image_data(bytes).map_err(js_error)
    }

    /// Route a `keydown` event. Returns true if the page should
    /// `preventDefault()`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> Result<bool, JsValue> {
        let event = KeyEvent::new(key, Modifiers { shift, ctrl, alt, meta });
        self.session.key_down(&event).map_err(js_error)
    }

    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.session.undo().map_err(js_error)
    }

    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.session.redo().map_err(js_error)
    }

    /// Fire due history commits; returns how many fired.
    pub fn tick(&mut self) -> Result<u32, JsValue> {
        let fired = self.session.tick().map_err(js_error)?;
        Ok(fired as u32)
    }

    #[wasm_bindgen(js_name = commitNow)]
    pub fn commit_now(&mut self) -> Result<(), JsValue> {
        self.session.commit_now().map_err(js_error)
    }

    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) {
        self.session.clear_history();
    }

    /// Number of history commits still waiting on their delay.
    #[wasm_bindgen(js_name = pendingCommits)]
    pub fn pending_commits(&self) -> u32 {
        self.session.pending_commits() as u32
    }
}

impl WebEditor {
    fn pointer(&mut self, event: PointerEvent) -> Result<bool, JsValue> {
        self.session.pointer_event(event).map_err(js_error)
    }
}
