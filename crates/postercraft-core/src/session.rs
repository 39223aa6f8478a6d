//! Editing session: routes user intents to the store, selection, drag and
//! history, and decides when a change becomes a history entry.

use crate::commit::{CommitScheduler, EditKind};
use crate::config::EditorConfig;
use crate::drag::DragController;
use crate::elements::{ElementId, ElementKind, ImageFormat, StyleProperty, to_data_url};
use crate::error::{EditorError, Result};
use crate::export::{ExportedDocument, export_document};
use crate::history::HistoryStack;
use crate::input::{KeyEvent, PointerEvent};
use crate::properties::ElementProperties;
use crate::sample::SAMPLE_POSTER;
use crate::sanitize::{AllowListSanitizer, Sanitizer};
use crate::selection::{PointerTarget, SelectionManager, SelectionOverlay};
use crate::shortcuts::ShortcutAction;
use crate::store::{ElementStore, NewElementKind};
use kurbo::{Point, Rect};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Attribute marking the element being edited inline.
const EDITABLE_ATTRIBUTE: &str = "contenteditable";

/// One user's editing session over one document.
pub struct EditingSession<S: Sanitizer = AllowListSanitizer> {
    config: EditorConfig,
    sanitizer: S,
    store: ElementStore,
    selection: SelectionManager,
    drag: DragController,
    history: HistoryStack,
    commits: CommitScheduler,
    editing_text: bool,
}

impl EditingSession<AllowListSanitizer> {
    /// Create a session with the default allow-list sanitizer.
    pub fn new(config: EditorConfig) -> Result<Self> {
        Self::with_sanitizer(config, AllowListSanitizer::default())
    }
}

impl Default for EditingSession<AllowListSanitizer> {
    fn default() -> Self {
        Self::build(EditorConfig::default(), AllowListSanitizer::default())
    }
}

impl<S: Sanitizer> EditingSession<S> {
    /// Create a session with a custom sanitizer.
    pub fn with_sanitizer(config: EditorConfig, sanitizer: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, sanitizer))
    }

    fn build(config: EditorConfig, sanitizer: S) -> Self {
        Self {
            store: ElementStore::new(config.canvas_width, config.canvas_height),
            history: HistoryStack::new(config.max_history),
            commits: CommitScheduler::from_config(&config),
            selection: SelectionManager::new(),
            drag: DragController::new(),
            editing_text: false,
            sanitizer,
            config,
        }
    }

    // --- Import / export ---

    /// Sanitize and load markup as the new document, recording it in
    /// history straight away.
    pub fn import(&mut self, raw: &str) -> Result<()> {
        let sanitized = self.sanitizer.sanitize(raw);
        self.store.initialize(&sanitized);
        self.reset_interaction();
        self.commits.cancel_all();
        self.push_snapshot()?;
        log::info!("Imported document with {} elements", self.store.len());
        Ok(())
    }

    /// Import the built-in sample poster.
    pub fn load_sample(&mut self) -> Result<()> {
        self.import(SAMPLE_POSTER)
    }

    /// Export the live document as a standalone HTML file.
    pub fn export(&self) -> ExportedDocument {
        export_document(
            self.store.document(),
            &self.config.export_filename,
            &self.config.export_title,
        )
    }

    /// The document markup as stored (editor artifacts included).
    pub fn markup(&self) -> String {
        self.store.to_markup()
    }

    // --- Structural edits ---

    /// Add a text element to the default container.
    pub fn add_text(&mut self) -> Result<ElementId> {
        self.add_element(NewElementKind::Text)
    }

    /// Add an image element to the default container.
    pub fn add_image(&mut self) -> Result<ElementId> {
        self.add_element(NewElementKind::Image)
    }

    fn add_element(&mut self, kind: NewElementKind) -> Result<ElementId> {
        let container = self.store.default_container();
        let id = self.store.create(kind, container)?;
        self.schedule_commit(EditKind::Structural);
        Ok(id)
    }

    /// Delete the selected element. Returns false when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.selected_id() else {
            return false;
        };
        self.store.delete(id);
        self.reset_interaction();
        self.schedule_commit(EditKind::Structural);
        true
    }

    // --- Selection ---

    /// What a canvas point would hit: the overlay's move handle first, then
    /// the topmost element, else the canvas.
    pub fn pointer_target(&self, point: Point) -> PointerTarget {
        if let Some(overlay) = self.overlay() {
            if overlay.hit_test(point).is_some() {
                return PointerTarget::Overlay;
            }
        }
        match self.store.element_at(point) {
            Some(id) => PointerTarget::Element(id),
            None => PointerTarget::Canvas,
        }
    }

    /// Resolve a click on a target. Returns true if the selection changed.
    pub fn click(&mut self, target: PointerTarget) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        if self.editing_text && target != PointerTarget::Overlay {
            let same = matches!(target, PointerTarget::Element(id) if self.selection.is_selected(id));
            if !same {
                if let Err(err) = self.end_text_edit() {
                    log::error!("Failed to commit text edit: {}", err);
                }
            }
        }
        self.selection.click(target, &self.store)
    }

    /// Click at a canvas point.
    pub fn click_at(&mut self, point: Point) -> bool {
        let target = self.pointer_target(point);
        self.click(target)
    }

    /// Force the unselected state.
    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selection.selected_id()
    }

    /// Canvas-relative rectangle of the selection.
    pub fn selected_rect(&self) -> Option<Rect> {
        self.selection.selection().map(|s| s.rect)
    }

    /// Overlay to draw, hidden while dragging.
    pub fn overlay(&self) -> Option<SelectionOverlay> {
        if self.drag.is_dragging() {
            return None;
        }
        self.selection.overlay(&self.store)
    }

    // --- Dragging ---

    /// Feed a pointer event into the drag pipeline. Returns true if the
    /// event was consumed.
    pub fn pointer_event(&mut self, event: PointerEvent) -> Result<bool> {
        match event {
            PointerEvent::Down { position } => {
                if self.editing_text || self.pointer_target(position) != PointerTarget::Overlay {
                    return Ok(false);
                }
                Ok(self.drag.start_drag(position, &self.selection))
            }
            PointerEvent::Move { position } => {
                if !self.drag.is_dragging() {
                    return Ok(false);
                }
                self.drag.drag_to(position, &mut self.store, &mut self.selection);
                Ok(true)
            }
            PointerEvent::Up { .. } => {
                let Some(outcome) = self.drag.end_drag(&self.store) else {
                    return Ok(false);
                };
                if outcome.moved() {
                    self.push_snapshot()?;
                }
                Ok(true)
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // --- Text and property edits ---

    /// Start inline editing of the selected element. Images cannot be
    /// edited inline.
    pub fn double_click(&mut self) -> bool {
        let Some(id) = self.selection.selected_id() else {
            return false;
        };
        if self.store.get(id).is_none_or(|e| e.kind == ElementKind::Image) {
            return false;
        }
        self.store.set_attribute(id, EDITABLE_ATTRIBUTE, "true");
        self.editing_text = true;
        true
    }

    /// Leave inline editing and record the result immediately.
    pub fn end_text_edit(&mut self) -> Result<bool> {
        if !self.editing_text {
            return Ok(false);
        }
        self.editing_text = false;
        if let Some(id) = self.selection.selected_id() {
            self.store.remove_attribute(id, EDITABLE_ATTRIBUTE);
            self.selection.recompute_rect(&self.store);
        }
        self.push_snapshot()?;
        Ok(true)
    }

    pub fn is_editing_text(&self) -> bool {
        self.editing_text
    }

    /// Replace the selected element's text.
    pub fn set_text_content(&mut self, text: &str) -> bool {
        let Some(id) = self.selection.selected_id() else {
            return false;
        };
        if !self.store.set_text_content(id, text) {
            return false;
        }
        self.selection.recompute_rect(&self.store);
        self.schedule_commit(EditKind::Continuous);
        true
    }

    /// Apply a property-panel edit to the selected element.
    ///
    /// `src` and `alt` set attributes; everything else is a style property.
    pub fn update_property(&mut self, name: &str, value: &str) -> bool {
        let Some(id) = self.selection.selected_id() else {
            return false;
        };
        let applied = match name {
            "src" | "alt" => self.store.set_attribute(id, name, value),
            _ => self.store.update_style(id, &StyleProperty::from_name(name), value),
        };
        if !applied {
            return false;
        }
        self.selection.recompute_rect(&self.store);
        self.schedule_commit(EditKind::Continuous);
        true
    }

    /// Replace the selected image's source with uploaded bytes.
    ///
    /// Returns `Ok(false)` when no image is selected.
    pub fn set_image_data(&mut self, bytes: &[u8]) -> Result<bool> {
        let Some(id) = self.selection.selected_id() else {
            return Ok(false);
        };
        if self.store.get(id).is_none_or(|e| e.kind != ElementKind::Image) {
            return Ok(false);
        }
        let Some(format) = ImageFormat::from_magic_bytes(bytes) else {
            log::warn!("Rejected {} bytes of unrecognised image data", bytes.len());
            return Err(EditorError::UnsupportedImageFormat);
        };
        self.store.set_attribute(id, "src", &to_data_url(bytes, format));
        self.selection.recompute_rect(&self.store);
        self.schedule_commit(EditKind::Structural);
        Ok(true)
    }

    /// Property-panel view of the selection.
    pub fn properties(&self) -> Option<ElementProperties> {
        ElementProperties::from_selection(self.selection.selection()?, &self.store)
    }

    /// One-line description of the selection for a status bar.
    pub fn status_line(&self) -> String {
        let Some(selection) = self.selection.selection() else {
            return "No element selected • Click an element to edit".to_string();
        };
        let tag = self.store.get(selection.id).map(|e| e.tag.as_str()).unwrap_or("?");
        let rect = selection.rect;
        format!(
            "Selected: {} at ({}, {}) • Size: {}×{}px",
            tag,
            rect.x0.round(),
            rect.y0.round(),
            rect.width().round(),
            rect.height().round()
        )
    }

    // --- Keyboard ---

    /// Handle a key press. Shortcuts are ignored while editing text.
    /// Returns true if the key triggered an action.
    pub fn key_down(&mut self, event: &KeyEvent) -> Result<bool> {
        if self.editing_text {
            return Ok(false);
        }
        let Some(action) = ShortcutAction::from_key(event) else {
            return Ok(false);
        };
        match action {
            ShortcutAction::DeleteSelection => Ok(self.delete_selected()),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ClearSelection => {
                self.clear_selection();
                Ok(true)
            }
        }
    }

    // --- History ---

    /// Restore the previous history entry. Returns false at the oldest
    /// entry.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.undo().map(str::to_owned) else {
            return Ok(false);
        };
        self.restore(&snapshot)?;
        log::info!("Undo");
        Ok(true)
    }

    /// Restore the next history entry. Returns false at the newest entry.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.redo().map(str::to_owned) else {
            return Ok(false);
        };
        self.restore(&snapshot)?;
        log::info!("Redo");
        Ok(true)
    }

    fn restore(&mut self, snapshot: &str) -> Result<()> {
        if let Err(err) = self.store.restore(snapshot) {
            log::error!("Failed to restore history snapshot: {}", err);
            return Err(err);
        }
        self.reset_interaction();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop all history and pending commits.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.commits.cancel_all();
    }

    /// Fire every commit due at `now`; each one records the document as it
    /// is at that moment. Returns how many fired.
    pub fn poll_commits(&mut self, now: Instant) -> Result<usize> {
        let fired = self.commits.poll(now);
        for _ in 0..fired {
            self.push_snapshot()?;
        }
        Ok(fired)
    }

    /// [`EditingSession::poll_commits`] with the current time.
    pub fn tick(&mut self) -> Result<usize> {
        self.poll_commits(Instant::now())
    }

    /// Cancel pending commits and record the document right away.
    pub fn commit_now(&mut self) -> Result<()> {
        self.commits.cancel_all();
        self.push_snapshot()
    }

    /// When the next pending commit is due, for hosts arming a timer.
    pub fn next_commit_due(&self) -> Option<Instant> {
        self.commits.next_due()
    }

    /// Time left until the next pending commit.
    pub fn next_commit_delay(&self) -> Option<Duration> {
        self.next_commit_due()
            .map(|due| due.saturating_duration_since(Instant::now()))
    }

    fn schedule_commit(&mut self, kind: EditKind) {
        self.commits.schedule(kind, Instant::now());
    }

    fn push_snapshot(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot()?;
        self.history.push(snapshot);
        log::debug!(
            "History entry recorded ({} of {})",
            self.history.current_index().map_or(0, |i| i + 1),
            self.history.len()
        );
        Ok(())
    }

    /// Clear selection, drag and text-edit state after the document was
    /// replaced or the selected element removed.
    fn reset_interaction(&mut self) {
        self.selection.clear();
        self.drag.reset();
        self.editing_text = false;
    }

    // --- Accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn pending_commits(&self) -> usize {
        self.commits.pending_count()
    }
}
