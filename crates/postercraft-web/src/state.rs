//! Snapshot of everything the page needs to redraw.

use postercraft_core::{EditingSession, ElementProperties, SelectionOverlay, ShortcutRegistry};
use serde::Serialize;

/// Help entry for one shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutHint {
    pub keys: String,
    pub description: String,
}

/// View state derived from an [`EditingSession`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// Overlay to draw over the selection, absent while dragging.
    pub overlay: Option<SelectionOverlay>,
    pub properties: Option<ElementProperties>,
    pub status: String,
    pub can_undo: bool,
    pub can_redo: bool,
    pub editing_text: bool,
    pub dragging: bool,
    /// Milliseconds until a pending history commit is due.
    pub next_commit_ms: Option<f64>,
}

impl EditorState {
    pub fn from_session(session: &EditingSession) -> Self {
        Self {
            overlay: session.overlay(),
            properties: session.properties(),
            status: session.status_line(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
            editing_text: session.is_editing_text(),
            dragging: session.is_dragging(),
            next_commit_ms: session
                .next_commit_delay()
                .map(|delay| delay.as_secs_f64() * 1000.0),
        }
    }
}

/// Shortcut list for the help panel.
pub fn shortcut_hints() -> Vec<ShortcutHint> {
    ShortcutRegistry::all()
        .into_iter()
        .map(|shortcut| ShortcutHint {
            keys: shortcut.format(),
            description: shortcut.description.to_string(),
        })
        .collect()
}
