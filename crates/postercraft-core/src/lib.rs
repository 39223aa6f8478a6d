//! PosterCraft Core Library
//!
//! Platform-agnostic document model and editing engine for the PosterCraft
//! HTML poster editor.

pub mod canvas;
pub mod commit;
pub mod config;
pub mod drag;
pub mod elements;
pub mod error;
pub mod export;
pub mod history;
pub mod input;
pub mod layout;
pub mod markup;
pub mod properties;
pub mod sample;
pub mod sanitize;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod store;

pub use canvas::CanvasDocument;
pub use commit::{CommitScheduler, EditKind};
pub use config::{CommitPolicy, EditorConfig};
pub use drag::{DragController, DragOutcome};
pub use elements::{Element, ElementId, ElementKind, ImageFormat, InlineStyle, Node, StyleProperty};
pub use error::{EditorError, Result};
pub use export::ExportedDocument;
pub use history::{HistoryEntry, HistoryStack};
pub use input::{KeyEvent, Modifiers, PointerEvent};
pub use properties::{ElementProperties, PropertyDetails};
pub use sanitize::{AllowListSanitizer, Sanitizer};
pub use selection::{PointerTarget, Selection, SelectionManager, SelectionOverlay};
pub use session::EditingSession;
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use store::{ElementStore, NewElementKind};
