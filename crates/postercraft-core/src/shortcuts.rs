//! Keyboard shortcut resolution and documentation.

use crate::input::KeyEvent;
use serde::{Deserialize, Serialize};

/// Editing action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortcutAction {
    DeleteSelection,
    Undo,
    Redo,
    ClearSelection,
}

impl ShortcutAction {
    /// Resolve a key press to an action.
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        let modifiers = event.modifiers;
        if event.key == "Delete" {
            return Some(ShortcutAction::DeleteSelection);
        }
        if event.key == "Escape" {
            return Some(ShortcutAction::ClearSelection);
        }
        if !modifiers.command() {
            return None;
        }
        match event.key.to_ascii_lowercase().as_str() {
            "z" if modifiers.shift => Some(ShortcutAction::Redo),
            "z" => Some(ShortcutAction::Undo),
            "y" => Some(ShortcutAction::Redo),
            _ => None,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl/Cmd+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl/Cmd");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, ShortcutAction::DeleteSelection, "Delete selected element"),
            Shortcut::new("Z", true, false, ShortcutAction::Undo, "Undo"),
            Shortcut::new("Y", true, false, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Escape", false, false, ShortcutAction::ClearSelection, "Clear selection"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn test_resolve_keys() {
        assert_eq!(ShortcutAction::from_key(&KeyEvent::plain("Delete")), Some(ShortcutAction::DeleteSelection));
        assert_eq!(ShortcutAction::from_key(&KeyEvent::plain("Escape")), Some(ShortcutAction::ClearSelection));
        assert_eq!(ShortcutAction::from_key(&KeyEvent::ctrl("z")), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutAction::from_key(&KeyEvent::ctrl("y")), Some(ShortcutAction::Redo));
        let cmd_shift = Modifiers { meta: true, shift: true, ..Modifiers::default() };
        assert_eq!(ShortcutAction::from_key(&KeyEvent::new("Z", cmd_shift)), Some(ShortcutAction::Redo));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(ShortcutAction::from_key(&KeyEvent::plain("z")), None);
        assert_eq!(ShortcutAction::from_key(&KeyEvent::plain("Backspace")), None);
        assert_eq!(ShortcutAction::from_key(&KeyEvent::ctrl("s")), None);
    }

    #[test]
    fn test_registry_matches_resolution() {
        for shortcut in ShortcutRegistry::all() {
            let modifiers = Modifiers { ctrl: shortcut.ctrl, shift: shortcut.shift, ..Modifiers::default() };
            let event = KeyEvent::new(shortcut.key, modifiers);
            assert_eq!(ShortcutAction::from_key(&event), Some(shortcut.action), "{}", shortcut.format());
        }
        assert_eq!(ShortcutRegistry::all()[3].format(), "Ctrl/Cmd+Shift+Z");
    }
}
