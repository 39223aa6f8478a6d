//! Single-element selection and its overlay.

use crate::elements::ElementId;
use crate::store::ElementStore;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Diameter of the interactive move handle.
pub const MOVE_HANDLE_SIZE: f64 = 24.0;
/// Diameter of the decorative corner handles.
pub const CORNER_HANDLE_SIZE: f64 = 12.0;
/// How far handles sit outside the selection rectangle.
const HANDLE_OUTSET: f64 = 8.0;
/// Height of the tag label drawn above the rectangle.
const LABEL_OFFSET: f64 = 24.0;

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// The empty canvas root.
    Canvas,
    /// Part of the selection overlay.
    Overlay,
    /// A document element.
    Element(ElementId),
}

/// Type of overlay handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Top-right handle that starts a drag.
    Move,
    /// Decorative corner markers.
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl HandleKind {
    pub fn is_interactive(&self) -> bool {
        matches!(self, HandleKind::Move)
    }
}

/// An overlay handle with its centre and diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    /// Centre in canvas coordinates.
    pub position: Point,
    pub size: f64,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, size: f64, kind: HandleKind) -> Self {
        Self { position, size, kind }
    }

    /// Check if a point hits this (round) handle.
    pub fn hit_test(&self, point: Point) -> bool {
        let radius = self.size / 2.0;
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= radius * radius
    }
}

/// Visual decoration for the current selection. Derived from the selection
/// on demand; never part of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOverlay {
    pub rect: Rect,
    /// Lowercase tag name of the selected element.
    pub label: String,
    /// Top-left of the label.
    pub label_position: Point,
    pub handles: Vec<Handle>,
}

impl SelectionOverlay {
    pub fn new(rect: Rect, label: &str) -> Self {
        let half_move = MOVE_HANDLE_SIZE / 2.0;
        let half_corner = CORNER_HANDLE_SIZE / 2.0;
        let handles = vec![
            Handle::new(
                Point::new(rect.x1 + HANDLE_OUTSET - half_move, rect.y0 - HANDLE_OUTSET + half_move),
                MOVE_HANDLE_SIZE,
                HandleKind::Move,
            ),
            Handle::new(
                Point::new(rect.x0 - HANDLE_OUTSET + half_corner, rect.y0 - HANDLE_OUTSET + half_corner),
                CORNER_HANDLE_SIZE,
                HandleKind::TopLeft,
            ),
            Handle::new(
                Point::new(rect.x0 - HANDLE_OUTSET + half_corner, rect.y1 + HANDLE_OUTSET - half_corner),
                CORNER_HANDLE_SIZE,
                HandleKind::BottomLeft,
            ),
            Handle::new(
                Point::new(rect.x1 + HANDLE_OUTSET - half_corner, rect.y1 + HANDLE_OUTSET - half_corner),
                CORNER_HANDLE_SIZE,
                HandleKind::BottomRight,
            ),
        ];
        Self {
            rect,
            label: label.to_string(),
            label_position: Point::new(rect.x0, rect.y0 - LABEL_OFFSET),
            handles,
        }
    }

    /// The move handle.
    pub fn move_handle(&self) -> Option<&Handle> {
        self.handles.iter().find(|h| h.kind == HandleKind::Move)
    }

    /// Interactive handle under the point, if any. Decorative handles and
    /// the rectangle itself let the pointer through.
    pub fn hit_test(&self, point: Point) -> Option<HandleKind> {
        self.handles
            .iter()
            .find(|h| h.kind.is_interactive() && h.hit_test(point))
            .map(|h| h.kind)
    }
}

/// The current selection: an element id plus its cached canvas rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: ElementId,
    pub rect: Rect,
}

/// Tracks which element, if any, is selected.
///
/// Holds only an id; every read is validated against the store so a
/// replaced document cannot leave a dangling selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selection: Option<Selection>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a click. Returns true if the selection changed.
    pub fn click(&mut self, target: PointerTarget, store: &ElementStore) -> bool {
        match target {
            PointerTarget::Overlay => false,
            PointerTarget::Canvas => self.clear(),
            PointerTarget::Element(id) => match store.rect_of(id) {
                Some(rect) => {
                    let changed = self.selected_id() != Some(id);
                    self.selection = Some(Selection { id, rect });
                    changed
                }
                None => self.clear(),
            },
        }
    }

    /// Select an element directly (e.g. after creating it).
    pub fn select(&mut self, id: ElementId, store: &ElementStore) -> bool {
        self.click(PointerTarget::Element(id), store)
    }

    /// Force the unselected state. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        self.selection.take().is_some()
    }

    /// Re-derive the cached rectangle from the store. Drops the selection if
    /// the element no longer exists.
    pub fn recompute_rect(&mut self, store: &ElementStore) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        match store.rect_of(selection.id) {
            Some(rect) => selection.rect = rect,
            None => self.selection = None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selection.map(|s| s.id)
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected_id() == Some(id)
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Overlay for the current selection.
    pub fn overlay(&self, store: &ElementStore) -> Option<SelectionOverlay> {
        let selection = self.selection?;
        let element = store.get(selection.id)?;
        Some(SelectionOverlay::new(selection.rect, &element.tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ElementStore {
        let mut store = ElementStore::new(720, 720);
        store.initialize(
            r#"<div class="poster"><img style="left: 340px; top: 340px; width: 380px; height: 380px;"><p style="left: 40px; top: 80px;">Hi</p></div>"#,
        );
        store
    }

    fn find(store: &ElementStore, tag: &str) -> ElementId {
        store.document().elements_ordered().find(|e| e.tag == tag).unwrap().id()
    }

    #[test]
    fn test_click_transitions() {
        let store = store();
        let img = find(&store, "img");
        let mut selection = SelectionManager::new();

        assert!(selection.click(PointerTarget::Element(img), &store));
        assert_eq!(selection.selection().map(|s| s.rect), Some(Rect::new(340.0, 340.0, 720.0, 720.0)));

        assert!(!selection.click(PointerTarget::Overlay, &store));
        assert!(selection.is_selected(img));

        assert!(selection.click(PointerTarget::Canvas, &store));
        assert!(!selection.has_selection());
    }

    #[test]
    fn test_click_missing_element_clears() {
        let store = store();
        let mut selection = SelectionManager::new();
        selection.select(find(&store, "p"), &store);
        assert!(selection.click(PointerTarget::Element(uuid::Uuid::new_v4()), &store));
        assert!(!selection.has_selection());
    }

    #[test]
    fn test_recompute_rect_follows_store() {
        let mut store = store();
        let img = find(&store, "img");
        let mut selection = SelectionManager::new();
        selection.select(img, &store);

        store.update_position(img, 10.0, 20.0);
        selection.recompute_rect(&store);
        assert_eq!(selection.selection().map(|s| (s.rect.x0, s.rect.y0)), Some((10.0, 20.0)));

        store.delete(img);
        selection.recompute_rect(&store);
        assert!(!selection.has_selection());
    }

    #[test]
    fn test_overlay_geometry() {
        let overlay = SelectionOverlay::new(Rect::new(100.0, 100.0, 200.0, 150.0), "img");
        let handle = overlay.move_handle().unwrap();
        assert_eq!(handle.position, Point::new(196.0, 104.0));
        assert_eq!(overlay.label_position, Point::new(100.0, 76.0));
        assert_eq!(overlay.handles.len(), 4);

        assert_eq!(overlay.hit_test(Point::new(200.0, 100.0)), Some(HandleKind::Move));
        // Corner markers are decorative.
        assert_eq!(overlay.hit_test(Point::new(98.0, 98.0)), None);
        assert_eq!(overlay.hit_test(Point::new(150.0, 125.0)), None);
    }

    #[test]
    fn test_overlay_label() {
        let store = store();
        let mut selection = SelectionManager::new();
        assert!(selection.overlay(&store).is_none());
        selection.select(find(&store, "p"), &store);
        assert_eq!(selection.overlay(&store).map(|o| o.label), Some("p".to_string()));
    }
}
