//! Dragging the selected element.

use crate::elements::ElementId;
use crate::selection::SelectionManager;
use crate::store::ElementStore;
use kurbo::{Point, Vec2};

/// State of an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// The element being moved.
    pub element: ElementId,
    /// Pointer position minus the element's top-left at drag start.
    pub offset: Vec2,
    /// Canvas-relative top-left when the drag started.
    pub start: Point,
}

/// Result of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    pub element: ElementId,
    pub from: Point,
    pub to: Point,
}

impl DragOutcome {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Converts pointer motion into clamped moves of the selected element.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging the selected element. Does nothing without a
    /// selection.
    pub fn start_drag(&mut self, pointer: Point, selection: &SelectionManager) -> bool {
        let Some(selected) = selection.selection() else {
            return false;
        };
        let start = selected.rect.origin();
        self.state = Some(DragState {
            element: selected.id,
            offset: pointer - start,
            start,
        });
        log::debug!("Drag started on {}", selected.id);
        true
    }

    /// Move the dragged element so it follows the pointer. Returns the
    /// clamped canvas position written, or `None` when not dragging.
    pub fn drag_to(
        &mut self,
        pointer: Point,
        store: &mut ElementStore,
        selection: &mut SelectionManager,
    ) -> Option<(i32, i32)> {
        let state = self.state?;
        let target = pointer - state.offset;
        let Some(position) = store.update_position(state.element, target.x, target.y) else {
            // The element vanished under us; nothing left to drag.
            self.state = None;
            return None;
        };
        selection.recompute_rect(store);
        log::trace!("Drag to ({}, {})", position.0, position.1);
        Some(position)
    }

    /// Finish the drag. The last written position stands.
    pub fn end_drag(&mut self, store: &ElementStore) -> Option<DragOutcome> {
        let state = self.state.take()?;
        let to = store.rect_of(state.element)?.origin();
        log::debug!("Drag ended on {}", state.element);
        Some(DragOutcome {
            element: state.element,
            from: state.start,
            to,
        })
    }

    /// Drop any drag in progress without reporting it.
    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }
}
