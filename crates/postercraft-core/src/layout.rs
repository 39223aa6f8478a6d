//! Whole-pixel layout of elements on the canvas.
//!
//! An element's offset is its inline `left`/`top`, relative to its parent's
//! origin (the canvas root sits at (0, 0)). Its size is the declared
//! `width`/`height`, or an estimate when none is declared.

use crate::canvas::CanvasDocument;
use crate::elements::{DEFAULT_IMAGE_SIZE, Element, ElementId, ElementKind, Node, estimate_text_size};
use kurbo::{Point, Rect};

/// Canvas-relative origin of an element.
pub fn origin(doc: &CanvasDocument, id: ElementId) -> Option<(i32, i32)> {
    let element = doc.get(id)?;
    let (mut x, mut y) = element.offset();
    let mut parent = element.parent();
    while let Some(parent_id) = parent {
        let Some(ancestor) = doc.get(parent_id) else {
            break;
        };
        let (dx, dy) = ancestor.offset();
        x = x.saturating_add(dx);
        y = y.saturating_add(dy);
        parent = ancestor.parent();
    }
    Some((x, y))
}

/// Canvas-relative origin of the element's parent (the root is at (0, 0)).
pub fn parent_origin(doc: &CanvasDocument, id: ElementId) -> Option<(i32, i32)> {
    match doc.get(id)?.parent() {
        Some(parent) => origin(doc, parent),
        None => Some((0, 0)),
    }
}

/// Width and height of an element.
pub fn size(doc: &CanvasDocument, id: ElementId) -> Option<(i32, i32)> {
    let element = doc.get(id)?;
    let (width, height) = match (element.declared_width(), element.declared_height()) {
        (Some(w), Some(h)) => (w, h),
        (w, h) => {
            let (est_w, est_h) = intrinsic_size(doc, element);
            (w.unwrap_or(est_w), h.unwrap_or(est_h))
        }
    };
    Some((width.max(0), height.max(0)))
}

fn intrinsic_size(doc: &CanvasDocument, element: &Element) -> (i32, i32) {
    match element.kind {
        ElementKind::Image => DEFAULT_IMAGE_SIZE,
        ElementKind::Text => {
            let text = doc.text_content(element.id()).unwrap_or_default();
            estimate_text_size(&text, element.font_size())
        }
        ElementKind::Generic => children_extent(doc, element),
    }
}

/// Bottom-right extent of an element's children, relative to its origin.
fn children_extent(doc: &CanvasDocument, element: &Element) -> (i32, i32) {
    let mut extent = (0, 0);
    for node in element.children() {
        let (right, bottom) = match node {
            Node::Text(text) => estimate_text_size(text, element.font_size()),
            Node::Element(child_id) => {
                let Some(child) = doc.get(*child_id) else {
                    continue;
                };
                let (x, y) = child.offset();
                let (w, h) = size(doc, *child_id).unwrap_or((0, 0));
                (x.saturating_add(w), y.saturating_add(h))
            }
        };
        extent.0 = extent.0.max(right);
        extent.1 = extent.1.max(bottom);
    }
    extent
}

/// Canvas-relative bounding rectangle of an element.
pub fn rect(doc: &CanvasDocument, id: ElementId) -> Option<Rect> {
    let (x, y) = origin(doc, id)?;
    let (w, h) = size(doc, id)?;
    Some(Rect::new(
        f64::from(x),
        f64::from(y),
        f64::from(x.saturating_add(w)),
        f64::from(y.saturating_add(h)),
    ))
}

/// Topmost, deepest element whose rectangle contains `point`.
pub fn hit_test(doc: &CanvasDocument, point: Point) -> Option<ElementId> {
    doc.ids_in_order()
        .into_iter()
        .rev()
        .find(|id| rect(doc, *id).is_some_and(|r| r.contains(point)))
}
