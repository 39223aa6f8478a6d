//! The element store: sole owner of the live document.

use crate::canvas::CanvasDocument;
use crate::elements::{
    Element, ElementId, Node, PLACEHOLDER_TEXT, StyleProperty, new_image_element, new_text_element,
};
use crate::error::{EditorError, Result};
use crate::layout;
use crate::markup::{WriteOptions, build_document, write_document};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of element the editor can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewElementKind {
    Text,
    Image,
}

impl NewElementKind {
    fn dom_id_prefix(&self) -> &'static str {
        match self {
            NewElementKind::Text => "text",
            NewElementKind::Image => "img",
        }
    }
}

/// Owns the element tree and every mutation of it.
///
/// Positions written through [`ElementStore::update_position`] are clamped
/// so the element's rectangle stays inside the canvas.
#[derive(Debug, Clone)]
pub struct ElementStore {
    doc: CanvasDocument,
    /// Counter for generated DOM ids, shared by all element kinds.
    next_dom_id: u64,
}

impl ElementStore {
    /// Create an empty store for a canvas of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            doc: CanvasDocument::new(width, height),
            next_dom_id: 0,
        }
    }

    /// Replace the document with parsed markup.
    pub fn initialize(&mut self, markup: &str) {
        self.doc = build_document(markup, self.doc.width, self.doc.height);
        log::debug!("Store initialized with {} elements", self.doc.len());
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.doc
    }

    pub fn canvas_size(&self) -> (i32, i32) {
        (self.doc.width, self.doc.height)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.doc.contains(id)
    }

    pub fn len(&self) -> usize {
        self.doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Create an element with its kind's defaults and append it to
    /// `container` (the canvas root when `None`).
    pub fn create(&mut self, kind: NewElementKind, container: Option<ElementId>) -> Result<ElementId> {
        if let Some(container_id) = container {
            if !self.doc.contains(container_id) {
                return Err(EditorError::UnknownContainer(container_id));
            }
        }

        let dom_id = self.next_free_dom_id(kind.dom_id_prefix());
        let element = match kind {
            NewElementKind::Text => new_text_element(Uuid::new_v4(), dom_id),
            NewElementKind::Image => new_image_element(Uuid::new_v4(), dom_id),
        };
        let id = element.id();
        match container {
            Some(container_id) => {
                self.doc
                    .append_element(Some(container_id), element)
                    .ok_or(EditorError::UnknownContainer(container_id))?;
            }
            None => {
                self.doc.append_element(None, element);
            }
        }
        if kind == NewElementKind::Text {
            self.doc.append_node(Some(id), Node::Text(PLACEHOLDER_TEXT.to_string()));
        }

        log::debug!("Created {:?} element {}", kind, id);
        Ok(id)
    }

    fn next_free_dom_id(&mut self, prefix: &str) -> String {
        loop {
            let candidate = format!("{}-{}", prefix, self.next_dom_id);
            self.next_dom_id += 1;
            let taken = self
                .doc
                .elements_ordered()
                .any(|e| e.attribute("id") == Some(candidate.as_str()));
            if !taken {
                return candidate;
            }
        }
    }

    /// Remove an element and its subtree. Absent elements are ignored.
    pub fn delete(&mut self, id: ElementId) -> bool {
        match self.doc.remove(id) {
            Some(element) => {
                log::debug!("Deleted <{}> element {}", element.tag, id);
                true
            }
            None => false,
        }
    }

    /// Move an element so its canvas-relative top-left is (x, y), clamped to
    /// `[0, canvas - size]` on each axis.
    ///
    /// Returns the position actually written, or `None` if the element is
    /// not present.
    pub fn update_position(&mut self, id: ElementId, x: f64, y: f64) -> Option<(i32, i32)> {
        let (width, height) = layout::size(&self.doc, id)?;
        let (parent_x, parent_y) = layout::parent_origin(&self.doc, id)?;
        let x = clamp_axis(x, self.doc.width.saturating_sub(width));
        let y = clamp_axis(y, self.doc.height.saturating_sub(height));

        let element = self.doc.get_mut(id)?;
        element.style.set("position", "absolute");
        element.style.set_px("left", x.saturating_sub(parent_x));
        element.style.set_px("top", y.saturating_sub(parent_y));
        Some((x, y))
    }

    /// Apply a style property. Pixel properties given as bare numbers get a
    /// `px` unit.
    pub fn update_style(&mut self, id: ElementId, property: &StyleProperty, value: &str) -> bool {
        let Some(element) = self.doc.get_mut(id) else {
            return false;
        };
        let value = property.normalize_value(value);
        element.style.set(property.css_name(), &value);
        true
    }

    /// Set an attribute (other than `style`, which goes through
    /// [`ElementStore::update_style`]).
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> bool {
        match self.doc.get_mut(id) {
            Some(element) => {
                element.set_attribute(name, value);
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> bool {
        self.doc
            .get_mut(id)
            .is_some_and(|element| element.remove_attribute(name))
    }

    /// Replace an element's content with plain text.
    pub fn set_text_content(&mut self, id: ElementId, text: &str) -> bool {
        self.doc.replace_children_with_text(id, text)
    }

    pub fn text_content(&self, id: ElementId) -> Option<String> {
        self.doc.text_content(id)
    }

    /// Canvas-relative bounding rectangle.
    pub fn rect_of(&self, id: ElementId) -> Option<Rect> {
        layout::rect(&self.doc, id)
    }

    /// Topmost, deepest element under a canvas-relative point.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        layout::hit_test(&self.doc, point)
    }

    /// Where new elements go: the poster container if there is one, else
    /// the first top-level `div`, else the canvas root (`None`).
    pub fn default_container(&self) -> Option<ElementId> {
        let ordered: Vec<&Element> = self.doc.elements_ordered().collect();
        let exact = ordered
            .iter()
            .find(|e| e.attribute("class").is_some_and(|c| c.split_whitespace().any(|c| c == "poster")));
        let partial = || ordered.iter().find(|e| e.has_class_containing("poster"));
        let top_level_div = || {
            ordered
                .iter()
                .find(|e| e.tag == "div" && e.parent().is_none())
        };
        exact.or_else(partial).or_else(top_level_div).map(|e| e.id())
    }

    /// Serialize the document for history.
    pub fn snapshot(&self) -> Result<String> {
        self.doc.to_json()
    }

    /// Replace the document with a snapshot. On error the document is
    /// left unchanged.
    pub fn restore(&mut self, snapshot: &str) -> Result<()> {
        self.doc = CanvasDocument::from_json(snapshot)?;
        Ok(())
    }

    /// The document as markup, exactly as stored.
    pub fn to_markup(&self) -> String {
        write_document(&self.doc, WriteOptions::default())
    }
}

fn clamp_axis(value: f64, max: i32) -> i32 {
    let value = if value.is_finite() { value.round() as i32 } else { 0 };
    value.min(max).max(0)
}
