//! Canvas document: the element tree rooted at a fixed-size canvas.

use crate::elements::{Element, ElementId, Node};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The canvas root and every element on it.
///
/// Elements are stored flat, keyed by id; the tree shape lives in each
/// element's `children` list and in the root's `children`. Document order of
/// a pre-order walk is paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Canvas width in logical pixels.
    pub width: i32,
    /// Canvas height in logical pixels.
    pub height: i32,
    elements: HashMap<ElementId, Element>,
    children: Vec<Node>,
}

impl CanvasDocument {
    /// Create an empty document.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            elements: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Number of elements (text nodes excluded).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Children of the canvas root.
    pub fn root_children(&self) -> &[Node] {
        &self.children
    }

    /// Children of `parent`, or of the canvas root when `parent` is `None`.
    pub fn children_of(&self, parent: Option<ElementId>) -> &[Node] {
        match parent {
            None => &self.children,
            Some(id) => self.elements.get(&id).map(|e| e.children()).unwrap_or(&[]),
        }
    }

    /// Append a child node to `parent` (or the root).
    /// Returns false if the parent does not exist.
    pub fn append_node(&mut self, parent: Option<ElementId>, node: Node) -> bool {
        match parent {
            None => {
                self.children.push(node);
                true
            }
            Some(id) => match self.elements.get_mut(&id) {
                Some(element) => {
                    element.children.push(node);
                    true
                }
                None => false,
            },
        }
    }

    /// Append an element as the last child of `parent` (or the root).
    /// Returns `None` if the parent does not exist.
    pub fn append_element(&mut self, parent: Option<ElementId>, mut element: Element) -> Option<ElementId> {
        let id = element.id();
        element.parent = parent;
        if !self.append_node(parent, Node::Element(id)) {
            return None;
        }
        self.elements.insert(id, element);
        Some(id)
    }

    /// Remove an element and its whole subtree.
    /// Returns the removed element, or `None` if it was not present.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let parent = self.elements.get(&id)?.parent;
        let siblings = match parent {
            None => &mut self.children,
            Some(parent_id) => match self.elements.get_mut(&parent_id) {
                Some(p) => &mut p.children,
                None => &mut self.children,
            },
        };
        siblings.retain(|node| *node != Node::Element(id));

        let mut pending = vec![id];
        let mut removed = None;
        while let Some(next) = pending.pop() {
            if let Some(element) = self.elements.remove(&next) {
                pending.extend(element.children.iter().filter_map(|node| match node {
                    Node::Element(child) => Some(*child),
                    Node::Text(_) => None,
                }));
                if next == id {
                    removed = Some(element);
                }
            }
        }
        removed
    }

    /// Replace all text and element children of `id` with a single text node.
    /// Returns false if the element does not exist.
    pub fn replace_children_with_text(&mut self, id: ElementId, text: &str) -> bool {
        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        let old_children = std::mem::take(&mut element.children);
        if !text.is_empty() {
            element.children.push(Node::Text(text.to_string()));
        }
        for node in old_children {
            if let Node::Element(child) = node {
                self.remove_subtree_detached(child);
            }
        }
        true
    }

    fn remove_subtree_detached(&mut self, id: ElementId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(element) = self.elements.remove(&next) {
                pending.extend(element.children.iter().filter_map(|node| match node {
                    Node::Element(child) => Some(*child),
                    Node::Text(_) => None,
                }));
            }
        }
    }

    /// Element ids in document (paint) order: a pre-order walk from the root.
    pub fn ids_in_order(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.elements.len());
        let mut stack: Vec<ElementId> = element_children(&self.children).rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(element) = self.elements.get(&id) {
                stack.extend(element_children(&element.children).rev());
            }
        }
        out
    }

    /// Elements in document (paint) order.
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.ids_in_order().into_iter().filter_map(|id| self.elements.get(&id))
    }

    /// Concatenated text of an element's subtree.
    pub fn text_content(&self, id: ElementId) -> Option<String> {
        let element = self.elements.get(&id)?;
        let mut out = String::new();
        self.collect_text(&element.children, &mut out);
        Some(out)
    }

    fn collect_text(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(child) => {
                    if let Some(element) = self.elements.get(child) {
                        self.collect_text(&element.children, out);
                    }
                }
            }
        }
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.children.clear();
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn element_children(nodes: &[Node]) -> impl DoubleEndedIterator<Item = ElementId> + '_ {
    nodes.iter().filter_map(|node| match node {
        Node::Element(id) => Some(*id),
        Node::Text(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str) -> Element {
        Element::new(tag, Vec::new())
    }

    #[test]
    fn test_append_and_order() {
        let mut doc = CanvasDocument::new(720, 720);
        let root = doc.append_element(None, element("div")).unwrap();
        let a = doc.append_element(Some(root), element("p")).unwrap();
        let b = doc.append_element(Some(root), element("img")).unwrap();
        let inner = doc.append_element(Some(a), element("strong")).unwrap();

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.ids_in_order(), vec![root, a, inner, b]);
        assert_eq!(doc.get(a).unwrap().parent(), Some(root));
        assert!(doc.append_element(Some(uuid::Uuid::new_v4()), element("p")).is_none());
    }

    #[test]
    fn test_remove_subtree() {
        let mut doc = CanvasDocument::new(720, 720);
        let root = doc.append_element(None, element("div")).unwrap();
        let a = doc.append_element(Some(root), element("p")).unwrap();
        let inner = doc.append_element(Some(a), element("em")).unwrap();

        let removed = doc.remove(a).unwrap();
        assert_eq!(removed.tag, "p");
        assert!(!doc.contains(a));
        assert!(!doc.contains(inner));
        assert!(doc.get(root).unwrap().children().is_empty());
        assert!(doc.remove(a).is_none());
    }

    #[test]
    fn test_text_content() {
        let mut doc = CanvasDocument::new(720, 720);
        let p = doc.append_element(None, element("p")).unwrap();
        doc.append_node(Some(p), Node::Text("Up to ".to_string()));
        let strong = doc.append_element(Some(p), element("strong")).unwrap();
        doc.append_node(Some(strong), Node::Text("50% off".to_string()));
        assert_eq!(doc.text_content(p).as_deref(), Some("Up to 50% off"));

        assert!(doc.replace_children_with_text(p, "Plain"));
        assert_eq!(doc.text_content(p).as_deref(), Some("Plain"));
        assert!(!doc.contains(strong));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut doc = CanvasDocument::new(720, 720);
        let p = doc.append_element(None, element("p")).unwrap();
        doc.append_node(Some(p), Node::Text("hello".to_string()));
        let json = doc.to_json().unwrap();
        let restored = CanvasDocument::from_json(&json).unwrap();
        assert_eq!(restored, doc);
        assert!(CanvasDocument::from_json("{").is_err());
    }
}
