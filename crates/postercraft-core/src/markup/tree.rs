//! Building a document tree from tokens, and writing it back out.

use super::tokenizer::{Token, tokenize};
use super::{RAW_TEXT_ELEMENTS, VOID_ELEMENTS, escape_attr, escape_text};
use crate::canvas::CanvasDocument;
use crate::elements::{Element, ElementId, Node};

/// Parse markup into a canvas document of the given size.
///
/// Unmatched end tags are ignored and elements still open at the end of
/// input are closed there. Whitespace-only text is dropped.
pub fn build_document(markup: &str, width: i32, height: i32) -> CanvasDocument {
    let mut doc = CanvasDocument::new(width, height);
    let mut open: Vec<(ElementId, String)> = Vec::new();

    for token in tokenize(markup) {
        let parent = open.last().map(|(id, _)| *id);
        match token {
            Token::StartTag { name, attributes, self_closing } => {
                let is_void = VOID_ELEMENTS.contains(&name.as_str());
                let element = Element::new(&name, attributes);
                let Some(id) = doc.append_element(parent, element) else {
                    continue;
                };
                if !is_void && !self_closing {
                    open.push((id, name));
                }
            }
            Token::EndTag { name } => {
                if let Some(pos) = open.iter().rposition(|(_, open_name)| *open_name == name) {
                    open.truncate(pos);
                }
            }
            Token::Text(text) => {
                if !text.trim().is_empty() {
                    doc.append_node(parent, Node::Text(text));
                }
            }
            Token::Comment(_) | Token::Doctype(_) => {}
        }
    }

    doc
}

/// Options for [`write_document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Leave out elements with a class containing "overlay".
    pub skip_overlays: bool,
    /// Drop `contenteditable` attributes.
    pub strip_editable: bool,
}

/// Serialize the canvas root's children back to markup.
pub fn write_document(doc: &CanvasDocument, options: WriteOptions) -> String {
    let mut out = String::new();
    write_nodes(doc, doc.root_children(), None, options, &mut out);
    out
}

fn write_nodes(
    doc: &CanvasDocument,
    nodes: &[Node],
    parent_tag: Option<&str>,
    options: WriteOptions,
    out: &mut String,
) {
    let raw = parent_tag.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
    for node in nodes {
        match node {
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(id) => {
                if let Some(element) = doc.get(*id) {
                    write_element(doc, element, options, out);
                }
            }
        }
    }
}

fn write_element(doc: &CanvasDocument, element: &Element, options: WriteOptions, out: &mut String) {
    if options.skip_overlays && element.has_class_containing("overlay") {
        return;
    }

    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in element.attributes() {
        if options.strip_editable && name == "contenteditable" {
            continue;
        }
        push_attribute(out, name, value);
    }
    if !element.style.is_empty() {
        push_attribute(out, "style", &element.style.to_css());
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    write_nodes(doc, element.children(), Some(&element.tag), options, out);
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;

    #[test]
    fn test_build_nested() {
        let doc = build_document(
            r#"<div class="poster"><h1 style="left: 40px">Title</h1><img src="a.png"><p>Up to <strong>50%</strong> off</p></div>"#,
            720,
            720,
        );
        assert_eq!(doc.len(), 5);
        let order: Vec<&str> = doc.elements_ordered().map(|e| e.tag.as_str()).collect();
        assert_eq!(order, vec!["div", "h1", "img", "p", "strong"]);

        let img = doc.elements_ordered().find(|e| e.tag == "img").unwrap();
        assert_eq!(img.kind, ElementKind::Image);
        assert!(img.children().is_empty());

        let p = doc.elements_ordered().find(|e| e.tag == "p").unwrap();
        assert_eq!(doc.text_content(p.id()).as_deref(), Some("Up to 50% off"));
    }

    #[test]
    fn test_unmatched_and_unclosed_tags() {
        let doc = build_document("<div><p>one</span></div></div><p>two", 720, 720);
        assert_eq!(doc.root_children().len(), 2);
        let last = doc.elements_ordered().last().unwrap();
        assert_eq!(last.tag, "p");
        assert_eq!(last.parent(), None);
        assert_eq!(doc.text_content(last.id()).as_deref(), Some("two"));
    }

    #[test]
    fn test_whitespace_only_text_dropped() {
        let doc = build_document("<div>\n  <p>a</p>\n</div>", 720, 720);
        let div = doc.elements_ordered().next().unwrap();
        assert_eq!(div.children().len(), 1);
    }

    #[test]
    fn test_write_roundtrip() {
        let source = r#"<div class="poster" style="position: relative; width: 720px;"><h1 class="title">Summer &amp; Sun</h1><img src="hero.png" alt="Model"><br></div>"#;
        let doc = build_document(source, 720, 720);
        let written = write_document(&doc, WriteOptions::default());
        assert_eq!(
            written,
            r#"<div class="poster" style="position: relative; width: 720px;"><h1 class="title">Summer &amp; Sun</h1><img src="hero.png" alt="Model"><br></div>"#
        );
        let again = write_document(&build_document(&written, 720, 720), WriteOptions::default());
        assert_eq!(again, written);
    }

    #[test]
    fn test_write_options() {
        let source = r#"<div><p contenteditable="true">x</p><div class="selection-overlay"><span>tag</span></div></div>"#;
        let doc = build_document(source, 720, 720);
        let plain = write_document(&doc, WriteOptions::default());
        assert!(plain.contains("contenteditable"));
        assert!(plain.contains("selection-overlay"));

        let cleaned = write_document(&doc, WriteOptions { skip_overlays: true, strip_editable: true });
        assert_eq!(cleaned, "<div><p>x</p></div>");
    }

    #[test]
    fn test_bare_attribute_written_with_empty_value() {
        let doc = build_document("<div hidden>x</div>", 720, 720);
        assert_eq!(write_document(&doc, WriteOptions::default()), r#"<div hidden="">x</div>"#);
    }
}
