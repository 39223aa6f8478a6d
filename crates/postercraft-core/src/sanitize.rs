//! Allow-list markup sanitizer.
//!
//! Everything imported goes through a [`Sanitizer`] before it reaches the
//! element store. Disallowed tags are unwrapped (their content survives),
//! except for elements whose content is never meaningful as poster text,
//! which are dropped whole.

use crate::markup::{Token, VOID_ELEMENTS, escape_attr, escape_text, tokenize};
use std::collections::HashSet;

/// Tags kept by the default allow-list.
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "div", "p", "span", "h1", "h2", "h3", "h4", "h5", "h6", "img", "a", "ul", "ol", "li", "strong",
    "em", "br", "table", "thead", "tbody", "tr", "td", "th",
];

/// Attributes kept by the default allow-list, plus any `data-*`.
pub const DEFAULT_ALLOWED_ATTRIBUTES: &[&str] = &[
    "class", "id", "style", "src", "alt", "href", "title", "width", "height",
];

/// Elements removed together with everything inside them.
const DROP_CONTENT_TAGS: &[&str] = &[
    "script", "style", "template", "iframe", "object", "embed", "noscript", "head", "title",
];

/// URL schemes that execute code.
const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:"];

/// Turns untrusted markup into markup safe to load into the editor.
///
/// Implementations must be deterministic and free of side effects.
pub trait Sanitizer {
    fn sanitize(&self, raw: &str) -> String;
}

/// Sanitizer keeping only allow-listed tags and attributes.
#[derive(Debug, Clone)]
pub struct AllowListSanitizer {
    tags: HashSet<String>,
    attributes: HashSet<String>,
    allow_data_attributes: bool,
}

impl Default for AllowListSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_TAGS, DEFAULT_ALLOWED_ATTRIBUTES)
    }
}

impl AllowListSanitizer {
    pub fn new(tags: &[&str], attributes: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_ascii_lowercase()).collect(),
            attributes: attributes.iter().map(|a| a.to_ascii_lowercase()).collect(),
            allow_data_attributes: true,
        }
    }

    /// Whether `data-*` attributes are kept (default: true).
    pub fn with_data_attributes(mut self, allow: bool) -> Self {
        self.allow_data_attributes = allow;
        self
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn allows_attribute(&self, name: &str) -> bool {
        if name.starts_with("on") {
            return false;
        }
        self.attributes.contains(name) || (self.allow_data_attributes && is_data_attribute(name))
    }
}

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        // Name and nesting depth of the element whose content is being dropped.
        let mut dropping: Option<(String, usize)> = None;
        let mut dropped_tags = 0usize;
        let mut dropped_attributes = 0usize;

        for token in tokenize(raw) {
            if let Some((name, depth)) = dropping.as_mut() {
                match &token {
                    Token::StartTag { name: n, self_closing: false, .. } if n == name => *depth += 1,
                    Token::EndTag { name: n } if n == name => {
                        *depth -= 1;
                        if *depth == 0 {
                            dropping = None;
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match token {
                Token::StartTag { name, attributes, self_closing } => {
                    if DROP_CONTENT_TAGS.contains(&name.as_str()) {
                        dropped_tags += 1;
                        if !self_closing {
                            dropping = Some((name, 1));
                        }
                        continue;
                    }
                    if !self.allows_tag(&name) {
                        dropped_tags += 1;
                        continue;
                    }

                    out.push('<');
                    out.push_str(&name);
                    for (attr, value) in attributes {
                        if !self.allows_attribute(&attr) || is_script_url(&attr, &value) {
                            dropped_attributes += 1;
                            continue;
                        }
                        out.push(' ');
                        out.push_str(&attr);
                        out.push_str("=\"");
                        out.push_str(&escape_attr(&value));
                        out.push('"');
                    }
                    out.push('>');
                    if self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                        out.push_str("</");
                        out.push_str(&name);
                        out.push('>');
                    }
                }
                Token::EndTag { name } => {
                    if self.allows_tag(&name) && !VOID_ELEMENTS.contains(&name.as_str()) {
                        out.push_str("</");
                        out.push_str(&name);
                        out.push('>');
                    }
                }
                Token::Text(text) => out.push_str(&escape_text(&text)),
                Token::Comment(_) | Token::Doctype(_) => {}
            }
        }

        if dropped_tags > 0 || dropped_attributes > 0 {
            log::warn!(
                "Sanitizer removed {} tag(s) and {} attribute(s)",
                dropped_tags,
                dropped_attributes
            );
        }
        out
    }
}

fn is_data_attribute(name: &str) -> bool {
    name.len() > 5 && name.starts_with("data-")
}

/// Whether a URL-bearing attribute carries a script scheme. Whitespace and
/// control characters are ignored, as browsers do when resolving the URL.
fn is_script_url(attr: &str, value: &str) -> bool {
    if attr != "href" && attr != "src" {
        return false;
    }
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    SCRIPT_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme))
}
