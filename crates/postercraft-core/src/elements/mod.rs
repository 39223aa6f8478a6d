//! Element definitions for the poster canvas.

mod image;
mod style;
mod text;

pub use image::{
    DEFAULT_IMAGE_POSITION, DEFAULT_IMAGE_SIZE, ImageFormat, PLACEHOLDER_IMAGE_ALT,
    PLACEHOLDER_IMAGE_SRC, data_url_from_bytes, to_data_url,
};
pub use style::{InlineStyle, StyleProperty, parse_px};
pub use text::{
    DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_POSITION, FontWeight, PLACEHOLDER_TEXT,
};

pub(crate) use image::new_image_element;
pub(crate) use text::{estimate_text_size, new_text_element};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Tags whose content is edited as text.
const TEXT_TAGS: &[&str] = &[
    "p", "span", "h1", "h2", "h3", "h4", "h5", "h6", "a", "li", "strong", "em", "td", "th",
];

/// What an element is, for editing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Text,
    Image,
    Generic,
}

impl ElementKind {
    /// Classify a (lowercase) tag name.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "img" {
            ElementKind::Image
        } else if TEXT_TAGS.contains(&tag) {
            ElementKind::Text
        } else {
            ElementKind::Generic
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Generic => "generic",
        }
    }
}

/// A child of an element or of the canvas root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Element(ElementId),
    Text(String),
}

/// A single element of the document tree.
///
/// The `style` attribute is held parsed in [`InlineStyle`]; every other
/// attribute is kept verbatim and in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    /// Lowercase tag name.
    pub tag: String,
    pub kind: ElementKind,
    /// Containing element, `None` for children of the canvas root.
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<Node>,
    attributes: Vec<(String, String)>,
    pub style: InlineStyle,
}

impl Element {
    /// Create a detached element from a tag and its attributes.
    /// A `style` attribute is parsed into the inline style.
    pub fn new(tag: &str, attributes: Vec<(String, String)>) -> Self {
        Self::with_id(Uuid::new_v4(), tag, attributes)
    }

    pub(crate) fn with_id(id: ElementId, tag: &str, attributes: Vec<(String, String)>) -> Self {
        let tag = tag.to_ascii_lowercase();
        let mut style = InlineStyle::new();
        let mut kept = Vec::with_capacity(attributes.len());
        for (name, value) in attributes {
            if name == "style" {
                style = InlineStyle::parse(&value);
            } else {
                kept.push((name, value));
            }
        }
        Self {
            id,
            kind: ElementKind::from_tag(&tag),
            tag,
            parent: None,
            children: Vec::new(),
            attributes: kept,
            style,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Get an attribute value. `style` is not an attribute here; use
    /// [`Element::style`].
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position if already present.
    /// Setting `style` replaces the inline style.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name == "style" {
            self.style = InlineStyle::parse(value);
            return;
        }
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
    }

    /// Remove an attribute. Returns true if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(n, _)| n != name);
        self.attributes.len() != before
    }

    /// Attributes other than `style`, in source order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether any class of this element contains `needle`.
    pub fn has_class_containing(&self, needle: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c.contains(needle)))
    }

    /// Offset from the parent's origin (`left`/`top`, missing = 0).
    pub fn offset(&self) -> (i32, i32) {
        (
            self.style.px("left").unwrap_or(0),
            self.style.px("top").unwrap_or(0),
        )
    }

    /// Declared width: inline style first, then the `width` attribute.
    pub fn declared_width(&self) -> Option<i32> {
        self.style
            .px("width")
            .or_else(|| self.attribute("width").and_then(parse_px))
    }

    /// Declared height: inline style first, then the `height` attribute.
    pub fn declared_height(&self) -> Option<i32> {
        self.style
            .px("height")
            .or_else(|| self.attribute("height").and_then(parse_px))
    }

    /// Font size in pixels, falling back to the default.
    pub fn font_size(&self) -> i32 {
        self.style.px("font-size").unwrap_or(DEFAULT_FONT_SIZE)
    }
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS colour: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`,
    /// or a basic named colour.
    pub fn parse(color: &str) -> Option<Self> {
        let color = color.trim().to_ascii_lowercase();

        if let Some(hex) = color.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).ok();
            return match hex.len() {
                3 => Some(Self::new(
                    channel(&hex[0..1])? * 17,
                    channel(&hex[1..2])? * 17,
                    channel(&hex[2..3])? * 17,
                    255,
                )),
                6 => Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    255,
                )),
                8 => Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => None,
            };
        }

        if let Some(args) = color
            .strip_prefix("rgba(")
            .or_else(|| color.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if parts.len() != 3 && parts.len() != 4 {
                return None;
            }
            let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
            let alpha = match parts.get(3) {
                Some(a) => (a.parse::<f64>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
                None => 255,
            };
            return Some(Self::new(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
                alpha,
            ));
        }

        match color.as_str() {
            "transparent" => Some(Self::transparent()),
            "black" => Some(Self::black()),
            "white" => Some(Self::white()),
            "red" => Some(Self::new(255, 0, 0, 255)),
            "green" => Some(Self::new(0, 128, 0, 255)),
            "blue" => Some(Self::new(0, 0, 255, 255)),
            "yellow" => Some(Self::new(255, 255, 0, 255)),
            "orange" => Some(Self::new(255, 165, 0, 255)),
            "purple" => Some(Self::new(128, 0, 128, 255)),
            "gray" | "grey" => Some(Self::new(128, 128, 128, 255)),
            _ => None,
        }
    }

    /// `#rrggbb` form, as used by colour inputs. Alpha is dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
