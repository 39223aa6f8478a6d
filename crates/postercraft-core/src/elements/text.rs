//! Text elements.

use super::{Element, ElementId, InlineStyle};
use serde::{Deserialize, Serialize};

/// Body of a newly created text element.
pub const PLACEHOLDER_TEXT: &str = "Double-click to edit";
/// Font size of a newly created text element, and the fallback when a text
/// element declares none.
pub const DEFAULT_FONT_SIZE: i32 = 16;
/// Colour of a newly created text element.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
/// Top-left corner of a newly created text element.
pub const DEFAULT_TEXT_POSITION: (i32, i32) = (50, 50);

/// Average glyph advance as a fraction of the font size, used to estimate
/// the width of text without a layout engine.
const CHAR_WIDTH_EM: f64 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_EM: f64 = 1.2;

/// CSS font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Lighter,
    Bolder,
    /// Numeric weight (100..=900).
    Numeric(u16),
}

impl FontWeight {
    /// Parse a CSS `font-weight` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(FontWeight::Normal),
            "bold" => Some(FontWeight::Bold),
            "lighter" => Some(FontWeight::Lighter),
            "bolder" => Some(FontWeight::Bolder),
            other => other
                .parse::<u16>()
                .ok()
                .filter(|w| (1..=1000).contains(w))
                .map(FontWeight::Numeric),
        }
    }

    /// The CSS value for this weight.
    pub fn css_value(&self) -> String {
        match self {
            FontWeight::Normal => "normal".to_string(),
            FontWeight::Bold => "bold".to_string(),
            FontWeight::Lighter => "lighter".to_string(),
            FontWeight::Bolder => "bolder".to_string(),
            FontWeight::Numeric(w) => w.to_string(),
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> String {
        match self {
            FontWeight::Normal => "Normal (400)".to_string(),
            FontWeight::Bold => "Bold (700)".to_string(),
            FontWeight::Lighter => "Lighter (300)".to_string(),
            FontWeight::Bolder => "Bolder (900)".to_string(),
            FontWeight::Numeric(w) => match w {
                100 => "Thin (100)".to_string(),
                200 => "Extra Light (200)".to_string(),
                300 => "Light (300)".to_string(),
                400 => "Regular (400)".to_string(),
                500 => "Medium (500)".to_string(),
                600 => "Semi Bold (600)".to_string(),
                700 => "Bold (700)".to_string(),
                800 => "Extra Bold (800)".to_string(),
                900 => "Black (900)".to_string(),
                other => other.to_string(),
            },
        }
    }

    /// Weights offered by the property panel.
    pub fn all() -> Vec<FontWeight> {
        let mut weights = vec![
            FontWeight::Normal,
            FontWeight::Bold,
            FontWeight::Lighter,
            FontWeight::Bolder,
        ];
        weights.extend((1..=9).map(|n| FontWeight::Numeric(n * 100)));
        weights
    }
}

/// Build a new text element with the editor's defaults.
pub(crate) fn new_text_element(id: ElementId, dom_id: String) -> Element {
    let (left, top) = DEFAULT_TEXT_POSITION;
    let mut style = InlineStyle::new();
    style.set("position", "absolute");
    style.set_px("left", left);
    style.set_px("top", top);
    style.set_px("font-size", DEFAULT_FONT_SIZE);
    style.set("color", DEFAULT_TEXT_COLOR);
    style.set("cursor", "move");
    style.set("user-select", "none");

    let mut element = Element::with_id(id, "p", vec![("id".to_string(), dom_id)]);
    element.style = style;
    element
}

/// Estimate the rendered size of a run of text.
pub(crate) fn estimate_text_size(text: &str, font_size: i32) -> (i32, i32) {
    let font_size = f64::from(font_size.max(0));
    let lines: Vec<&str> = text.trim().lines().collect();
    let longest = lines.iter().map(|l| l.trim().chars().count()).max().unwrap_or(0);
    let line_count = lines.len().max(1);
    let width = (longest as f64 * font_size * CHAR_WIDTH_EM).round() as i32;
    let height = (line_count as f64 * font_size * LINE_HEIGHT_EM).round() as i32;
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use uuid::Uuid;

    #[test]
    fn test_font_weight_parse() {
        assert_eq!(FontWeight::parse("bold"), Some(FontWeight::Bold));
        assert_eq!(FontWeight::parse(" 700 "), Some(FontWeight::Numeric(700)));
        assert_eq!(FontWeight::parse("heavy"), None);
        assert_eq!(FontWeight::Numeric(600).css_value(), "600");
        assert_eq!(FontWeight::Numeric(900).display_name(), "Black (900)");
        assert_eq!(FontWeight::all().len(), 13);
    }

    #[test]
    fn test_new_text_defaults() {
        let element = new_text_element(Uuid::new_v4(), "text-0".to_string());
        assert_eq!(element.tag, "p");
        assert_eq!(element.kind, ElementKind::Text);
        assert_eq!(element.attribute("id"), Some("text-0"));
        assert_eq!(element.style.px("left"), Some(50));
        assert_eq!(element.style.px("top"), Some(50));
        assert_eq!(element.style.px("font-size"), Some(16));
        assert_eq!(element.style.get("color"), Some("#000000"));
    }

    #[test]
    fn test_estimate_text_size() {
        assert_eq!(estimate_text_size("abcde", 20), (60, 24));
        assert_eq!(estimate_text_size("ab\nabcd", 10), (24, 24));
        assert_eq!(estimate_text_size("", 16), (0, 19));
    }
}
