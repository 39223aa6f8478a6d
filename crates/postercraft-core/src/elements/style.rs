//! Inline style declarations and the style properties the editor knows about.

use serde::{Deserialize, Serialize};

/// Ordered list of inline CSS declarations (`property: value`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of a `style` attribute.
    /// Malformed declarations are skipped.
    pub fn parse(css: &str) -> Self {
        let mut style = Self::new();
        for declaration in css.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            style.set(&property, value);
        }
        style
    }

    /// Get the value of a property.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property, keeping its position if already present.
    /// An empty value removes the property, as in the CSSOM.
    pub fn set(&mut self, property: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove(property);
            return;
        }
        match self.declarations.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.declarations.push((property.to_string(), value.to_string())),
        }
    }

    /// Remove a property. Returns true if it was present.
    pub fn remove(&mut self, property: &str) -> bool {
        let before = self.declarations.len();
        self.declarations.retain(|(name, _)| name != property);
        self.declarations.len() != before
    }

    /// Read a property as whole pixels (`"40px"`, `"40"`, `"39.6px"`).
    pub fn px(&self, property: &str) -> Option<i32> {
        self.get(property).and_then(parse_px)
    }

    /// Set a property to a whole-pixel value.
    pub fn set_px(&mut self, property: &str, value: i32) {
        self.set(property, &format!("{}px", value));
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize back to `style` attribute text.
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Largest pixel magnitude a length is clamped to.
pub const MAX_PX: i32 = 1_000_000;

/// Parse a CSS length in pixels, rounding to a whole pixel and clamping to
/// `[-MAX_PX, MAX_PX]`.
pub fn parse_px(value: &str) -> Option<i32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    let parsed: f64 = number.parse().ok()?;
    let limit = f64::from(MAX_PX);
    parsed
        .is_finite()
        .then(|| parsed.clamp(-limit, limit).round() as i32)
}

/// A style property addressed by a property edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleProperty {
    FontSize,
    Color,
    FontWeight,
    Width,
    Height,
    /// Any other named CSS property (stored in kebab-case).
    Other(String),
}

impl StyleProperty {
    /// Resolve a property name given in camelCase (`fontSize`) or
    /// kebab-case (`font-size`).
    pub fn from_name(name: &str) -> Self {
        let kebab = to_kebab_case(name.trim());
        match kebab.as_str() {
            "font-size" => StyleProperty::FontSize,
            "color" => StyleProperty::Color,
            "font-weight" => StyleProperty::FontWeight,
            "width" => StyleProperty::Width,
            "height" => StyleProperty::Height,
            _ => StyleProperty::Other(kebab),
        }
    }

    /// The CSS property name.
    pub fn css_name(&self) -> &str {
        match self {
            StyleProperty::FontSize => "font-size",
            StyleProperty::Color => "color",
            StyleProperty::FontWeight => "font-weight",
            StyleProperty::Width => "width",
            StyleProperty::Height => "height",
            StyleProperty::Other(name) => name,
        }
    }

    /// Whether bare numbers for this property are pixel lengths.
    pub fn is_pixel_length(&self) -> bool {
        matches!(self, StyleProperty::FontSize | StyleProperty::Width | StyleProperty::Height)
    }

    /// Normalize a value for this property: bare numbers become `px` lengths
    /// for the pixel properties.
    pub fn normalize_value(&self, value: &str) -> String {
        let value = value.trim();
        if self.is_pixel_length() && value.parse::<f64>().is_ok() {
            format!("{}px", value)
        } else {
            value.to_string()
        }
    }
}

fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = InlineStyle::parse("position:absolute; LEFT: 40px;;top : 80px; bogus");
        assert_eq!(style.get("position"), Some("absolute"));
        assert_eq!(style.px("left"), Some(40));
        assert_eq!(style.px("top"), Some(80));
        assert_eq!(style.to_css(), "position: absolute; left: 40px; top: 80px;");
    }

    #[test]
    fn test_set_keeps_order_and_empty_removes() {
        let mut style = InlineStyle::parse("left: 1px; top: 2px");
        style.set("left", "5px");
        style.set("color", "red");
        assert_eq!(style.to_css(), "left: 5px; top: 2px; color: red;");
        style.set("top", "");
        assert_eq!(style.get("top"), None);
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("12px"), Some(12));
        assert_eq!(parse_px(" 39.6px "), Some(40));
        assert_eq!(parse_px("-3"), Some(-3));
        assert_eq!(parse_px("2147483000px"), Some(MAX_PX));
        assert_eq!(parse_px("-1e12px"), Some(-MAX_PX));
        assert_eq!(parse_px("auto"), None);
        assert_eq!(parse_px("50%"), None);
    }

    #[test]
    fn test_property_names() {
        assert_eq!(StyleProperty::from_name("fontSize"), StyleProperty::FontSize);
        assert_eq!(StyleProperty::from_name("font-weight"), StyleProperty::FontWeight);
        assert_eq!(
            StyleProperty::from_name("backgroundColor"),
            StyleProperty::Other("background-color".to_string())
        );
        assert_eq!(StyleProperty::from_name("backgroundColor").css_name(), "background-color");
    }

    #[test]
    fn test_pixel_normalization() {
        assert_eq!(StyleProperty::Width.normalize_value("250"), "250px");
        assert_eq!(StyleProperty::FontSize.normalize_value("2em"), "2em");
        assert_eq!(StyleProperty::Color.normalize_value("12"), "12");
    }
}
