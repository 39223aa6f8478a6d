//! Property-panel view of the selected element.

use crate::elements::{
    DEFAULT_TEXT_COLOR, ElementId, ElementKind, FontWeight, SerializableColor, parse_px,
};
use crate::selection::Selection;
use crate::store::ElementStore;
use serde::{Deserialize, Serialize};

/// Shown when an element has no DOM id.
pub const NO_DOM_ID: &str = "No ID";

/// Kind-specific properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyDetails {
    Image {
        src: String,
        alt: String,
        width: i32,
        height: i32,
    },
    Text {
        text: String,
        /// Raw `font-size` value, e.g. "16px" or "2em".
        font_size: String,
        /// Raw `color` value.
        color: String,
        /// `color` as `#rrggbb` for colour pickers, when parseable.
        color_hex: Option<String>,
        font_weight: String,
        font_weight_label: String,
    },
}

/// Everything the property panel shows for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementProperties {
    pub id: ElementId,
    pub tag: String,
    pub dom_id: String,
    pub kind: ElementKind,
    /// Canvas-relative position, rounded.
    pub x: i32,
    pub y: i32,
    pub details: PropertyDetails,
}

impl ElementProperties {
    /// Build the view for a selection. Returns `None` if the element is gone.
    pub fn from_selection(selection: &Selection, store: &ElementStore) -> Option<Self> {
        let element = store.get(selection.id)?;
        let rect = selection.rect;

        let details = if element.kind == ElementKind::Image {
            let declared = |property: &str| element.style.get(property).and_then(parse_px);
            PropertyDetails::Image {
                src: element.attribute("src").unwrap_or_default().to_string(),
                alt: element.attribute("alt").unwrap_or_default().to_string(),
                width: declared("width").unwrap_or(rect.width().round() as i32),
                height: declared("height").unwrap_or(rect.height().round() as i32),
            }
        } else {
            let color = element.style.get("color").unwrap_or(DEFAULT_TEXT_COLOR).to_string();
            let font_weight = element.style.get("font-weight").unwrap_or("normal").to_string();
            PropertyDetails::Text {
                text: store.text_content(selection.id).unwrap_or_default(),
                font_size: element.style.get("font-size").unwrap_or("16px").to_string(),
                color_hex: SerializableColor::parse(&color).map(|c| c.to_hex()),
                color,
                font_weight_label: FontWeight::parse(&font_weight)
                    .map(|w| w.display_name())
                    .unwrap_or_else(|| font_weight.clone()),
                font_weight,
            }
        };

        Some(Self {
            id: selection.id,
            tag: element.tag.clone(),
            dom_id: element
                .attribute("id")
                .filter(|id| !id.is_empty())
                .unwrap_or(NO_DOM_ID)
                .to_string(),
            kind: element.kind,
            x: rect.x0.round() as i32,
            y: rect.y0.round() as i32,
            details,
        })
    }
}
