//! Image elements and image data handling.

use super::{Element, ElementId, InlineStyle};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Source of a newly created image element.
pub const PLACEHOLDER_IMAGE_SRC: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='200' height='200'%3E%3Crect width='200' height='200' fill='%23e5e7eb'/%3E%3Ctext x='50%25' y='50%25' font-family='sans-serif' font-size='14' fill='%236b7280' text-anchor='middle' dominant-baseline='middle'%3EImage%3C/text%3E%3C/svg%3E";
/// Alt text of a newly created image element.
pub const PLACEHOLDER_IMAGE_ALT: &str = "Placeholder Image";
/// Size of a newly created image element, and the fallback when an image
/// declares none.
pub const DEFAULT_IMAGE_SIZE: (i32, i32) = (200, 200);
/// Top-left corner of a newly created image element.
pub const DEFAULT_IMAGE_POSITION: (i32, i32) = (100, 100);

/// Image format for uploaded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Svg,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }

        // SVG is text; look for the root element near the start.
        let head = &data[..data.len().min(512)];
        let head = String::from_utf8_lossy(head);
        let head = head.trim_start_matches('\u{feff}').trim_start();
        if (head.starts_with("<svg") || head.starts_with("<?xml")) && head.contains("<svg") {
            return Some(ImageFormat::Svg);
        }

        None
    }
}

/// Encode image bytes as a `data:` URL usable as an `img` source.
pub fn to_data_url(data: &[u8], format: ImageFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data))
}

/// Encode image bytes as a `data:` URL, detecting the format.
/// Returns `None` when the bytes are not a recognised image.
pub fn data_url_from_bytes(data: &[u8]) -> Option<String> {
    ImageFormat::from_magic_bytes(data).map(|format| to_data_url(data, format))
}

/// Build a new image element with the editor's defaults.
pub(crate) fn new_image_element(id: ElementId, dom_id: String) -> Element {
    let (left, top) = DEFAULT_IMAGE_POSITION;
    let (width, height) = DEFAULT_IMAGE_SIZE;
    let mut style = InlineStyle::new();
    style.set("position", "absolute");
    style.set_px("left", left);
    style.set_px("top", top);
    style.set_px("width", width);
    style.set_px("height", height);
    style.set("cursor", "move");
    style.set("user-select", "none");

    let mut element = Element::with_id(
        id,
        "img",
        vec![
            ("id".to_string(), dom_id),
            ("src".to_string(), PLACEHOLDER_IMAGE_SRC.to_string()),
            ("alt".to_string(), PLACEHOLDER_IMAGE_ALT.to_string()),
        ],
    );
    element.style = style;
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use uuid::Uuid;

    #[test]
    fn test_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::from_magic_bytes(b"<?xml version=\"1.0\"?><svg></svg>"),
            Some(ImageFormat::Svg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"hello world"), None);
        assert_eq!(ImageFormat::from_magic_bytes(&[0x89]), None);
    }

    #[test]
    fn test_data_url() {
        let url = to_data_url(b"GIF89a", ImageFormat::Gif);
        assert_eq!(url, "data:image/gif;base64,R0lGODlh");
        assert!(data_url_from_bytes(b"plain text").is_none());
    }

    #[test]
    fn test_new_image_defaults() {
        let element = new_image_element(Uuid::new_v4(), "img-3".to_string());
        assert_eq!(element.kind, ElementKind::Image);
        assert_eq!(element.attribute("id"), Some("img-3"));
        assert_eq!(element.attribute("alt"), Some(PLACEHOLDER_IMAGE_ALT));
        assert!(element.attribute("src").is_some_and(|s| s.starts_with("data:image/svg+xml")));
        assert_eq!(element.style.px("left"), Some(100));
        assert_eq!(element.style.px("width"), Some(200));
    }
}
