//! Standalone HTML export.

use crate::canvas::CanvasDocument;
use crate::markup::{WriteOptions, escape_text, write_document};
use serde::{Deserialize, Serialize};

/// MIME type of exported documents.
pub const EXPORT_MIME_TYPE: &str = "text/html;charset=utf-8";
/// Marker identifying documents produced by the editor.
pub const GENERATOR: &str = "editable-html-poster";

/// A finished export, ready for the host to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedDocument {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

/// Serialize the document without editor artifacts: overlay elements are
/// left out and `contenteditable` markers dropped.
pub fn export_body(doc: &CanvasDocument) -> String {
    write_document(
        doc,
        WriteOptions {
            skip_overlays: true,
            strip_editable: true,
        },
    )
}

/// Wrap body markup in the standalone document shell.
pub fn wrap_document(body: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta data-generated-by="{generator}" />
  <title>{title}</title>
  <style>
    body {{
      margin: 0;
      padding: 0;
      font-family: sans-serif;
    }}
  </style>
</head>
<body>
{body}
</body>
</html>"#,
        generator = GENERATOR,
        title = escape_text(title),
        body = body,
    )
}

/// Export a document as a complete HTML file.
pub fn export_document(doc: &CanvasDocument, filename: &str, title: &str) -> ExportedDocument {
    let content = wrap_document(&export_body(doc), title);
    log::info!("Exported {} ({} bytes)", filename, content.len());
    ExportedDocument {
        filename: filename.to_string(),
        mime_type: EXPORT_MIME_TYPE.to_string(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::build_document;

    #[test]
    fn test_export_strips_editor_artifacts() {
        let doc = build_document(
            r#"<div class="poster"><p contenteditable="true" id="t">Hi</p><div class="selection-overlay">x</div><span class="my-overlay-thing">y</span></div>"#,
            720,
            720,
        );
        assert_eq!(export_body(&doc), r#"<div class="poster"><p id="t">Hi</p></div>"#);
    }

    #[test]
    fn test_shell() {
        let doc = build_document("<p>Hello</p>", 720, 720);
        let exported = export_document(&doc, "edited-poster.html", "Edited <Poster>");
        assert_eq!(exported.filename, "edited-poster.html");
        assert_eq!(exported.mime_type, "text/html;charset=utf-8");
        let content = &exported.content;
        assert!(content.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(content.contains(r#"<meta charset="UTF-8" />"#));
        assert!(content.contains(r#"<meta data-generated-by="editable-html-poster" />"#));
        assert!(content.contains("<title>Edited &lt;Poster&gt;</title>"));
        assert!(content.contains("<body>\n<p>Hello</p>\n</body>"));
        assert!(content.ends_with("</html>"));
        assert!(!content.contains("<script"));
    }
}
