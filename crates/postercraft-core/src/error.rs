//! Error types for the editing engine.

use crate::elements::ElementId;
use thiserror::Error;

/// Errors surfaced by the editing engine.
///
/// Most editing edge cases (missing elements, empty selection, history
/// boundaries) are absorbed as no-ops and never reach this type.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Container element not found: {0}")]
    UnknownContainer(ElementId),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unsupported image data")]
    UnsupportedImageFormat,
}

/// Result type for editing engine operations.
pub type Result<T> = std::result::Result<T, EditorError>;
