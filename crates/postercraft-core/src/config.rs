//! Editor configuration.

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};

/// Default canvas width in logical pixels.
pub const DEFAULT_CANVAS_WIDTH: i32 = 720;
/// Default canvas height in logical pixels.
pub const DEFAULT_CANVAS_HEIGHT: i32 = 720;
/// Maximum number of history entries kept by default.
pub const DEFAULT_MAX_HISTORY: usize = 50;
/// Commit delay after discrete structural edits (add, delete, image upload).
pub const DEFAULT_STRUCTURAL_COMMIT_DELAY_MS: u64 = 50;
/// Commit delay after continuous edits (typing, property sliders).
pub const DEFAULT_CONTINUOUS_COMMIT_DELAY_MS: u64 = 500;

/// How scheduled history commits interact with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Every scheduled commit fires after its delay, even if newer edits
    /// arrived in between.
    #[default]
    FireEach,
    /// Scheduling a commit replaces any pending commit of the same kind.
    Coalesce,
}

/// Configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub max_history: usize,
    pub structural_commit_delay_ms: u64,
    pub continuous_commit_delay_ms: u64,
    pub commit_policy: CommitPolicy,
    pub export_filename: String,
    pub export_title: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            max_history: DEFAULT_MAX_HISTORY,
            structural_commit_delay_ms: DEFAULT_STRUCTURAL_COMMIT_DELAY_MS,
            continuous_commit_delay_ms: DEFAULT_CONTINUOUS_COMMIT_DELAY_MS,
            commit_policy: CommitPolicy::default(),
            export_filename: "edited-poster.html".to_string(),
            export_title: "Edited Poster".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width <= 0 || self.canvas_height <= 0 {
            return Err(EditorError::Config(format!(
                "canvas must have a positive size, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.max_history == 0 {
            return Err(EditorError::Config("max_history must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.canvas_width, 720);
        assert_eq!(config.canvas_height, 720);
        assert_eq!(config.max_history, 50);
        assert_eq!(config.structural_commit_delay_ms, 50);
        assert_eq!(config.continuous_commit_delay_ms, 500);
        assert_eq!(config.commit_policy, CommitPolicy::FireEach);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"max_history": 10, "commit_policy": "coalesce"}"#).unwrap();
        assert_eq!(config.max_history, 10);
        assert_eq!(config.commit_policy, CommitPolicy::Coalesce);
        assert_eq!(config.canvas_width, 720);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"max_history": 0}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"canvas_width": -5}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(EditorConfig::from_json("not json"), Err(EditorError::Config(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EditorConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }
}
