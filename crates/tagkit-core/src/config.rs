//! Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::DEFAULT_EDITOR_VALUE;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static presentation options for the `code-editor` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub indent_unit: u32,
    pub mode: String,
    pub line_numbers: bool,
    /// Value an editor holds before anything sets it.
    pub initial_value: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            indent_unit: 4,
            mode: "javascript".to_string(),
            line_numbers: true,
            initial_value: DEFAULT_EDITOR_VALUE.to_string(),
        }
    }
}

/// Application-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorOptions,
    /// Filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Stored theme preference (`"light"` or `"dark"`), if any.
    pub theme: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: EditorOptions::default(),
            log_filter: "info".to_string(),
            theme: None,
        }
    }
}

impl AppConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
