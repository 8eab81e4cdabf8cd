//! Light/dark theme preference.
//!
//! Resolved once by the application shell and applied to the document root.
//! The elements themselves never read it.

use serde::{Deserialize, Serialize};

/// Root attribute carrying the theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Resolved theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
    /// The host cannot report a color scheme preference.
    Unsupported,
}

impl ThemePreference {
    /// Value for [`THEME_ATTRIBUTE`], `None` when unsupported.
    pub fn attribute_value(self) -> Option<&'static str> {
        match self {
            Self::Light => Some("light"),
            Self::Dark => Some("dark"),
            Self::Unsupported => None,
        }
    }
}

/// Resolve the theme.
///
/// A non-empty stored preference wins (`"dark"` is dark, anything else light).
/// Without one, `prefers_dark` is the host's color scheme query: `None` when
/// the host has no such query.
pub fn resolve_theme(stored: Option<&str>, prefers_dark: Option<bool>) -> ThemePreference {
    match (stored.filter(|s| !s.is_empty()), prefers_dark) {
        (Some("dark"), _) => ThemePreference::Dark,
        (Some(_), _) => ThemePreference::Light,
        (None, None) => ThemePreference::Unsupported,
        (None, Some(true)) => ThemePreference::Dark,
        (None, Some(false)) => ThemePreference::Light,
    }
}

/// Theme injected into whatever renders the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeContext {
    preference: ThemePreference,
}

impl ThemeContext {
    pub fn new(preference: ThemePreference) -> Self {
        Self { preference }
    }

    /// Resolve from a stored preference and the host's color scheme query.
    pub fn resolve(stored: Option<&str>, prefers_dark: Option<bool>) -> Self {
        Self::new(resolve_theme(stored, prefers_dark))
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// The root attribute to set, if any.
    pub fn root_attribute(&self) -> Option<(&'static str, &'static str)> {
        self.preference.attribute_value().map(|v| (THEME_ATTRIBUTE, v))
    }
}
