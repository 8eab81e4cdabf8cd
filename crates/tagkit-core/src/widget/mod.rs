//! Editor widget contract.
//!
//! The `code-editor` element never renders or edits text itself. It drives an
//! external widget through three operations (read content, replace content,
//! subscribe to batched changes) obtained from a [`WidgetFactory`].

mod buffer;

pub use buffer::{BufferWidget, BufferWidgetFactory};

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EditorOptions;
use crate::host::ElementHost;

/// Widget errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("Widget construction failed: {0}")]
    Construction(String),
    #[error("Host is missing a required capability: {0}")]
    MissingCapability(String),
    #[error("Widget content unavailable: {0}")]
    Unavailable(String),
}

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Configuration handed to the widget factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Spaces per indent level.
    pub indent_unit: u32,
    /// Syntax-highlighting language tag.
    pub mode: String,
    /// Show gutter line numbers.
    pub line_numbers: bool,
    /// Initial content.
    pub value: String,
}

impl EditorConfig {
    /// Build a widget configuration from the static options and the initial content.
    pub fn new(options: &EditorOptions, value: impl Into<String>) -> Self {
        Self {
            indent_unit: options.indent_unit,
            mode: options.mode.clone(),
            line_numbers: options.line_numbers,
            value: value.into(),
        }
    }
}

/// A live text-editing surface.
///
/// Handles are shared (`&self`) the same way a browser object is; an
/// implementation keeps its own interior mutability.
pub trait EditorWidget {
    /// Current content of the editing surface.
    ///
    /// Fails when the surface cannot be read; callers keep their last known
    /// value rather than treating the failure as empty content.
    fn content(&self) -> WidgetResult<String>;

    /// Overwrite the content immediately.
    fn set_content(&self, content: &str);

    /// Subscribe to content changes.
    ///
    /// The callback carries no payload and may fire once for a burst of
    /// edits; read [`EditorWidget::content`] to see the result.
    fn on_content_changed(&self, callback: Box<dyn FnMut()>);
}

/// Creates editor widgets attached to a host node.
pub trait WidgetFactory {
    fn create(&self, host: &dyn ElementHost, config: &EditorConfig) -> WidgetResult<Rc<dyn EditorWidget>>;
}
