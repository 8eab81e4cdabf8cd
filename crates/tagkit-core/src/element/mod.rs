//! Element lifecycle.
//!
//! An element instance is bound to one host node and receives lifecycle
//! signals one at a time:
//! - `connected` when its node is first inserted into a live document
//! - `attribute_changed` when one of its declared attributes changes
//! - property reads and writes from the embedding code

mod attribute;
mod editor;

pub use attribute::{AttributeReactiveElement, RenderFn, INTL_DATE_ATTRIBUTES};
pub use editor::{EditableValueElement, DEFAULT_EDITOR_VALUE, VALUE_CHANGED_EVENT, VALUE_PROPERTY};

use thiserror::Error;

use crate::localize::LocalizeError;
use crate::registry::RegistryError;
use crate::widget::WidgetError;

/// Errors surfaced to the host's error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error(transparent)]
    Localize(#[from] LocalizeError),
    #[error(transparent)]
    Widget(#[from] WidgetError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Unknown node: {0}")]
    UnknownNode(usize),
}

/// Result type for element lifecycle operations.
pub type ElementResult<T> = Result<T, ElementError>;

/// Lifecycle callbacks a host runtime delivers to an element instance.
pub trait CustomElement {
    /// The host node was inserted into a live document.
    fn connected(&mut self) -> ElementResult<()>;

    /// A declared attribute was set, changed or removed.
    fn attribute_changed(
        &mut self,
        _name: &str,
        _old_value: Option<&str>,
        _new_value: Option<&str>,
    ) -> ElementResult<()> {
        Ok(())
    }

    /// Read a property. Unknown properties read as `None`.
    fn property(&self, _name: &str) -> Option<String> {
        None
    }

    /// Write a property. Unknown properties are ignored.
    fn set_property(&mut self, name: &str, _value: &str) -> ElementResult<()> {
        log::debug!("Ignoring write to unknown property {}", name);
        Ok(())
    }
}
