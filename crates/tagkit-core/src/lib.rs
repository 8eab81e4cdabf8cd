//! tagkit Core Library
//!
//! Platform-agnostic lifecycle and state-synchronization logic for two
//! declarative elements:
//! - `intl-date`: recomputes localized date text from its attributes
//! - `code-editor`: keeps an editable value in sync with an external editor widget

pub mod config;
pub mod document;
pub mod element;
pub mod host;
pub mod localize;
pub mod registry;
pub mod theme;
pub mod widget;

pub use config::{AppConfig, ConfigError, EditorOptions};
pub use document::{Document, NodeHost, NodeId};
pub use element::{
    AttributeReactiveElement, CustomElement, EditableValueElement, ElementError, ElementResult,
    DEFAULT_EDITOR_VALUE, INTL_DATE_ATTRIBUTES, VALUE_CHANGED_EVENT, VALUE_PROPERTY,
};
pub use host::ElementHost;
pub use localize::{localize, LocalizeError, LocalizeResult, DEFAULT_LOCALE};
pub use registry::{ElementDefinition, ElementRegistry, RegistryError, CODE_EDITOR_TAG, INTL_DATE_TAG};
pub use theme::{resolve_theme, ThemeContext, ThemePreference, THEME_ATTRIBUTE};
pub use widget::{BufferWidget, BufferWidgetFactory, EditorConfig, EditorWidget, WidgetError, WidgetFactory, WidgetResult};
