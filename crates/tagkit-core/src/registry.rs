//! Element registration table.
//!
//! Maps a tag name to its definition: the attribute names the host must watch
//! (fixed per tag, never per instance) and a constructor for new instances.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::config::EditorOptions;
use crate::element::{AttributeReactiveElement, CustomElement, EditableValueElement, INTL_DATE_ATTRIBUTES};
use crate::host::ElementHost;
use crate::widget::WidgetFactory;

/// Tag of the attribute-reactive date element.
pub const INTL_DATE_TAG: &str = "intl-date";

/// Tag of the editor-wrapping element.
pub const CODE_EDITOR_TAG: &str = "code-editor";

// Hyphenated names that predate custom elements.
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid element name: {0:?}")]
    InvalidName(String),
    #[error("Element already defined: {0}")]
    AlreadyDefined(String),
}

type Constructor = Box<dyn Fn(Rc<dyn ElementHost>) -> Box<dyn CustomElement>>;

/// How to build and observe one element type.
pub struct ElementDefinition {
    tag: String,
    observed_attributes: Vec<String>,
    constructor: Constructor,
}

impl ElementDefinition {
    /// Create a definition.
    pub fn new(
        tag: impl Into<String>,
        observed_attributes: &[&str],
        constructor: impl Fn(Rc<dyn ElementHost>) -> Box<dyn CustomElement> + 'static,
    ) -> Self {
        Self {
            tag: tag.into(),
            observed_attributes: observed_attributes.iter().map(|s| s.to_string()).collect(),
            constructor: Box::new(constructor),
        }
    }

    /// The `intl-date` definition.
    pub fn intl_date() -> Self {
        Self::new(INTL_DATE_TAG, INTL_DATE_ATTRIBUTES, |host| {
            Box::new(AttributeReactiveElement::intl_date(host))
        })
    }

    /// The `code-editor` definition, creating widgets with `factory`.
    pub fn code_editor(factory: Rc<dyn WidgetFactory>, options: EditorOptions) -> Self {
        Self::new(CODE_EDITOR_TAG, &[], move |host| {
            Box::new(EditableValueElement::new(host, factory.clone(), options.clone()))
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn observed_attributes(&self) -> &[String] {
        &self.observed_attributes
    }

    /// Whether changes to `name` are reported to instances.
    pub fn observes(&self, name: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == name)
    }

    /// Construct a new instance bound to `host`.
    pub fn construct(&self, host: Rc<dyn ElementHost>) -> Box<dyn CustomElement> {
        (self.constructor)(host)
    }
}

impl std::fmt::Debug for ElementDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementDefinition")
            .field("tag", &self.tag)
            .field("observed_attributes", &self.observed_attributes)
            .finish_non_exhaustive()
    }
}

/// Registration table of element definitions by tag.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    definitions: HashMap<String, ElementDefinition>,
}

impl ElementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `intl-date` and `code-editor` defined.
    pub fn standard(factory: Rc<dyn WidgetFactory>, options: EditorOptions) -> Self {
        let mut registry = Self::new();
        for definition in [
            ElementDefinition::intl_date(),
            ElementDefinition::code_editor(factory, options),
        ] {
            registry.definitions.insert(definition.tag.clone(), definition);
        }
        registry
    }

    /// Register a definition. Each tag can be defined once.
    pub fn define(&mut self, definition: ElementDefinition) -> Result<(), RegistryError> {
        if !is_valid_element_name(&definition.tag) {
            return Err(RegistryError::InvalidName(definition.tag));
        }
        if self.definitions.contains_key(&definition.tag) {
            return Err(RegistryError::AlreadyDefined(definition.tag));
        }
        log::debug!("Defined <{}> observing {:?}", definition.tag, definition.observed_attributes);
        self.definitions.insert(definition.tag.clone(), definition);
        Ok(())
    }

    pub fn get(&self, tag: &str) -> Option<&ElementDefinition> {
        self.definitions.get(tag)
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    /// Attribute names watched for `tag`, if defined.
    pub fn observed_attributes(&self, tag: &str) -> Option<&[String]> {
        self.get(tag).map(|d| d.observed_attributes())
    }

    /// All defined tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

/// Lowercase ASCII name starting with a letter and containing a hyphen.
fn is_valid_element_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
        && !RESERVED_NAMES.contains(&name)
}
