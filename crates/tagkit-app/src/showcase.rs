//! In-process showcase of both elements.

use std::cell::Cell;
use std::rc::Rc;

use tagkit_core::{
    AppConfig, BufferWidgetFactory, ConfigError, Document, ElementError, ElementRegistry, ThemeContext,
    CODE_EDITOR_TAG, INTL_DATE_TAG, VALUE_CHANGED_EVENT, VALUE_PROPERTY,
};
use thiserror::Error;

/// Locales rendered by the showcase.
pub const SHOWCASE_LOCALES: &[&str] = &["sr-RS", "en-GB", "en-US"];

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Element error: {0}")]
    Element(#[from] ElementError),
}

/// Render a date in each showcase locale, then edit a `code-editor` the way a
/// user would. Returns the lines to display.
pub fn run_showcase(config: &AppConfig) -> Result<Vec<String>, AppError> {
    let theme = ThemeContext::resolve(config.theme.as_deref(), None);
    log::info!("Theme: {:?}", theme.preference());

    let factory = Rc::new(BufferWidgetFactory::new());
    let registry = ElementRegistry::standard(factory.clone(), config.editor.clone());
    let mut doc = Document::new(registry);
    let mut lines = Vec::new();

    for lang in SHOWCASE_LOCALES {
        let id = doc.create_element(INTL_DATE_TAG);
        doc.set_attribute(id, "lang", lang)?;
        doc.set_attribute(id, "year", "2012")?;
        doc.set_attribute(id, "month", "5")?;
        doc.connect(id)?;
        lines.push(format!("{:6} {}", lang, doc.text_content(id)?));
    }

    let editor = doc.create_element(CODE_EDITOR_TAG);
    doc.connect(editor)?;
    let changes = Rc::new(Cell::new(0));
    let counter = changes.clone();
    doc.add_event_listener(editor, VALUE_CHANGED_EVENT, move || counter.set(counter.get() + 1))?;

    doc.set_property(editor, VALUE_PROPERTY, "const x = 1;")?;
    if let Some(widget) = factory.last() {
        widget.type_text("\nconst y = x + 1;");
    }
    factory.flush_all();

    let value = doc.property(editor, VALUE_PROPERTY)?.unwrap_or_default();
    lines.push(format!("{} events, value:", changes.get()));
    lines.extend(value.lines().map(|l| format!("  {}", l)));
    Ok(lines)
}
