//! Editor-wrapping element (`code-editor`).
//!
//! The element owns the authoritative value and mediates between two writers:
//! - `set_value`, from the embedding code, which is the only path that pushes
//!   content into the widget and is a no-op for an unchanged value
//! - the widget's change notification, which pulls content out of the widget
//!   and emits [`VALUE_CHANGED_EVENT`], never writing back

use std::cell::RefCell;
use std::rc::Rc;

use super::{CustomElement, ElementResult};
use crate::config::EditorOptions;
use crate::host::ElementHost;
use crate::widget::{EditorConfig, EditorWidget, WidgetFactory};

/// Event emitted when the user edited the value inside the widget.
pub const VALUE_CHANGED_EVENT: &str = "editorChanged";

/// Property exposing the editor value.
pub const VALUE_PROPERTY: &str = "value";

/// Value of an editor nobody has written to yet: a sample `intl-date` definition.
pub const DEFAULT_EDITOR_VALUE: &str = r#"customElements.define(
    "intl-date",
    class extends HTMLElement {
      constructor() {
        super();
      }
      connectedCallback() {
        this.setTextContent();
      }
      attributeChangedCallback() {
        this.setTextContent();
      }
      static get observedAttributes() {
        return ["lang", "year", "month", "day"];
      }
      setTextContent() {
        const lang = this.getAttribute("lang");
        const year = this.getAttribute("year");
        const month = this.getAttribute("month");
        const day = this.getAttribute("day");
        this.textContent = localizeDate(lang, year, month, day);
      }
    }
  );"#;

/// State shared with the widget's change callback.
struct EditorState {
    current_value: String,
    widget: Option<Rc<dyn EditorWidget>>,
}

/// An element wrapping an external editor widget around an owned string value.
pub struct EditableValueElement {
    host: Rc<dyn ElementHost>,
    factory: Rc<dyn WidgetFactory>,
    options: EditorOptions,
    state: Rc<RefCell<EditorState>>,
}

impl EditableValueElement {
    /// Create an element holding `options.initial_value`. No widget exists until attach.
    pub fn new(host: Rc<dyn ElementHost>, factory: Rc<dyn WidgetFactory>, options: EditorOptions) -> Self {
        let state = EditorState {
            current_value: options.initial_value.clone(),
            widget: None,
        };
        Self {
            host,
            factory,
            options,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// The current value.
    pub fn value(&self) -> String {
        self.state.borrow().current_value.clone()
    }

    /// Set the value from outside.
    ///
    /// Equal values are ignored. Otherwise the widget, if any, is overwritten
    /// synchronously. No [`VALUE_CHANGED_EVENT`] is emitted for external writes.
    pub fn set_value(&self, value: &str) {
        let widget = {
            let mut state = self.state.borrow_mut();
            if state.current_value == value {
                log::trace!("Value unchanged, skipping update");
                return;
            }
            state.current_value = value.to_string();
            state.widget.clone()
        };

        // The borrow is released first: a widget may notify synchronously.
        if let Some(widget) = widget {
            widget.set_content(value);
        }
    }

    /// Whether a widget has been created.
    pub fn has_widget(&self) -> bool {
        self.state.borrow().widget.is_some()
    }

    /// Create the widget on first attach. Later attaches are no-ops.
    pub fn on_attach_to_document(&mut self) -> ElementResult<()> {
        if self.has_widget() {
            log::debug!("Editor already has a widget");
            return Ok(());
        }

        let config = EditorConfig::new(&self.options, self.value());
        let widget = self.factory.create(self.host.as_ref(), &config)?;
        log::debug!(
            "Created editor widget (mode {}, indent {}, {} bytes)",
            config.mode,
            config.indent_unit,
            config.value.len()
        );

        self.subscribe(&widget);
        self.state.borrow_mut().widget = Some(widget);
        Ok(())
    }

    fn subscribe(&self, widget: &Rc<dyn EditorWidget>) {
        let shared = Rc::downgrade(&self.state);
        let source = Rc::downgrade(widget);
        let host = Rc::downgrade(&self.host);

        widget.on_content_changed(Box::new(move || {
            let (Some(shared), Some(source)) = (shared.upgrade(), source.upgrade()) else {
                return;
            };
            let content = match source.content() {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("Ignoring change notification: {}", e);
                    return;
                }
            };
            {
                let mut state = shared.borrow_mut();
                if state.current_value == content {
                    // Echo of our own set_value, or edits that cancelled out.
                    return;
                }
                state.current_value = content;
            }
            if let Some(host) = host.upgrade() {
                host.dispatch_event(VALUE_CHANGED_EVENT);
            }
        }));
    }
}

impl CustomElement for EditableValueElement {
    fn connected(&mut self) -> ElementResult<()> {
        self.on_attach_to_document()
    }

    fn property(&self, name: &str) -> Option<String> {
        (name == VALUE_PROPERTY).then(|| self.value())
    }

    fn set_property(&mut self, name: &str, value: &str) -> ElementResult<()> {
        if name == VALUE_PROPERTY {
            self.set_value(value);
        } else {
            log::debug!("Ignoring write to unknown property {}", name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeHost;
    use crate::element::ElementError;
    use crate::widget::{BufferWidgetFactory, WidgetError, WidgetResult};

    struct FailingFactory;

    impl WidgetFactory for FailingFactory {
        fn create(&self, _host: &dyn ElementHost, _config: &EditorConfig) -> WidgetResult<Rc<dyn EditorWidget>> {
            Err(WidgetError::MissingCapability("document.createRange".to_string()))
        }
    }

    /// A widget whose content can never be read.
    #[derive(Default)]
    struct UnreadableWidget {
        listeners: RefCell<Vec<Box<dyn FnMut()>>>,
    }

    impl UnreadableWidget {
        fn notify(&self) {
            let mut listeners = self.listeners.take();
            for listener in listeners.iter_mut() {
                listener();
            }
            *self.listeners.borrow_mut() = listeners;
        }
    }

    impl EditorWidget for UnreadableWidget {
        fn content(&self) -> WidgetResult<String> {
            Err(WidgetError::Unavailable("getValue threw".to_string()))
        }

        fn set_content(&self, _content: &str) {}

        fn on_content_changed(&self, callback: Box<dyn FnMut()>) {
            self.listeners.borrow_mut().push(callback);
        }
    }

    struct UnreadableFactory(Rc<UnreadableWidget>);

    impl WidgetFactory for UnreadableFactory {
        fn create(&self, _host: &dyn ElementHost, _config: &EditorConfig) -> WidgetResult<Rc<dyn EditorWidget>> {
            Ok(self.0.clone() as Rc<dyn EditorWidget>)
        }
    }

    fn editor() -> (Rc<NodeHost>, Rc<BufferWidgetFactory>, EditableValueElement) {
        let host = Rc::new(NodeHost::recording());
        let factory = Rc::new(BufferWidgetFactory::new());
        let element = EditableValueElement::new(host.clone(), factory.clone(), EditorOptions::default());
        (host, factory, element)
    }

    #[test]
    fn test_default_value_before_attach() {
        let (_, factory, element) = editor();
        assert_eq!(element.value(), DEFAULT_EDITOR_VALUE);
        assert!(!element.has_widget());
        assert_eq!(factory.created_count(), 0);
    }

    #[test]
    fn test_value_set_before_attach_seeds_widget() {
        let (_, factory, mut element) = editor();
        element.set_value("const x = 1;");
        element.on_attach_to_document().unwrap();

        let widget = factory.last().unwrap();
        assert_eq!(widget.config().value, "const x = 1;");
        assert_eq!(widget.content().unwrap(), "const x = 1;");
        assert!(widget.writes().is_empty());
    }

    #[test]
    fn test_widget_gets_static_options() {
        let (_, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();

        let config = factory.last().unwrap().config().clone();
        assert_eq!(config.indent_unit, 4);
        assert_eq!(config.mode, "javascript");
        assert!(config.line_numbers);
    }

    #[test]
    fn test_attach_creates_widget_once() {
        let (_, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();
        element.on_attach_to_document().unwrap();

        assert_eq!(factory.created_count(), 1);
        assert_eq!(factory.last().unwrap().listener_count(), 1);
    }

    #[test]
    fn test_set_twice_writes_widget_once() {
        let (host, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();

        element.set_value("let a = 1;");
        element.set_value("let a = 1;");

        let widget = factory.last().unwrap();
        assert_eq!(widget.writes(), vec!["let a = 1;".to_string()]);
        assert_eq!(element.value(), "let a = 1;");
        assert!(host.dispatched_events().is_empty());
    }

    #[test]
    fn test_set_equal_to_current_is_noop() {
        let (_, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();

        element.set_value(DEFAULT_EDITOR_VALUE);
        assert!(factory.last().unwrap().writes().is_empty());
    }

    #[test]
    fn test_external_set_is_not_echoed() {
        let (host, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();

        element.set_value("let b = 2;");
        let widget = factory.last().unwrap();
        assert!(widget.flush_changes());

        assert_eq!(element.value(), "let b = 2;");
        assert!(host.dispatched_events().is_empty());
        assert_eq!(widget.writes().len(), 1);
    }

    #[test]
    fn test_user_edit_updates_value_and_emits_once() {
        let (host, factory, mut element) = editor();
        element.set_value("");
        element.on_attach_to_document().unwrap();

        let widget = factory.last().unwrap();
        widget.type_text("f");
        widget.type_text("o");
        widget.type_text("o");
        widget.flush_changes();

        assert_eq!(element.value(), "foo");
        assert_eq!(host.dispatched_events(), vec![VALUE_CHANGED_EVENT.to_string()]);
        // Not pushed back into the widget.
        assert!(widget.writes().is_empty());
    }

    #[test]
    fn test_each_burst_emits_one_event() {
        let (host, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();
        let widget = factory.last().unwrap();

        widget.replace_text("a");
        widget.flush_changes();
        widget.replace_text("ab");
        widget.flush_changes();

        assert_eq!(element.value(), "ab");
        assert_eq!(host.dispatched_events().len(), 2);
    }

    #[test]
    fn test_listener_reads_new_value() {
        let (host, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();
        let widget = factory.last().unwrap();

        let element = Rc::new(element);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (reader, sink) = (Rc::downgrade(&element), seen.clone());
        host.add_event_listener(VALUE_CHANGED_EVENT, move || {
            if let Some(element) = reader.upgrade() {
                sink.borrow_mut().push(element.value());
            }
        });

        widget.replace_text("edited");
        widget.flush_changes();
        assert_eq!(*seen.borrow(), vec!["edited".to_string()]);
    }

    #[test]
    fn test_set_after_edit_reaches_widget() {
        let (_, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();
        let widget = factory.last().unwrap();

        widget.replace_text("user");
        widget.flush_changes();
        element.set_value("external");

        assert_eq!(widget.content().unwrap(), "external");
        assert_eq!(widget.writes(), vec!["external".to_string()]);
    }

    #[test]
    fn test_construction_failure_keeps_value_storage() {
        let host = Rc::new(NodeHost::recording());
        let mut element = EditableValueElement::new(host.clone(), Rc::new(FailingFactory), EditorOptions::default());

        let result = element.on_attach_to_document();
        assert!(matches!(
            result,
            Err(ElementError::Widget(WidgetError::MissingCapability(_)))
        ));
        assert!(!element.has_widget());

        element.set_value("still works");
        assert_eq!(element.value(), "still works");
        element.set_value("still works");
        assert_eq!(element.value(), "still works");
        assert!(host.dispatched_events().is_empty());
    }

    #[test]
    fn test_unreadable_widget_keeps_value() {
        let host = Rc::new(NodeHost::recording());
        let widget = Rc::new(UnreadableWidget::default());
        let factory = Rc::new(UnreadableFactory(widget.clone()));
        let mut element = EditableValueElement::new(host.clone(), factory, EditorOptions::default());
        element.on_attach_to_document().unwrap();
        element.set_value("let kept = true;");

        widget.notify();

        assert_eq!(element.value(), "let kept = true;");
        assert!(host.dispatched_events().is_empty());
    }

    #[test]
    fn test_value_property() {
        let (_, factory, mut element) = editor();
        element.on_attach_to_document().unwrap();

        element.set_property(VALUE_PROPERTY, "via property").unwrap();
        assert_eq!(element.property(VALUE_PROPERTY).as_deref(), Some("via property"));
        assert_eq!(factory.last().unwrap().content().unwrap(), "via property");

        element.set_property("other", "ignored").unwrap();
        assert_eq!(element.property("other"), None);
    }
}
