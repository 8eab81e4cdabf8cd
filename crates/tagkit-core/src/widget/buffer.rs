//! In-memory editor widget.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{EditorConfig, EditorWidget, WidgetFactory, WidgetResult};
use crate::host::ElementHost;

/// In-memory editor widget for native hosts and tests.
///
/// Edits are buffered: user input and content writes mark the widget dirty,
/// and [`BufferWidget::flush_changes`] notifies subscribers once for the
/// whole burst.
pub struct BufferWidget {
    config: EditorConfig,
    content: RefCell<String>,
    /// Content written through `set_content`, in order.
    writes: RefCell<Vec<String>>,
    dirty: Cell<bool>,
    listeners: RefCell<Vec<Box<dyn FnMut()>>>,
}

impl BufferWidget {
    /// Create a widget showing `config.value`.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            content: RefCell::new(config.value.clone()),
            config,
            writes: RefCell::new(Vec::new()),
            dirty: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// The configuration this widget was created with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Simulate typing at the end of the content.
    pub fn type_text(&self, text: &str) {
        self.content.borrow_mut().push_str(text);
        self.dirty.set(true);
    }

    /// Simulate a user replacing the whole content (select all + paste).
    pub fn replace_text(&self, text: &str) {
        *self.content.borrow_mut() = text.to_string();
        self.dirty.set(true);
    }

    /// Content written by the owner, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    /// Whether changes are waiting to be flushed.
    pub fn has_pending_changes(&self) -> bool {
        self.dirty.get()
    }

    /// Notify subscribers once if anything changed since the last flush.
    /// Returns true if subscribers were notified.
    pub fn flush_changes(&self) -> bool {
        if !self.dirty.replace(false) {
            return false;
        }

        // Callbacks may read the widget, so the listener list is not borrowed while they run.
        let mut listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in listeners.iter_mut() {
            listener();
        }
        let mut current = self.listeners.borrow_mut();
        listeners.append(&mut current);
        *current = listeners;
        true
    }

    /// Number of change subscribers.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl EditorWidget for BufferWidget {
    fn content(&self) -> WidgetResult<String> {
        Ok(self.content.borrow().clone())
    }

    fn set_content(&self, content: &str) {
        self.writes.borrow_mut().push(content.to_string());
        *self.content.borrow_mut() = content.to_string();
        self.dirty.set(true);
    }

    fn on_content_changed(&self, callback: Box<dyn FnMut()>) {
        self.listeners.borrow_mut().push(callback);
    }
}

/// Factory producing [`BufferWidget`]s and keeping a handle to each.
#[derive(Default)]
pub struct BufferWidgetFactory {
    created: RefCell<Vec<Rc<BufferWidget>>>,
}

impl BufferWidgetFactory {
    /// Create a new factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of widgets created so far.
    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    /// The most recently created widget.
    pub fn last(&self) -> Option<Rc<BufferWidget>> {
        self.created.borrow().last().cloned()
    }

    /// Flush pending changes on every widget. Returns how many notified.
    pub fn flush_all(&self) -> usize {
        let widgets = self.created.borrow().clone();
        widgets.iter().filter(|w| w.flush_changes()).count()
    }
}

impl WidgetFactory for BufferWidgetFactory {
    fn create(&self, _host: &dyn ElementHost, config: &EditorConfig) -> WidgetResult<Rc<dyn EditorWidget>> {
        let widget = Rc::new(BufferWidget::new(config.clone()));
        self.created.borrow_mut().push(widget.clone());
        Ok(widget as Rc<dyn EditorWidget>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorOptions;

    fn widget(value: &str) -> BufferWidget {
        BufferWidget::new(EditorConfig::new(&EditorOptions::default(), value))
    }

    #[test]
    fn test_initial_content() {
        let w = widget("hello");
        assert_eq!(w.content().unwrap(), "hello");
        assert!(w.writes().is_empty());
        assert!(!w.has_pending_changes());
    }

    #[test]
    fn test_burst_flushes_once() {
        let w = widget("");
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        w.on_content_changed(Box::new(move || counter.set(counter.get() + 1)));

        w.type_text("a");
        w.type_text("b");
        w.type_text("c");
        assert!(w.flush_changes());
        assert!(!w.flush_changes());

        assert_eq!(w.content().unwrap(), "abc");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_set_content_is_recorded() {
        let w = widget("a");
        w.set_content("b");
        assert_eq!(w.content().unwrap(), "b");
        assert_eq!(w.writes(), vec!["b".to_string()]);
        assert!(w.has_pending_changes());
    }

    #[test]
    fn test_listener_can_read_content() {
        let w = Rc::new(widget(""));
        let seen = Rc::new(RefCell::new(String::new()));
        let weak = Rc::downgrade(&w);
        let sink = seen.clone();
        w.on_content_changed(Box::new(move || {
            if let Some(w) = weak.upgrade() {
                *sink.borrow_mut() = w.content().unwrap();
            }
        }));

        w.replace_text("const y = 2;");
        w.flush_changes();
        assert_eq!(*seen.borrow(), "const y = 2;");
        assert_eq!(w.listener_count(), 1);
    }
}
