//! In-process document hosting element instances.
//!
//! Plays the part of a browser's custom element runtime: nodes own their
//! attribute store and text, defined tags get an element instance, and
//! lifecycle signals are dispatched to it one at a time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::element::{CustomElement, ElementError, ElementResult};
use crate::host::ElementHost;
use crate::registry::{ElementDefinition, ElementRegistry};

/// Identifier of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

type Listener = Box<dyn FnMut()>;

/// Backing store of a single node.
#[derive(Default)]
pub struct NodeHost {
    /// Attributes in insertion order.
    attributes: RefCell<Vec<(String, String)>>,
    text: RefCell<String>,
    /// Whether dispatched event names are kept in `dispatched`.
    record: bool,
    dispatched: RefCell<Vec<String>>,
    listeners: RefCell<HashMap<String, Vec<Listener>>>,
}

impl NodeHost {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty node that keeps the name of every event it dispatches.
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    /// Set an attribute, returning the previous value.
    pub fn set_attribute(&self, name: &str, value: &str) -> Option<String> {
        let mut attributes = self.attributes.borrow_mut();
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, current)) => Some(std::mem::replace(current, value.to_string())),
            None => {
                attributes.push((name.to_string(), value.to_string()));
                None
            }
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let mut attributes = self.attributes.borrow_mut();
        let index = attributes.iter().position(|(n, _)| n == name)?;
        Some(attributes.remove(index).1)
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.attributes.borrow().clone()
    }

    pub fn text_content(&self) -> String {
        self.text.borrow().clone()
    }

    /// Names of all events dispatched from this node, oldest first.
    ///
    /// Always empty unless the node was created with [`NodeHost::recording`].
    pub fn dispatched_events(&self) -> Vec<String> {
        self.dispatched.borrow().clone()
    }

    /// Register a listener for events named `event`.
    pub fn add_event_listener(&self, event: &str, listener: impl FnMut() + 'static) {
        self.listeners
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Box::new(listener));
    }
}

impl ElementHost for NodeHost {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_text_content(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn dispatch_event(&self, name: &str) {
        if self.record {
            self.dispatched.borrow_mut().push(name.to_string());
        }

        // Listeners may read the node, so none of its cells stay borrowed while they run.
        let mut listeners = self.listeners.borrow_mut().remove(name).unwrap_or_default();
        for listener in listeners.iter_mut() {
            listener();
        }
        let mut table = self.listeners.borrow_mut();
        let slot = table.entry(name.to_string()).or_default();
        listeners.append(slot);
        *slot = listeners;
    }
}

struct Node {
    tag: String,
    host: Rc<NodeHost>,
    element: Option<Box<dyn CustomElement>>,
    connected: bool,
}

/// A flat document of nodes driven by an [`ElementRegistry`].
pub struct Document {
    registry: ElementRegistry,
    nodes: Vec<Node>,
}

impl Document {
    /// Create a document using `registry` for element definitions.
    pub fn new(registry: ElementRegistry) -> Self {
        Self {
            registry,
            nodes: Vec::new(),
        }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Define a new element type and upgrade existing nodes with that tag.
    ///
    /// Each upgraded node first sees its present observed attributes as
    /// changes, then a connect if it is already in the document.
    pub fn define(&mut self, definition: ElementDefinition) -> ElementResult<()> {
        let tag = definition.tag().to_string();
        self.registry.define(definition)?;

        let Self { registry, nodes } = self;
        let Some(definition) = registry.get(&tag) else {
            return Ok(());
        };

        let mut first_error = None;
        for node in nodes.iter_mut().filter(|n| n.tag == tag && n.element.is_none()) {
            let host: Rc<dyn ElementHost> = node.host.clone();
            let element = node.element.insert(definition.construct(host));
            if let Err(e) = upgrade(&mut **element, &node.host, definition, node.connected) {
                log::error!("Upgrading <{}> failed: {}", tag, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Create a detached node. Defined tags get an element instance immediately.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let host = Rc::new(NodeHost::new());
        let element = self.registry.get(tag).map(|definition| {
            let host: Rc<dyn ElementHost> = host.clone();
            definition.construct(host)
        });
        self.nodes.push(Node {
            tag: tag.to_string(),
            host,
            element,
            connected: false,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// The backing store of a node.
    pub fn host(&self, id: NodeId) -> ElementResult<Rc<NodeHost>> {
        Ok(self.node(id)?.host.clone())
    }

    pub fn tag(&self, id: NodeId) -> ElementResult<&str> {
        Ok(&self.node(id)?.tag)
    }

    /// Whether the node has an element instance.
    pub fn is_upgraded(&self, id: NodeId) -> ElementResult<bool> {
        Ok(self.node(id)?.element.is_some())
    }

    pub fn is_connected(&self, id: NodeId) -> ElementResult<bool> {
        Ok(self.node(id)?.connected)
    }

    /// Insert the node into the document. Connecting twice has no effect.
    pub fn connect(&mut self, id: NodeId) -> ElementResult<()> {
        let node = self.node_mut(id)?;
        if node.connected {
            return Ok(());
        }
        node.connected = true;
        match node.element.as_mut() {
            Some(element) => element.connected(),
            None => Ok(()),
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> ElementResult<()> {
        let observed = self.observes(id, name)?;
        let node = self.node_mut(id)?;
        let old_value = node.host.set_attribute(name, value);
        match node.element.as_mut() {
            Some(element) if observed => element.attribute_changed(name, old_value.as_deref(), Some(value)),
            _ => Ok(()),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> ElementResult<()> {
        let observed = self.observes(id, name)?;
        let node = self.node_mut(id)?;
        let Some(old_value) = node.host.remove_attribute(name) else {
            return Ok(());
        };
        match node.element.as_mut() {
            Some(element) if observed => element.attribute_changed(name, Some(&old_value), None),
            _ => Ok(()),
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> ElementResult<Option<String>> {
        Ok(self.node(id)?.host.attribute(name))
    }

    pub fn text_content(&self, id: NodeId) -> ElementResult<String> {
        Ok(self.node(id)?.host.text_content())
    }

    /// Read a property of the node's element, `None` when not upgraded or unknown.
    pub fn property(&self, id: NodeId, name: &str) -> ElementResult<Option<String>> {
        Ok(self.node(id)?.element.as_ref().and_then(|e| e.property(name)))
    }

    /// Write a property of the node's element. Ignored when not upgraded.
    pub fn set_property(&mut self, id: NodeId, name: &str, value: &str) -> ElementResult<()> {
        match self.node_mut(id)?.element.as_mut() {
            Some(element) => element.set_property(name, value),
            None => Ok(()),
        }
    }

    pub fn add_event_listener(
        &self,
        id: NodeId,
        event: &str,
        listener: impl FnMut() + 'static,
    ) -> ElementResult<()> {
        self.node(id)?.host.add_event_listener(event, listener);
        Ok(())
    }

    fn observes(&self, id: NodeId, name: &str) -> ElementResult<bool> {
        let node = self.node(id)?;
        Ok(self.registry.get(&node.tag).is_some_and(|d| d.observes(name)))
    }

    fn node(&self, id: NodeId) -> ElementResult<&Node> {
        self.nodes.get(id.0).ok_or(ElementError::UnknownNode(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> ElementResult<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(ElementError::UnknownNode(id.0))
    }
}

fn upgrade(
    element: &mut dyn CustomElement,
    host: &NodeHost,
    definition: &ElementDefinition,
    connected: bool,
) -> ElementResult<()> {
    for name in definition.observed_attributes() {
        if let Some(value) = host.attribute(name) {
            element.attribute_changed(name, None, Some(&value))?;
        }
    }
    if connected {
        element.connected()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorOptions;
    use crate::element::{VALUE_CHANGED_EVENT, VALUE_PROPERTY};
    use crate::localize::LocalizeError;
    use crate::registry::{CODE_EDITOR_TAG, INTL_DATE_TAG, RegistryError};
    use crate::widget::{BufferWidgetFactory, EditorWidget};
    use std::cell::Cell;

    fn document() -> (Document, Rc<BufferWidgetFactory>) {
        let factory = Rc::new(BufferWidgetFactory::new());
        let registry = ElementRegistry::standard(factory.clone(), EditorOptions::default());
        (Document::new(registry), factory)
    }

    #[test]
    fn test_node_host_attributes() {
        let host = NodeHost::new();
        assert_eq!(host.set_attribute("year", "2012"), None);
        assert_eq!(host.set_attribute("year", "2013"), Some("2012".to_string()));
        host.set_attribute("lang", "en-US");
        assert_eq!(
            host.attributes(),
            vec![("year".to_string(), "2013".to_string()), ("lang".to_string(), "en-US".to_string())]
        );
        assert_eq!(host.remove_attribute("year"), Some("2013".to_string()));
        assert_eq!(host.attribute("year"), None);
        assert_eq!(host.remove_attribute("year"), None);
    }

    #[test]
    fn test_node_host_listeners() {
        let host = NodeHost::recording();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        host.add_event_listener("ping", move || counter.set(counter.get() + 1));

        host.dispatch_event("ping");
        host.dispatch_event("pong");
        host.dispatch_event("ping");

        assert_eq!(calls.get(), 2);
        assert_eq!(host.dispatched_events(), vec!["ping", "pong", "ping"]);
    }

    #[test]
    fn test_node_host_does_not_record_by_default() {
        let host = NodeHost::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        host.add_event_listener("ping", move || counter.set(counter.get() + 1));

        for _ in 0..3 {
            host.dispatch_event("ping");
        }

        assert_eq!(calls.get(), 3);
        assert!(host.dispatched_events().is_empty());
    }

    #[test]
    fn test_intl_date_attached_with_attributes() {
        let (mut doc, _) = document();
        let id = doc.create_element(INTL_DATE_TAG);
        doc.set_attribute(id, "lang", "en-US").unwrap();
        doc.set_attribute(id, "year", "2012").unwrap();
        doc.set_attribute(id, "month", "5").unwrap();
        doc.set_attribute(id, "day", "1").unwrap();
        assert_eq!(doc.text_content(id).unwrap(), "");

        doc.connect(id).unwrap();
        assert_eq!(doc.text_content(id).unwrap(), "Friday, June 1, 2012");
    }

    #[test]
    fn test_intl_date_follows_attribute_changes() {
        let (mut doc, _) = document();
        let id = doc.create_element(INTL_DATE_TAG);
        doc.set_attribute(id, "lang", "en-US").unwrap();
        doc.set_attribute(id, "year", "2012").unwrap();
        doc.set_attribute(id, "month", "5").unwrap();
        doc.connect(id).unwrap();

        doc.set_attribute(id, "lang", "en-GB").unwrap();
        assert_eq!(doc.text_content(id).unwrap(), "Friday, 1 June 2012");

        doc.set_attribute(id, "day", "2").unwrap();
        assert_eq!(doc.text_content(id).unwrap(), "Saturday, 2 June 2012");

        doc.remove_attribute(id, "day").unwrap();
        assert_eq!(doc.text_content(id).unwrap(), "Friday, 1 June 2012");
    }

    #[test]
    fn test_intl_date_error_reaches_caller() {
        let (mut doc, _) = document();
        let id = doc.create_element(INTL_DATE_TAG);
        doc.set_attribute(id, "lang", "en_US").unwrap();
        doc.set_attribute(id, "year", "2012").unwrap();
        doc.set_attribute(id, "month", "5").unwrap();

        let result = doc.connect(id);
        assert_eq!(
            result,
            Err(ElementError::Localize(LocalizeError::InvalidLocale("en_US".to_string())))
        );
        assert_eq!(doc.text_content(id).unwrap(), "");
    }

    #[test]
    fn test_connect_twice_is_noop() {
        let (mut doc, factory) = document();
        let id = doc.create_element(CODE_EDITOR_TAG);
        doc.connect(id).unwrap();
        doc.connect(id).unwrap();
        assert!(doc.is_connected(id).unwrap());
        assert_eq!(factory.created_count(), 1);
    }

    #[test]
    fn test_code_editor_roundtrip_through_document() {
        let (mut doc, factory) = document();
        let id = doc.create_element(CODE_EDITOR_TAG);
        doc.set_property(id, VALUE_PROPERTY, "const x = 1;").unwrap();
        doc.connect(id).unwrap();

        let widget = factory.last().unwrap();
        assert_eq!(widget.content().unwrap(), "const x = 1;");

        let events = Rc::new(Cell::new(0));
        let counter = events.clone();
        doc.add_event_listener(id, VALUE_CHANGED_EVENT, move || counter.set(counter.get() + 1))
            .unwrap();

        widget.type_text("\nconst y = 2;");
        factory.flush_all();

        assert_eq!(events.get(), 1);
        assert_eq!(
            doc.property(id, VALUE_PROPERTY).unwrap().as_deref(),
            Some("const x = 1;\nconst y = 2;")
        );
    }

    #[test]
    fn test_undefined_tag_stays_plain() {
        let (mut doc, _) = document();
        let id = doc.create_element("x-unknown");
        doc.set_attribute(id, "lang", "en-US").unwrap();
        doc.connect(id).unwrap();

        assert!(!doc.is_upgraded(id).unwrap());
        assert_eq!(doc.property(id, VALUE_PROPERTY).unwrap(), None);
        assert_eq!(doc.attribute(id, "lang").unwrap().as_deref(), Some("en-US"));
    }

    #[test]
    fn test_late_define_upgrades_existing_nodes() {
        let mut doc = Document::new(ElementRegistry::new());
        let id = doc.create_element(INTL_DATE_TAG);
        doc.set_attribute(id, "lang", "en-US").unwrap();
        doc.set_attribute(id, "year", "2012").unwrap();
        doc.set_attribute(id, "month", "5").unwrap();
        doc.connect(id).unwrap();
        assert_eq!(doc.text_content(id).unwrap(), "");

        doc.define(ElementDefinition::intl_date()).unwrap();
        assert!(doc.is_upgraded(id).unwrap());
        assert_eq!(doc.text_content(id).unwrap(), "Friday, June 1, 2012");
    }

    #[test]
    fn test_define_duplicate_is_error() {
        let (mut doc, _) = document();
        let result = doc.define(ElementDefinition::intl_date());
        assert_eq!(
            result,
            Err(ElementError::Registry(RegistryError::AlreadyDefined("intl-date".to_string())))
        );
    }

    #[test]
    fn test_unknown_node() {
        let (mut doc, _) = document();
        let bogus = NodeId(42);
        assert_eq!(doc.connect(bogus), Err(ElementError::UnknownNode(42)));
        assert!(doc.text_content(bogus).is_err());
    }
}
