//! Attribute-reactive text element (`intl-date`).

use std::rc::Rc;

use super::{CustomElement, ElementResult};
use crate::host::ElementHost;
use crate::localize::localize;

/// Attributes watched by `intl-date`, in the order passed to [`localize`].
pub const INTL_DATE_ATTRIBUTES: &[&str] = &["lang", "year", "month", "day"];

/// Renders text from a snapshot of the declared attributes, in declaration order.
pub type RenderFn = fn(&[Option<String>]) -> ElementResult<String>;

/// An element whose text is a pure function of its declared attributes.
///
/// Nothing is cached: every pass reads the attributes back from the host.
pub struct AttributeReactiveElement {
    host: Rc<dyn ElementHost>,
    declared: &'static [&'static str],
    render: RenderFn,
    attached: bool,
}

impl AttributeReactiveElement {
    /// Create an element watching `declared` and rendering with `render`.
    pub fn new(host: Rc<dyn ElementHost>, declared: &'static [&'static str], render: RenderFn) -> Self {
        Self {
            host,
            declared,
            render,
            attached: false,
        }
    }

    /// Create an `intl-date` element.
    pub fn intl_date(host: Rc<dyn ElementHost>) -> Self {
        Self::new(host, INTL_DATE_ATTRIBUTES, render_intl_date)
    }

    /// The attribute names this element reacts to.
    pub fn declared_attribute_names(&self) -> &'static [&'static str] {
        self.declared
    }

    /// Whether the element has been attached to a live document.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn on_attach_to_document(&mut self) -> ElementResult<()> {
        self.attached = true;
        self.render()
    }

    pub fn on_declared_attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> ElementResult<()> {
        if !self.declared.contains(&name) {
            return Ok(());
        }
        if !self.attached {
            log::trace!("{}: {:?} -> {:?} before attach, not rendering", name, old_value, new_value);
            return Ok(());
        }
        self.render()
    }

    fn render(&self) -> ElementResult<()> {
        let snapshot: Vec<Option<String>> = self.declared.iter().map(|name| self.host.attribute(name)).collect();
        let text = (self.render)(&snapshot)?;
        log::debug!("Rendered {:?} from {:?}", text, snapshot);
        self.host.set_text_content(&text);
        Ok(())
    }
}

impl CustomElement for AttributeReactiveElement {
    fn connected(&mut self) -> ElementResult<()> {
        self.on_attach_to_document()
    }

    fn attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> ElementResult<()> {
        self.on_declared_attribute_changed(name, old_value, new_value)
    }
}

fn render_intl_date(values: &[Option<String>]) -> ElementResult<String> {
    let field = |i: usize| values.get(i).and_then(|v| v.as_deref());
    Ok(localize(field(0), field(1), field(2), field(3))?)
}
