//! The element host: the node an element instance is attached to.

/// The host node backing an element instance.
///
/// Attribute values live only here, never cached by the element. Methods take
/// `&self` because hosts are shared handles (a DOM node, or a [`crate::NodeHost`]
/// in the in-process document).
pub trait ElementHost {
    /// Current value of an attribute, `None` when absent.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Replace the visible text of the node.
    fn set_text_content(&self, text: &str);

    /// Dispatch a payload-less event from the node.
    fn dispatch_event(&self, name: &str);
}
