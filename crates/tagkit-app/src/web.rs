//! WebAssembly entry point and browser bindings.
//!
//! The JavaScript side defines the custom elements and forwards each lifecycle
//! callback to the matching wrapper here:
//!
//! ```js
//! customElements.define("code-editor", class extends HTMLElement {
//!   constructor() { super(); this.inner = new CodeEditor(this, CodeMirror); }
//!   get value() { return this.inner.value; }
//!   set value(v) { this.inner.value = v; }
//!   connectedCallback() { this.inner.connectedCallback(); }
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use tagkit_core::{
    localize, AttributeReactiveElement, EditableValueElement, EditorConfig, EditorOptions, EditorWidget,
    ElementError, ElementHost, ThemeContext, WidgetError, WidgetFactory, WidgetResult, INTL_DATE_ATTRIBUTES,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, HtmlElement};

/// Storage key holding the user's theme override.
const THEME_STORAGE_KEY: &str = "theme";

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

fn to_js(error: ElementError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// Host backed by a DOM element.
struct DomHost {
    element: HtmlElement,
}

impl ElementHost for DomHost {
    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_text_content(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn dispatch_event(&self, name: &str) {
        let dispatched = CustomEvent::new(name).and_then(|event| self.element.dispatch_event(&event));
        if let Err(e) = dispatched {
            log::error!("Failed to dispatch {}: {:?}", name, e);
        }
    }
}

/// Editor widget backed by a JavaScript editor instance (`getValue`, `setValue`, `on`).
struct JsWidget {
    editor: JsValue,
    // Kept alive for as long as the editor may call them.
    callbacks: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl JsWidget {
    fn new(editor: JsValue) -> Self {
        Self {
            editor,
            callbacks: RefCell::new(Vec::new()),
        }
    }

    fn call(&self, method: &str, args: &Array) -> Result<JsValue, JsValue> {
        let function: Function = Reflect::get(&self.editor, &JsValue::from_str(method))?.dyn_into()?;
        function.apply(&self.editor, args)
    }
}

impl EditorWidget for JsWidget {
    fn content(&self) -> WidgetResult<String> {
        let value = self
            .call("getValue", &Array::new())
            .map_err(|e| WidgetError::Unavailable(format!("getValue failed: {:?}", e)))?;
        value
            .as_string()
            .ok_or_else(|| WidgetError::Unavailable(format!("getValue returned {:?}", value)))
    }

    fn set_content(&self, content: &str) {
        if let Err(e) = self.call("setValue", &Array::of1(&JsValue::from_str(content))) {
            log::error!("setValue failed: {:?}", e);
        }
    }

    fn on_content_changed(&self, mut callback: Box<dyn FnMut()>) {
        let closure = Closure::<dyn FnMut()>::new(move || callback());
        let args = Array::of2(&JsValue::from_str("changes"), closure.as_ref());
        if let Err(e) = self.call("on", &args) {
            log::error!("Subscribing to editor changes failed: {:?}", e);
        }
        self.callbacks.borrow_mut().push(closure);
    }
}

/// Creates widgets by calling a JavaScript factory as `create(element, options)`.
struct JsWidgetFactory {
    create: Function,
    element: HtmlElement,
}

impl WidgetFactory for JsWidgetFactory {
    fn create(&self, _host: &dyn ElementHost, config: &EditorConfig) -> WidgetResult<Rc<dyn EditorWidget>> {
        let options =
            serde_wasm_bindgen::to_value(config).map_err(|e| WidgetError::Construction(e.to_string()))?;
        let editor = self
            .create
            .call2(&JsValue::NULL, &self.element, &options)
            .map_err(|e| WidgetError::Construction(format!("{:?}", e)))?;
        if editor.is_undefined() || editor.is_null() {
            return Err(WidgetError::MissingCapability("editor factory returned nothing".to_string()));
        }
        Ok(Rc::new(JsWidget::new(editor)) as Rc<dyn EditorWidget>)
    }
}

/// `intl-date` bound to a DOM element.
#[wasm_bindgen]
pub struct IntlDate {
    inner: AttributeReactiveElement,
}

#[wasm_bindgen]
impl IntlDate {
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlElement) -> IntlDate {
        let host: Rc<dyn ElementHost> = Rc::new(DomHost { element: host });
        IntlDate {
            inner: AttributeReactiveElement::intl_date(host),
        }
    }

    #[wasm_bindgen(js_name = observedAttributes)]
    pub fn observed_attributes() -> Array {
        INTL_DATE_ATTRIBUTES.iter().map(|name| JsValue::from_str(name)).collect()
    }

    #[wasm_bindgen(js_name = connectedCallback)]
    pub fn connected_callback(&mut self) -> Result<(), JsValue> {
        self.inner.on_attach_to_document().map_err(to_js)
    }

    #[wasm_bindgen(js_name = attributeChangedCallback)]
    pub fn attribute_changed_callback(
        &mut self,
        name: String,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Result<(), JsValue> {
        self.inner
            .on_declared_attribute_changed(&name, old_value.as_deref(), new_value.as_deref())
            .map_err(to_js)
    }
}

/// `code-editor` bound to a DOM element and a JavaScript editor factory.
#[wasm_bindgen]
pub struct CodeEditor {
    inner: EditableValueElement,
}

#[wasm_bindgen]
impl CodeEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlElement, create_widget: Function) -> CodeEditor {
        let factory = Rc::new(JsWidgetFactory {
            create: create_widget,
            element: host.clone(),
        });
        let host: Rc<dyn ElementHost> = Rc::new(DomHost { element: host });
        CodeEditor {
            inner: EditableValueElement::new(host, factory, EditorOptions::default()),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn value(&self) -> String {
        self.inner.value()
    }

    #[wasm_bindgen(setter)]
    pub fn set_value(&self, value: String) {
        self.inner.set_value(&value);
    }

    #[wasm_bindgen(js_name = connectedCallback)]
    pub fn connected_callback(&mut self) -> Result<(), JsValue> {
        self.inner.on_attach_to_document().map_err(to_js)
    }
}

/// Format a localized long date, throwing on invalid input.
#[wasm_bindgen(js_name = localizeDate)]
pub fn localize_date(
    lang: Option<String>,
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
) -> Result<String, JsValue> {
    localize(lang.as_deref(), year.as_deref(), month.as_deref(), day.as_deref())
        .map_err(|e| to_js(ElementError::from(e)))
}

fn detect_theme() -> ThemeContext {
    let Some(window) = web_sys::window() else {
        return ThemeContext::resolve(None, None);
    };
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok().flatten());
    let prefers_dark = window
        .match_media(DARK_SCHEME_QUERY)
        .ok()
        .flatten()
        .map(|query| query.matches());
    ThemeContext::resolve(stored.as_deref(), prefers_dark)
}

/// Resolve the theme and set it on the document root.
/// Returns the applied theme name, or `undefined` when unsupported.
#[wasm_bindgen(js_name = applyTheme)]
pub fn apply_theme() -> Result<Option<String>, JsValue> {
    let theme = detect_theme();
    if let Some((name, value)) = theme.root_attribute() {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        if let Some(root) = root {
            root.set_attribute(name, value)?;
        }
    }
    Ok(theme.preference().attribute_value().map(String::from))
}

/// Initialize logging and apply the theme.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("Logger already initialized"));
    }

    log::info!("Starting tagkit (WASM)");

    match apply_theme() {
        Ok(Some(theme)) => log::info!("Theme: {}", theme),
        Ok(None) => log::info!("Color scheme preference not supported"),
        Err(e) => log::error!("Applying theme failed: {:?}", e),
    }
}
