//! Browser glue binding the state models to the static page markup.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only compiled with `hydrate`. Each submodule takes already-queried element
//! handles, owns one `RwSignal` of state, renders it through an `Effect`, and
//! returns the event listeners it attached so the controller can keep them
//! alive.
//!
//! ERROR HANDLING
//! ==============
//! Browser calls fail with an opaque `JsValue`. Binding-time failures become
//! [`DomError`]; render-time failures are logged and skipped so one bad
//! element never stops the rest of the page from updating.

pub mod contact_form;
pub mod filter;
pub mod handles;
pub mod navigation;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, EventTarget, HtmlElement};

/// An attached event listener. Dropping it removes the listener from its target.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("could not detach {} listener: {}", self.event, js_error_text(&e));
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("no window object")]
    MissingWindow,

    #[error("window has no document")]
    MissingDocument,

    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("javascript error: {0}")]
    Js(String),
}

impl DomError {
    pub(crate) fn js(err: JsValue) -> Self {
        Self::Js(js_error_text(&err))
    }
}

/// Human-readable text for a thrown JS value.
pub(crate) fn js_error_text(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Attach `handler` for `event` on `target`.
pub(crate) fn listen(
    target: &EventTarget,
    event: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, DomError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(DomError::js)?;
    Ok(Listener { target: target.clone(), event, callback })
}

/// Every `HtmlElement` matching `selector`, in document order.
pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, DomError> {
    let list = document.query_selector_all(selector).map_err(DomError::js)?;
    let mut out = Vec::new();
    for i in 0..list.length() {
        if let Some(node) = list.item(i) {
            if let Ok(el) = node.dyn_into::<HtmlElement>() {
                out.push(el);
            }
        }
    }
    Ok(out)
}

pub(crate) fn set_class(el: &HtmlElement, class: &str, on: bool) {
    if let Err(e) = el.class_list().toggle_with_force(class, on) {
        log::warn!("class toggle failed on #{}: {}", el.id(), js_error_text(&e));
    }
}

pub(crate) fn has_class(el: &HtmlElement, class: &str) -> bool {
    el.class_list().contains(class)
}

pub(crate) fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let style = el.style();
    let result = if value.is_empty() {
        style.remove_property(property).map(drop)
    } else {
        style.set_property(property, value)
    };
    if let Err(e) = result {
        log::warn!("style {property} update failed: {}", js_error_text(&e));
    }
}

/// Raw text of the inline config block, empty when the page has none.
pub(crate) fn config_text(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|el| el.text_content())
        .unwrap_or_default()
}

pub(crate) fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}
