//! Small DOM helpers shared by the widget and the dashboard.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget};

pub fn by_id(id: &str) -> Result<Element, JsValue> {
    gloo_utils::document()
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("No element with id '{}'", id)))
}

pub fn by_id_as<T: JsCast>(id: &str) -> Result<T, JsValue> {
    by_id(id)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element '{}' has an unexpected type", id)))
}

/// Attach a listener that lives as long as the page
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Same as `listen`, in the capture phase (for non-bubbling events such as `error`)
pub fn listen_capture<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback_and_bool(
        event,
        closure.as_ref().unchecked_ref(),
        true,
    )?;
    closure.forget();
    Ok(())
}

pub fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Nearest `[data-action]` element around the event target, with its action.
///
/// Backdrops carry an action too; a click that lands inside a backdrop's
/// content (rather than on the backdrop itself) yields no action.
pub fn action_of(event: &Event) -> Option<(Element, String)> {
    let target = event_element(event)?;
    let element = target.closest("[data-action]").ok()??;
    let action = element.get_attribute("data-action")?;
    if element.class_list().contains("backdrop") && element != target {
        return None;
    }
    Some((element, action))
}

pub fn data(element: &Element, name: &str) -> Option<String> {
    element.get_attribute(name).filter(|v| !v.is_empty())
}

pub fn remove_by_id(id: &str) {
    if let Some(element) = gloo_utils::document().get_element_by_id(id) {
        element.remove();
    }
}

/// Parse `html` (already escaped markup) and append it to `<body>`
pub fn append_to_body(html: &str) -> Result<(), JsValue> {
    gloo_utils::body().insert_adjacent_html("beforeend", html)
}

pub fn redirect(url: &str) {
    if let Err(e) = gloo_utils::window().location().set_href(url) {
        log::error!("Navigation to {} failed: {:?}", url, e);
    }
}

pub fn alert(message: &str) {
    let _ = gloo_utils::window().alert_with_message(message);
}
