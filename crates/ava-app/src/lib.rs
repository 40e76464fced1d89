//! AVA App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It reads the page configuration, starts logging, and mounts the chat
//! widget and/or the conversation dashboard, depending on which host
//! elements the page provides.

mod dashboard;
mod dom;
mod widget;

use wasm_bindgen::prelude::*;

use ava_types::config::WidgetConfig;

/// Host element of the floating chat widget
const CHAT_HOST_ID: &str = "ava-chat-root";
/// Present only on the dashboard page
const DASHBOARD_HOST_ID: &str = "ava-dashboard";
const CONFIG_ATTRIBUTE: &str = "data-ava-config";

/// WASM entry point: runs when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let (config, config_error) = read_config();

    let level = config.log_level.as_filter().to_level().unwrap_or(log::Level::Info);
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("AVA WASM starting...");
    if let Some(e) = config_error {
        log::warn!("Invalid {} attribute, using defaults: {}", CONFIG_ATTRIBUTE, e);
    }

    let document = gloo_utils::document();

    if let Some(host) = document.get_element_by_id(CHAT_HOST_ID) {
        widget::mount(&host, config.clone())?;
    }

    if document.get_element_by_id(DASHBOARD_HOST_ID).is_some() {
        dashboard::mount(&config)?;
    }

    Ok(())
}

/// Config from the first element carrying `data-ava-config`; defaults otherwise.
fn read_config() -> (WidgetConfig, Option<ava_types::TransportError>) {
    let raw = gloo_utils::document()
        .query_selector(&format!("[{}]", CONFIG_ATTRIBUTE))
        .ok()
        .flatten()
        .and_then(|element| element.get_attribute(CONFIG_ATTRIBUTE));

    match raw {
        Some(raw) => match WidgetConfig::from_json(&raw) {
            Ok(config) => (config, None),
            Err(e) => (WidgetConfig::default(), Some(e)),
        },
        None => (WidgetConfig::default(), None),
    }
}
