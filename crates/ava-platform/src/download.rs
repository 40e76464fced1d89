//! Client-side file downloads through a temporary object URL.

use gloo_net::http::Request;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use ava_types::{Result, TransportError};

/// Save `body` as a local file. No network involved.
pub fn download_text(file_name: &str, body: &str, mime_type: &str) -> Result<()> {
    let parts = Array::of1(&JsValue::from_str(body));
    let bag = BlobPropertyBag::new();
    bag.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &bag).map_err(js_error)?;
    save_blob(&blob, file_name)
}

/// Fetch an image and save it under `file_name`.
pub async fn download_image(url: &str, file_name: &str) -> Result<()> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    if !response.ok() {
        return Err(TransportError::Http {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    let bytes = response
        .binary()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    let parts = Array::of1(&Uint8Array::from(bytes.as_slice()));
    let bag = BlobPropertyBag::new();
    if let Some(content_type) = response.headers().get("content-type") {
        bag.set_type(&content_type);
    }
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag).map_err(js_error)?;
    log::info!("Saving image {} ({} bytes)", file_name, bytes.len());
    save_blob(&blob, file_name)
}

fn save_blob(blob: &Blob, file_name: &str) -> Result<()> {
    let url = Url::create_object_url_with_blob(blob).map_err(js_error)?;
    let clicked = click_anchor(&url, file_name);
    // Revoke even when the click failed
    let _ = Url::revoke_object_url(&url);
    clicked
}

fn click_anchor(href: &str, file_name: &str) -> Result<()> {
    let document = gloo_utils::document();
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| TransportError::Network("anchor element unavailable".to_string()))?;
    anchor.set_href(href);
    anchor.set_download(file_name);

    let body = gloo_utils::body();
    body.append_child(&anchor).map_err(js_error)?;
    anchor.click();
    body.remove_child(&anchor).map_err(js_error)?;
    Ok(())
}

/// Milliseconds since the epoch, for fallback file names
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

fn js_error(e: JsValue) -> TransportError {
    TransportError::Network(format!("{:?}", e))
}
