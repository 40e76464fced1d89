//! Chat widget markup: bubble, panel skeleton, message entries, overlay.

use ava_types::config::WidgetConfig;
use ava_types::message::{ImageRef, Message};
use crate::markup::{el, Element};
use crate::thread::ThreadEntry;

// Element ids the app looks up after mounting the skeleton
pub const ROOT_ID: &str = "ava-chat-widget";
pub const BUBBLE_ID: &str = "ava-chat-bubble";
pub const PANEL_ID: &str = "ava-chat-panel";
pub const MESSAGES_ID: &str = "ava-chat-messages";
pub const INPUT_ID: &str = "ava-chat-input";
pub const SEND_ID: &str = "ava-chat-send";
pub const FILE_INPUT_ID: &str = "ava-chat-file";
pub const STATUS_ID: &str = "ava-chat-status";
pub const OVERLAY_ID: &str = "ava-image-overlay";

pub const PENDING_CLASS: &str = "typing-indicator";
pub const OPEN_CLASS: &str = "open";
pub const VISIBLE_CLASS: &str = "visible";

/// Values of the `data-action` attribute handled by the delegated click listener
pub mod actions {
    pub const TOGGLE: &str = "toggle-chat";
    pub const CLOSE: &str = "close-chat";
    pub const SEND: &str = "send-message";
    pub const ATTACH: &str = "attach-image";
    pub const EXPAND_IMAGE: &str = "expand-image";
    pub const DOWNLOAD_IMAGE: &str = "download-image";
    pub const CLOSE_OVERLAY: &str = "close-overlay";
}

pub const IMAGE_LOAD_ERROR: &str = "⚠️ The image could not be loaded.";

/// Name used when saving an image; `ava_image_<millis>.png` when none is known
pub fn download_name(display_name: Option<&str>, now_millis: u64) -> String {
    match display_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("ava_image_{}.png", now_millis),
    }
}

/// Dom id of a thread entry, used as the auto-scroll anchor
pub fn entry_dom_id(id: u64) -> String {
    format!("ava-msg-{}", id)
}

/// Static widget markup, mounted once
pub fn widget_skeleton(config: &WidgetConfig) -> Element {
    let header = el("div")
        .class("chat-header")
        .child(
            el("div")
                .class("chat-title")
                .child(el("span").class("chat-avatar").text("🤖"))
                .child(el("span").class("chat-name").text(config.assistant_name.as_str()))
                .child(status_node(None)),
        )
        .child(
            el("button")
                .class("chat-close")
                .attr("type", "button")
                .attr("data-action", actions::CLOSE)
                .attr("aria-label", "Close chat")
                .text("×"),
        );

    let input_row = el("div")
        .class("chat-input-row")
        .child(
            el("button")
                .class("chat-attach")
                .attr("type", "button")
                .attr("data-action", actions::ATTACH)
                .attr("aria-label", "Attach image")
                .text("📎"),
        )
        .child(
            el("input")
                .id(FILE_INPUT_ID)
                .attr("type", "file")
                .attr("accept", "image/*")
                .attr("hidden", ""),
        )
        .child(
            el("input")
                .id(INPUT_ID)
                .class("chat-input")
                .attr("type", "text")
                .attr("autocomplete", "off")
                .attr("placeholder", "Type your message..."),
        )
        .child(
            el("button")
                .id(SEND_ID)
                .class("chat-send")
                .attr("type", "button")
                .attr("data-action", actions::SEND)
                .text("Send"),
        );

    el("div")
        .id(ROOT_ID)
        .class("ava-chat-widget")
        .child(
            el("button")
                .id(BUBBLE_ID)
                .class("chat-bubble")
                .attr("type", "button")
                .attr("data-action", actions::TOGGLE)
                .attr("aria-label", format!("Chat with {}", config.assistant_name))
                .text("💬"),
        )
        .child(
            el("div")
                .id(PANEL_ID)
                .class("chat-panel")
                .child(header)
                .child(el("div").id(MESSAGES_ID).class("chat-messages"))
                .child(input_row),
        )
}

/// Availability indicator; `None` while the first check is outstanding
pub fn status_node(online: Option<bool>) -> Element {
    let (class, label) = match online {
        Some(true) => ("chat-status online", "Online"),
        Some(false) => ("chat-status offline", "Offline"),
        None => ("chat-status", "Connecting..."),
    };
    el("span").id(STATUS_ID).class(class).text(label)
}

/// One chat entry
pub fn message_node(entry: &ThreadEntry) -> Element {
    let message: &Message = &entry.message;
    let mut content = el("div")
        .class("message-content")
        .child(el("div").class("message-text").text(message.text()));

    if let Some(image) = message.image() {
        content = content.child(image_node(image));
    }

    el("div")
        .id(entry_dom_id(entry.id))
        .class(format!("message {}", message.sender.css_class()))
        .child(content)
}

fn image_node(image: &ImageRef) -> Element {
    let name = display_name(image);
    el("div")
        .class("message-image")
        .child(
            el("img")
                .class("chat-image")
                .attr("src", image.url.as_str())
                .attr("alt", name)
                .attr("loading", "lazy")
                .attr("data-action", actions::EXPAND_IMAGE)
                .attr("data-src", image.url.as_str())
                .attr("data-name", name),
        )
        .child(
            el("div")
                .class("image-actions")
                .child(image_button(actions::EXPAND_IMAGE, "🔍", "Enlarge image", image))
                .child(image_button(actions::DOWNLOAD_IMAGE, "💾", "Download image", image)),
        )
}

fn image_button(action: &'static str, icon: &str, label: &str, image: &ImageRef) -> Element {
    el("button")
        .class("image-action")
        .attr("type", "button")
        .attr("data-action", action)
        .attr("data-src", image.url.as_str())
        .attr("data-name", display_name(image))
        .attr("title", label)
        .text(icon)
}

/// Images are labelled and saved under the server-assigned name
fn display_name(image: &ImageRef) -> &str {
    &image.filename
}

/// Transient "assistant is typing" placeholder
pub fn pending_node() -> Element {
    el("div")
        .class(format!("message assistant {}", PENDING_CLASS))
        .child(
            el("div")
                .class("message-content")
                .children((0..3).map(|_| el("span").class("typing-dot"))),
        )
}

/// Inline replacement for an image that failed to load
pub fn image_error_node() -> Element {
    el("div").class("image-error").text(IMAGE_LOAD_ERROR)
}

/// Enlarged image overlay
pub fn overlay_node(src: &str, name: &str) -> Element {
    el("div")
        .id(OVERLAY_ID)
        .class("image-overlay backdrop")
        .attr("data-action", actions::CLOSE_OVERLAY)
        .child(
            el("div")
                .class("overlay-content")
                .child(el("img").class("overlay-image").attr("src", src).attr("alt", name))
                .child(
                    el("div")
                        .class("overlay-actions")
                        .child(
                            el("button")
                                .class("overlay-download")
                                .attr("type", "button")
                                .attr("data-action", actions::DOWNLOAD_IMAGE)
                                .attr("data-src", src)
                                .attr("data-name", name)
                                .text("💾 Download"),
                        )
                        .child(
                            el("button")
                                .class("overlay-close")
                                .attr("type", "button")
                                .attr("data-action", actions::CLOSE_OVERLAY)
                                .text("×"),
                        ),
                ),
        )
}
