//! Chat widget wiring: DOM events in, session calls, thread patches out.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlButtonElement, HtmlInputElement, KeyboardEvent};

use ava_core::event_bus::EventBus;
use ava_core::session::{ChatSession, SendOutcome};
use ava_platform::download::{download_image, now_millis};
use ava_platform::{HttpClient, PickedFile};
use ava_types::config::WidgetConfig;
use ava_ui::thread::{Thread, ThreadPatch};
use ava_ui::views::chat::{self, actions};

use crate::dom;

const OPEN_DELAY_MS: u32 = 10;
const CLOSE_DELAY_MS: u32 = 300;
const FOCUS_DELAY_MS: u32 = 300;
const OVERLAY_FADE_MS: u32 = 200;

const DOWNLOAD_FAILED: &str = "The image could not be downloaded. Try opening it in a new tab.";

pub struct ChatWidget {
    session: ChatSession,
    thread: RefCell<Thread>,
    client: HttpClient,
    root: Element,
    panel: Element,
    messages: Element,
    input: HtmlInputElement,
    send_button: HtmlButtonElement,
    file_input: HtmlInputElement,
}

/// Render the widget into `host` and wire every listener.
pub fn mount(host: &Element, config: WidgetConfig) -> Result<Rc<ChatWidget>, JsValue> {
    host.set_inner_html(&chat::widget_skeleton(&config).render());

    let client = HttpClient::new(config.endpoints());
    let poll_interval = config.status_poll_interval_ms;
    let widget = Rc::new(ChatWidget {
        session: ChatSession::new(config, EventBus::new()),
        thread: RefCell::new(Thread::new()),
        client,
        root: dom::by_id(chat::ROOT_ID)?,
        panel: dom::by_id(chat::PANEL_ID)?,
        messages: dom::by_id(chat::MESSAGES_ID)?,
        input: dom::by_id_as(chat::INPUT_ID)?,
        send_button: dom::by_id_as(chat::SEND_ID)?,
        file_input: dom::by_id_as(chat::FILE_INPUT_ID)?,
    });

    // Greeting
    widget.flush();
    widget.install_listeners()?;
    widget.start_status_polling(poll_interval);

    log::info!("Chat widget mounted");
    Ok(widget)
}

impl ChatWidget {
    fn install_listeners(self: &Rc<Self>) -> Result<(), JsValue> {
        let document = gloo_utils::document();

        // Delegated clicks: widget actions, overlay actions, outside-click close
        let widget = self.clone();
        dom::listen(&document, "click", move |event| widget.on_click(&event))?;

        let widget = self.clone();
        dom::listen(&self.input, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else { return };
            if key.key() == "Enter" && !key.shift_key() {
                event.prevent_default();
                widget.submit_text();
            }
        })?;

        let widget = self.clone();
        dom::listen(&self.file_input, "change", move |_| widget.submit_image())?;

        // `error` does not bubble; capture it for images inside the thread
        dom::listen_capture(&self.messages, "error", |event| {
            let Some(target) = dom::event_element(&event) else { return };
            if target.tag_name().eq_ignore_ascii_case("img") {
                log::warn!("Image failed to load: {:?}", target.get_attribute("src"));
                if let Some(container) = target.parent_element() {
                    container.set_inner_html(&chat::image_error_node().render());
                }
            }
        })?;

        Ok(())
    }

    fn on_click(self: &Rc<Self>, event: &Event) {
        let Some(target) = dom::event_element(event) else { return };
        let in_overlay = target.closest(&format!("#{}", chat::OVERLAY_ID)).ok().flatten().is_some();
        let in_widget = self.root.contains(Some(target.as_ref()));

        if let Some((element, action)) = dom::action_of(event) {
            if in_widget || in_overlay {
                self.handle_action(&element, &action);
                return;
            }
        }

        if !in_widget && !in_overlay && self.session.is_open() {
            self.session.close();
            self.flush();
        }
    }

    fn handle_action(self: &Rc<Self>, element: &Element, action: &str) {
        match action {
            actions::TOGGLE => {
                self.session.toggle();
                self.flush();
            }
            actions::CLOSE => {
                self.session.close();
                self.flush();
            }
            actions::SEND => self.submit_text(),
            actions::ATTACH => {
                if !self.session.is_busy() {
                    self.file_input.click();
                }
            }
            actions::EXPAND_IMAGE => {
                if let Some(src) = dom::data(element, "data-src") {
                    let name = dom::data(element, "data-name").unwrap_or_default();
                    show_overlay(&src, &name);
                }
            }
            actions::DOWNLOAD_IMAGE => {
                if let Some(src) = dom::data(element, "data-src") {
                    let name = dom::data(element, "data-name");
                    let file_name = chat::download_name(name.as_deref(), now_millis());
                    spawn_local(async move {
                        if let Err(e) = download_image(&src, &file_name).await {
                            log::error!("Image download failed: {}", e);
                            dom::alert(DOWNLOAD_FAILED);
                        }
                    });
                }
            }
            actions::CLOSE_OVERLAY => hide_overlay(),
            other => log::debug!("Unhandled action {}", other),
        }
    }

    fn submit_text(self: &Rc<Self>) {
        if self.session.is_busy() {
            return;
        }
        let text = self.input.value();
        if text.trim().is_empty() {
            return;
        }
        self.input.set_value("");

        let widget = self.clone();
        spawn_local(async move {
            let w = &widget;
            // The second branch runs once the send has suspended on the
            // network, so the user entry and placeholder show immediately.
            let (outcome, ()) = futures::join!(
                w.session.send_text(&w.client, &text),
                async { w.flush() }
            );
            w.flush();
            if let SendOutcome::Delivered = outcome {
                let _ = w.input.focus();
            }
        });
    }

    fn submit_image(self: &Rc<Self>) {
        let file = self.file_input.files().and_then(|files| files.get(0));
        // Allow picking the same file again
        self.file_input.set_value("");
        let Some(file) = file else { return };
        let file = PickedFile::new(file);

        let widget = self.clone();
        spawn_local(async move {
            let w = &widget;
            let (outcome, ()) = futures::join!(
                w.session.send_image(&w.client, &file),
                async { w.flush() }
            );
            w.flush();
            log::debug!("Image exchange finished: {:?}", outcome);
        });
    }

    fn start_status_polling(self: &Rc<Self>, interval_ms: u32) {
        let widget = self.clone();
        let refresh = move || {
            let widget = widget.clone();
            spawn_local(async move {
                widget.session.refresh_status(&widget.client).await;
                widget.flush();
            });
        };
        refresh();
        Interval::new(interval_ms, refresh).forget();
    }

    /// Drain session events and apply the resulting patches.
    fn flush(&self) {
        let Some(events) = self.session.event_bus().take_batch() else { return };
        let patches = self.thread.borrow_mut().process_events(events);
        for patch in patches {
            if let Err(e) = self.apply(patch) {
                log::error!("Failed to update chat view: {:?}", e);
            }
        }
    }

    fn apply(&self, patch: ThreadPatch) -> Result<(), JsValue> {
        match patch {
            ThreadPatch::Append { html, .. } => {
                self.messages.insert_adjacent_html("beforeend", &html)?;
                self.messages.set_scroll_top(self.messages.scroll_height());
            }
            ThreadPatch::RemovePending => {
                let pending = self
                    .messages
                    .query_selector_all(&format!(".{}", chat::PENDING_CLASS))?;
                for i in 0..pending.length() {
                    if let Some(node) = pending.item(i) {
                        if let Ok(element) = node.dyn_into::<Element>() {
                            element.remove();
                        }
                    }
                }
            }
            ThreadPatch::Status { html } => {
                dom::by_id(chat::STATUS_ID)?.set_outer_html(&html);
            }
            ThreadPatch::SetOpen(open) => self.set_panel_open(open)?,
            ThreadPatch::SetBusy(busy) => {
                self.send_button.set_disabled(busy);
            }
        }
        Ok(())
    }

    fn set_panel_open(&self, open: bool) -> Result<(), JsValue> {
        let panel = self.panel.clone();
        if open {
            panel.class_list().add_1(chat::VISIBLE_CLASS)?;
            Timeout::new(OPEN_DELAY_MS, move || {
                let _ = panel.class_list().add_1(chat::OPEN_CLASS);
            })
            .forget();
            let input = self.input.clone();
            Timeout::new(FOCUS_DELAY_MS, move || {
                let _ = input.focus();
            })
            .forget();
        } else {
            panel.class_list().remove_1(chat::OPEN_CLASS)?;
            Timeout::new(CLOSE_DELAY_MS, move || {
                // Reopened in the meantime
                if !panel.class_list().contains(chat::OPEN_CLASS) {
                    let _ = panel.class_list().remove_1(chat::VISIBLE_CLASS);
                }
            })
            .forget();
        }
        Ok(())
    }
}

fn show_overlay(src: &str, name: &str) {
    dom::remove_by_id(chat::OVERLAY_ID);
    if let Err(e) = dom::append_to_body(&chat::overlay_node(src, name).render()) {
        log::error!("Failed to open image overlay: {:?}", e);
        return;
    }
    Timeout::new(OPEN_DELAY_MS, || {
        if let Ok(overlay) = dom::by_id(chat::OVERLAY_ID) {
            let _ = overlay.class_list().add_1(chat::VISIBLE_CLASS);
        }
    })
    .forget();
}

fn hide_overlay() {
    let Ok(overlay) = dom::by_id(chat::OVERLAY_ID) else { return };
    let _ = overlay.class_list().remove_1(chat::VISIBLE_CLASS);
    Timeout::new(OVERLAY_FADE_MS, move || overlay.remove()).forget();
}
