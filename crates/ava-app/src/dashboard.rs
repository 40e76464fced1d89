//! Conversation dashboard wiring.
//!
//! The host page provides the table, pager, search and filter elements;
//! this module fills them from a `ConversationBrowser`.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlButtonElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent};

use ava_core::browser::{ConversationBrowser, LoadOutcome};
use ava_core::export::{ConversationExport, MIME_TYPE};
use ava_platform::download::download_text;
use ava_platform::HttpClient;
use ava_types::config::WidgetConfig;
use ava_types::conversation::{PageQuery, TimeFilter};
use ava_ui::views::dashboard::{self, actions};

use crate::dom;

const NOTIFICATION_MS: u32 = 4_000;
const EXPORT_FAILED: &str = "The conversation could not be exported.";

pub struct Dashboard {
    browser: ConversationBrowser,
    client: HttpClient,
    table_body: Element,
    page_info: Element,
    previous: HtmlButtonElement,
    next: HtmlButtonElement,
    search: HtmlInputElement,
    filter: HtmlSelectElement,
    notification_timer: RefCell<Option<Timeout>>,
}

pub fn mount(config: &WidgetConfig) -> Result<Rc<Dashboard>, JsValue> {
    let dashboard = Rc::new(Dashboard {
        browser: ConversationBrowser::new(config.page_size),
        client: HttpClient::new(config.endpoints()),
        table_body: dom::by_id(dashboard::TABLE_BODY_ID)?,
        page_info: dom::by_id(dashboard::PAGE_INFO_ID)?,
        previous: dom::by_id_as(dashboard::PREV_ID)?,
        next: dom::by_id_as(dashboard::NEXT_ID)?,
        search: dom::by_id_as(dashboard::SEARCH_INPUT_ID)?,
        filter: dom::by_id_as(dashboard::FILTER_ID)?,
        notification_timer: RefCell::new(None),
    });

    dashboard
        .filter
        .set_inner_html(&dashboard::filter_options(TimeFilter::default()));
    dashboard.install_listeners()?;
    dashboard.render();

    let board = dashboard.clone();
    spawn_local(async move {
        if let Err(e) = board.browser.check_access(&board.client).await {
            if e.is_unauthenticated() {
                dom::redirect(&board.client.endpoints().login());
                return;
            }
            // Not an auth problem; the list load reports it
        }
        board.load(PageQuery::default());
    });

    log::info!("Dashboard mounted");
    Ok(dashboard)
}

impl Dashboard {
    fn install_listeners(self: &Rc<Self>) -> Result<(), JsValue> {
        let board = self.clone();
        dom::listen(&gloo_utils::document(), "click", move |event| board.on_click(&event))?;

        let board = self.clone();
        let search_button = dom::by_id(dashboard::SEARCH_BUTTON_ID)?;
        dom::listen(&search_button, "click", move |_| {
            board.search()
        })?;

        let board = self.clone();
        dom::listen(&self.search, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else { return };
            if key.key() == "Enter" {
                event.prevent_default();
                board.search();
            }
        })?;

        let board = self.clone();
        dom::listen(&self.filter, "change", move |_| board.search())?;

        let board = self.clone();
        dom::listen(&self.previous, "click", move |_| {
            if let Some(query) = board.browser.previous_query() {
                board.load(query);
            }
        })?;

        let board = self.clone();
        dom::listen(&self.next, "click", move |_| {
            if let Some(query) = board.browser.next_query() {
                board.load(query);
            }
        })?;

        Ok(())
    }

    fn on_click(self: &Rc<Self>, event: &Event) {
        let Some((element, action)) = dom::action_of(event) else { return };
        let id = dom::data(&element, "data-id").and_then(|id| id.parse::<i64>().ok());

        match (action.as_str(), id) {
            (actions::VIEW, Some(id)) => self.show_detail(id),
            (actions::EXPORT, Some(id)) => self.export(id),
            (actions::CLOSE_DETAIL, _) => dom::remove_by_id(dashboard::DETAIL_OVERLAY_ID),
            _ => {}
        }
    }

    /// A new search or filter starts again from page 1
    fn search(self: &Rc<Self>) {
        let filter = TimeFilter::parse(&self.filter.value());
        let query = ConversationBrowser::search_query(filter, &self.search.value());
        self.load(query);
    }

    fn load(self: &Rc<Self>, query: PageQuery) {
        if self.browser.is_loading() {
            log::debug!("Load of page {} ignored: another load in flight", query.page);
            return;
        }

        let board = self.clone();
        spawn_local(async move {
            let b = &board;
            // Render the loading row once the load has suspended
            let (outcome, ()) = futures::join!(
                b.browser.load(&b.client, query),
                async { b.render() }
            );
            b.render();
            if let LoadOutcome::Failed(e) = outcome {
                if e.is_unauthenticated() {
                    dom::redirect(&b.client.endpoints().login());
                }
            }
        });
    }

    fn render(&self) {
        let view = self.browser.view();
        self.table_body
            .set_inner_html(&dashboard::table_body(&view, self.client.endpoints()));

        let pager = dashboard::pager(self.browser.pagination(), self.browser.is_loading());
        self.page_info.set_text_content(Some(&pager.label));
        self.previous.set_disabled(!pager.previous_enabled);
        self.next.set_disabled(!pager.next_enabled);
    }

    fn show_detail(&self, id: i64) {
        let Some(row) = self.browser.find(id) else {
            log::warn!("Conversation {} is not on the current page", id);
            return;
        };
        dom::remove_by_id(dashboard::DETAIL_OVERLAY_ID);
        let html = dashboard::detail_overlay(&row, self.client.endpoints()).render();
        if let Err(e) = dom::append_to_body(&html) {
            log::error!("Failed to open conversation {}: {:?}", id, e);
        }
    }

    fn export(&self, id: i64) {
        let Some(row) = self.browser.find(id) else { return };
        let export = ConversationExport::new(&row, Local::now());
        match download_text(&export.file_name, &export.body, MIME_TYPE) {
            Ok(()) => {
                log::info!("Exported conversation {} as {}", id, export.file_name);
                self.notify(dashboard::EXPORT_SUCCESS);
            }
            Err(e) => {
                log::error!("Export of conversation {} failed: {}", id, e);
                dom::alert(EXPORT_FAILED);
            }
        }
    }

    /// Show a notification that dismisses itself; a newer one replaces it
    fn notify(&self, message: &str) {
        dom::remove_by_id(dashboard::NOTIFICATION_ID);
        if let Err(e) = dom::append_to_body(&dashboard::notification(message).render()) {
            log::error!("Failed to show notification: {:?}", e);
            return;
        }
        let timer = Timeout::new(NOTIFICATION_MS, || {
            dom::remove_by_id(dashboard::NOTIFICATION_ID);
        });
        // Dropping the previous timer cancels it
        *self.notification_timer.borrow_mut() = Some(timer);
    }
}
