//! Dashboard markup: conversation table rows, pagination, detail overlay,
//! and notifications.

use ava_core::browser::TableView;
use ava_types::config::Endpoints;
use ava_types::conversation::{ConversationPage, ConversationSummary, Pagination, TimeFilter};
use crate::markup::{el, Element, Node};

pub const TABLE_BODY_ID: &str = "conversations-body";
pub const PAGE_INFO_ID: &str = "page-info";
pub const PREV_ID: &str = "prev-page";
pub const NEXT_ID: &str = "next-page";
pub const SEARCH_INPUT_ID: &str = "search-input";
pub const SEARCH_BUTTON_ID: &str = "search-button";
pub const FILTER_ID: &str = "time-filter";
pub const DETAIL_OVERLAY_ID: &str = "conversation-detail";
pub const NOTIFICATION_ID: &str = "dashboard-notification";

pub const LOADING_TEXT: &str = "Loading conversations...";
pub const EXPORT_SUCCESS: &str = "✅ Conversation exported successfully";

const COLUMN_COUNT: usize = 6;

pub mod actions {
    pub const VIEW: &str = "view-conversation";
    pub const EXPORT: &str = "export-conversation";
    pub const CLOSE_DETAIL: &str = "close-detail";
}

/// Row label shown instead of the database id; `number` counts from 1
pub fn display_id(page: u32, number: usize) -> String {
    format!("conv-{}-{}", page, number)
}

/// Table body markup for the current browser view
pub fn table_body(view: &TableView, endpoints: &Endpoints) -> String {
    match view {
        TableView::NotLoaded => String::new(),
        TableView::Loading => loading_row().render(),
        TableView::Empty(message) => empty_row(message).render(),
        TableView::Rows(page) => rows(page, endpoints).iter().map(Element::render).collect(),
    }
}

pub fn rows(page: &ConversationPage, endpoints: &Endpoints) -> Vec<Element> {
    page.rows
        .iter()
        .enumerate()
        .map(|(index, row)| row_node(page.page, index + 1, row, endpoints))
        .collect()
}

pub fn row_node(
    page: u32,
    number: usize,
    row: &ConversationSummary,
    endpoints: &Endpoints,
) -> Element {
    let id = row.id.to_string();
    el("tr")
        .attr("data-id", id.as_str())
        .child(el("td").class("conv-id").text(display_id(page, number)))
        .child(el("td").class("conv-user").text(row.user_id.as_str()))
        .child(
            el("td")
                .class("conv-content")
                .attr("title", row.content.as_str())
                .text(row.content_preview()),
        )
        .child(el("td").class("conv-response").text(row.response_preview()))
        .child(el("td").class("conv-time").text(row.formatted_timestamp()))
        .child(
            el("td")
                .class("conv-actions")
                .child(action_button(actions::VIEW, &id, "👁️", "View"))
                .child(action_button(actions::EXPORT, &id, "📥", "Export"))
                .child(
                    el("a")
                        .class("action-link")
                        .attr("href", endpoints.conversation_detail(row.id))
                        .attr("title", "Open full page")
                        .text("🔗"),
                ),
        )
}

fn action_button(action: &'static str, id: &str, icon: &str, title: &str) -> Element {
    el("button")
        .class("action-button")
        .attr("type", "button")
        .attr("data-action", action)
        .attr("data-id", id)
        .attr("title", title)
        .text(icon)
}

fn full_width_row(class: &'static str, content: Node) -> Element {
    el("tr").class(class).child(
        el("td")
            .attr("colspan", COLUMN_COUNT.to_string())
            .child(content),
    )
}

pub fn loading_row() -> Element {
    full_width_row(
        "loading-row",
        el("div")
            .class("loading")
            .child(el("span").class("spinner"))
            .text(LOADING_TEXT)
            .into(),
    )
}

pub fn empty_row(message: &str) -> Element {
    full_width_row("empty-row", Node::text(message))
}

/// Label plus enabled flags for the pager buttons
pub struct PagerView {
    pub label: String,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

pub fn pager(pagination: Option<Pagination>, loading: bool) -> PagerView {
    match pagination {
        Some(p) => PagerView {
            label: p.label(),
            previous_enabled: p.has_previous() && !loading,
            next_enabled: p.has_next() && !loading,
        },
        None => PagerView {
            label: String::new(),
            previous_enabled: false,
            next_enabled: false,
        },
    }
}

pub fn filter_options(selected: TimeFilter) -> String {
    TimeFilter::all()
        .iter()
        .map(|filter| {
            el("option")
                .attr("value", filter.as_str())
                .flag("selected", *filter == selected)
                .text(filter.label())
                .render()
        })
        .collect()
}

/// Full conversation overlay; content and response are shown in full
pub fn detail_overlay(row: &ConversationSummary, endpoints: &Endpoints) -> Element {
    let id = row.id.to_string();
    let section = |title: &str, class: &'static str, body: &str| {
        el("div")
            .class("detail-section")
            .child(el("h4").text(title))
            .child(el("div").class(class).text(body))
    };

    el("div")
        .id(DETAIL_OVERLAY_ID)
        .class("detail-overlay backdrop")
        .attr("data-action", actions::CLOSE_DETAIL)
        .child(
            el("div")
                .class("detail-modal")
                .child(
                    el("div")
                        .class("detail-header")
                        .child(el("h3").text("Conversation details"))
                        .child(
                            el("button")
                                .class("detail-close")
                                .attr("type", "button")
                                .attr("data-action", actions::CLOSE_DETAIL)
                                .text("×"),
                        ),
                )
                .child(
                    el("div")
                        .class("detail-meta")
                        .child(el("span").text(format!("User: {}", row.user_id)))
                        .child(el("span").text(format!("Date: {}", row.formatted_timestamp()))),
                )
                .child(section("👤 User message", "detail-content", &row.content))
                .child(section("🤖 AVA response", "detail-response", &row.response))
                .child(
                    el("div")
                        .class("detail-actions")
                        .child(action_button(actions::EXPORT, &id, "📥", "Export"))
                        .child(
                            el("a")
                                .class("detail-link")
                                .attr("href", endpoints.conversation_detail(row.id))
                                .text("Open full page"),
                        ),
                ),
        )
}

pub fn notification(message: &str) -> Element {
    el("div")
        .id(NOTIFICATION_ID)
        .class("notification success")
        .text(message)
}
