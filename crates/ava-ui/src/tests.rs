#[cfg(test)]
mod tests {
    use crate::markup::*;
    use crate::thread::*;
    use crate::views::chat::{self, download_name, entry_dom_id, PENDING_CLASS};
    use crate::views::dashboard::{self, display_id};
    use ava_core::browser::TableView;
    use ava_types::config::{Endpoints, WidgetConfig};
    use ava_types::conversation::*;
    use ava_types::event::ChatEvent;
    use ava_types::message::*;

    fn has_raw_markup(html: &str, needle: &str) -> bool {
        html.contains(needle)
    }

    // ─── Escape Tests ────────────────────────────────────────

    #[test]
    fn test_escape_neutralizes_all_specials() {
        let out = escape("<img src=x onerror=\"alert('x')\"> & more");
        for c in ['<', '>', '"', '\''] {
            assert!(!out.contains(c), "found {:?} in {}", c, out);
        }
        // every '&' must start an entity
        for (i, _) in out.match_indices('&') {
            let rest = &out[i..];
            assert!(
                ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"]
                    .iter()
                    .any(|entity| rest.starts_with(entity)),
                "bare & in {}",
                out
            );
        }
    }

    #[test]
    fn test_escape_img_tag() {
        assert_eq!(escape("<img src=x>"), "&lt;img src=x&gt;");
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape("hello ¿qué tal? 👋"), "hello ¿qué tal? 👋");
    }

    // ─── Node Builder Tests ──────────────────────────────────

    #[test]
    fn test_node_renders_nested() {
        let html = el("div")
            .class("a")
            .child(el("span").text("x"))
            .text("y")
            .render();
        assert_eq!(html, "<div class=\"a\"><span>x</span>y</div>");
    }

    #[test]
    fn test_node_escapes_text_and_attributes() {
        let html = el("a")
            .attr("href", "\" onclick=\"evil()")
            .text("<script>alert(1)</script>")
            .render();
        assert!(!has_raw_markup(&html, "<script>"));
        assert!(!has_raw_markup(&html, "\" onclick"));
        assert!(html.starts_with("<a href=\"&quot; onclick=&quot;evil()\">"));
    }

    #[test]
    fn test_void_element_has_no_closing_tag() {
        let html = el("img").attr("src", "/a.png").render();
        assert_eq!(html, "<img src=\"/a.png\">");
    }

    #[test]
    fn test_flag_attribute() {
        assert_eq!(el("option").flag("selected", true).render(), "<option selected></option>");
        assert_eq!(el("option").flag("selected", false).render(), "<option></option>");
    }

    // ─── Thread Tests ────────────────────────────────────────

    #[test]
    fn test_thread_initial() {
        let thread = Thread::new();
        assert!(thread.entries().is_empty());
        assert!(!thread.is_pending());
        assert!(!thread.is_open());
        assert!(thread.online().is_none());
        assert!(thread.latest_entry_id().is_none());
    }

    #[test]
    fn test_thread_append_assigns_sequential_ids() {
        let mut thread = Thread::new();
        thread.append(Message::user("a"));
        let patch = thread.append(Message::assistant("b"));
        assert_eq!(thread.entries().len(), 2);
        assert_eq!(thread.latest_entry_id(), Some(1));
        match patch {
            ThreadPatch::Append { html, anchor_id } => {
                assert_eq!(anchor_id, entry_dom_id(1));
                assert!(html.contains("message assistant"));
                assert!(html.contains(">b<"));
            }
            other => panic!("unexpected patch {:?}", other),
        }
    }

    #[test]
    fn test_thread_escapes_server_text() {
        let mut thread = Thread::new();
        thread.append(Message::assistant("<img src=x onerror=alert(1)>"));
        let html = thread.render();
        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_thread_pending_is_idempotent() {
        let mut thread = Thread::new();
        assert!(thread.show_pending().is_some());
        assert!(thread.show_pending().is_none());
        assert_eq!(thread.render().matches(PENDING_CLASS).count(), 1);

        assert_eq!(thread.clear_pending(), ThreadPatch::RemovePending);
        assert_eq!(thread.clear_pending(), ThreadPatch::RemovePending);
        assert!(!thread.is_pending());
        assert!(!thread.render().contains(PENDING_CLASS));
    }

    #[test]
    fn test_thread_process_exchange() {
        let mut thread = Thread::new();
        let patches = thread.process_events(vec![
            ChatEvent::Opened,
            ChatEvent::Appended(Message::user("hi")),
            ChatEvent::PendingStarted,
        ]);
        assert_eq!(patches.len(), 4);
        assert_eq!(patches[0], ThreadPatch::SetOpen(true));
        assert_eq!(patches[2], ThreadPatch::SetBusy(true));
        assert!(thread.is_pending());
        assert!(thread.is_busy());

        let patches = thread.process_events(vec![
            ChatEvent::PendingFinished,
            ChatEvent::Appended(Message::assistant("hello")),
        ]);
        assert_eq!(patches[0], ThreadPatch::RemovePending);
        assert_eq!(patches[1], ThreadPatch::SetBusy(false));
        assert!(matches!(patches[2], ThreadPatch::Append { .. }));
        assert!(!thread.is_pending());
        assert_eq!(thread.entries().len(), 2);
    }

    #[test]
    fn test_thread_availability() {
        let mut thread = Thread::new();
        let patches = thread.process_events(vec![ChatEvent::AvailabilityChanged { online: false }]);
        assert_eq!(thread.online(), Some(false));
        match &patches[0] {
            ThreadPatch::Status { html } => assert!(html.contains("offline")),
            other => panic!("unexpected patch {:?}", other),
        }
    }

    // ─── Chat View Tests ─────────────────────────────────────

    #[test]
    fn test_image_message_has_affordances() {
        let image = ImageRef::renderable(Some("/api/chat/image/cat.png"), Some("cat.png")).unwrap();
        let entry = ThreadEntry {
            id: 3,
            message: Message::with_image(Sender::Assistant, "Here", Some(image)),
        };
        let html = chat::message_node(&entry).render();
        assert!(html.contains("src=\"/api/chat/image/cat.png\""));
        assert!(html.contains(chat::actions::EXPAND_IMAGE));
        assert!(html.contains(chat::actions::DOWNLOAD_IMAGE));
        assert!(html.contains("data-name=\"cat.png\""));
    }

    #[test]
    fn test_image_name_is_server_assigned() {
        let image = ImageRef::renderable(Some("/api/chat/image/user_ab12.png"), Some("user_ab12.png"))
            .unwrap()
            .with_original_filename("beach.png");
        let entry = ThreadEntry {
            id: 0,
            message: Message::with_image(Sender::User, "📎 beach.png", Some(image)),
        };
        let html = chat::message_node(&entry).render();
        assert!(html.contains("data-name=\"user_ab12.png\""));
        assert!(html.contains("alt=\"user_ab12.png\""));
        assert!(!html.contains("data-name=\"beach.png\""));
        assert!(html.contains("message user"));
    }

    #[test]
    fn test_download_name_fallback() {
        assert_eq!(download_name(Some("cat.png"), 42), "cat.png");
        assert_eq!(download_name(Some("  "), 42), "ava_image_42.png");
        assert_eq!(download_name(None, 1700000000000), "ava_image_1700000000000.png");
    }

    #[test]
    fn test_widget_skeleton_escapes_assistant_name() {
        let config = WidgetConfig {
            assistant_name: "<b>AVA</b>".to_string(),
            ..WidgetConfig::default()
        };
        let html = chat::widget_skeleton(&config).render();
        assert!(!html.contains("<b>"));
        assert!(html.contains(chat::MESSAGES_ID));
        assert!(html.contains(chat::INPUT_ID));
        assert!(html.contains("accept=\"image/*\""));
    }

    #[test]
    fn test_overlay_escapes_source() {
        let html = chat::overlay_node("/x.png\"><script>", "x").render();
        assert!(!html.contains("<script>"));
        assert!(html.contains(chat::OVERLAY_ID));
    }

    // ─── Dashboard View Tests ────────────────────────────────

    fn summary(id: i64, content: &str) -> ConversationSummary {
        ConversationSummary {
            id,
            user_id: "alice@example.com".to_string(),
            content: content.to_string(),
            response: "hello".to_string(),
            timestamp: Some("2024-12-01 14:30:22".to_string()),
        }
    }

    #[test]
    fn test_display_id() {
        assert_eq!(display_id(2, 1), "conv-2-1");
    }

    #[test]
    fn test_rows_are_numbered_from_one() {
        let endpoints = Endpoints::new("");
        let page = ConversationPage {
            page: 1,
            total: 2,
            rows: vec![summary(8, "first"), summary(9, "second")],
        };
        let rows = dashboard::rows(&page, &endpoints);
        assert!(rows[0].render().contains("conv-1-1"));
        assert!(rows[1].render().contains("conv-1-2"));
        assert!(!rows[0].render().contains("conv-1-0"));
    }

    #[test]
    fn test_row_node() {
        let endpoints = Endpoints::new("");
        let html = dashboard::row_node(1, 4, &summary(17, "<b>hi</b>"), &endpoints).render();
        assert!(html.contains("conv-1-4"));
        assert!(html.contains("href=\"/conversation/17\""));
        assert!(html.contains("data-id=\"17\""));
        assert!(html.contains("01/12/2024, 14:30"));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;..."));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_table_body_states() {
        let endpoints = Endpoints::new("");
        assert!(dashboard::table_body(&TableView::Loading, &endpoints)
            .contains(dashboard::LOADING_TEXT));
        assert!(dashboard::table_body(&TableView::Empty("No conversations found".into()), &endpoints)
            .contains("No conversations found"));
        assert!(dashboard::table_body(&TableView::NotLoaded, &endpoints).is_empty());

        let page = ConversationPage {
            page: 1,
            total: 2,
            rows: vec![summary(1, "a"), summary(2, "b")],
        };
        let html = dashboard::table_body(&TableView::Rows(page), &endpoints);
        assert_eq!(html.matches("<tr").count(), 2);
    }

    #[test]
    fn test_pager_view() {
        let view = dashboard::pager(Some(Pagination::new(1, 20, 45)), false);
        assert_eq!(view.label, "Page 1 of 3 (45 conversations)");
        assert!(!view.previous_enabled);
        assert!(view.next_enabled);

        let view = dashboard::pager(Some(Pagination::new(3, 20, 45)), false);
        assert!(view.previous_enabled);
        assert!(!view.next_enabled);

        let view = dashboard::pager(Some(Pagination::new(2, 20, 45)), true);
        assert!(!view.previous_enabled && !view.next_enabled);
    }

    #[test]
    fn test_filter_options_marks_selected() {
        let html = dashboard::filter_options(TimeFilter::Week);
        assert!(html.contains("<option value=\"week\" selected>"));
        assert_eq!(html.matches("<option").count(), 4);
    }

    #[test]
    fn test_detail_overlay_shows_full_text_escaped() {
        let long = "x".repeat(120);
        let row = ConversationSummary {
            response: "<i>reply</i>".to_string(),
            ..summary(5, &long)
        };
        let html = dashboard::detail_overlay(&row, &Endpoints::new("https://ava.test/")).render();
        assert!(html.contains(&long));
        assert!(html.contains("&lt;i&gt;reply&lt;/i&gt;"));
        assert!(html.contains("href=\"https://ava.test/conversation/5\""));
    }
}
