//! WASM-target tests for ava-core.
//!
//! Runs EventBus, ChatSession, ConversationBrowser and export tests
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use ava_core::browser::{ConversationBrowser, LoadOutcome, TableView};
use ava_core::event_bus::EventBus;
use ava_core::export::{ConversationExport, BANNER_TITLE};
use ava_core::ports::*;
use ava_core::session::{ChatSession, Rejection, SendOutcome};
use ava_types::api::{AssistantReply, ServiceStatus};
use ava_types::config::WidgetConfig;
use ava_types::conversation::*;
use ava_types::event::ChatEvent;
use ava_types::message::*;
use ava_types::TransportError;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::cell::Cell;

// ─── Mocks ───────────────────────────────────────────────

struct MockFile {
    name: &'static str,
    mime: &'static str,
    size: u64,
}

impl UploadFile for MockFile {
    fn file_name(&self) -> String {
        self.name.to_string()
    }

    fn mime_type(&self) -> String {
        self.mime.to_string()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

struct EchoTransport {
    calls: Cell<usize>,
}

#[async_trait(?Send)]
impl ChatTransport for EchoTransport {
    type Upload = MockFile;

    async fn send_text(
        &self,
        message: &str,
        _conversation_id: Option<&str>,
    ) -> ava_types::Result<AssistantReply> {
        self.calls.set(self.calls.get() + 1);
        Ok(AssistantReply {
            text: format!("echo: {}", message),
            image: None,
            conversation_id: Some("c-1".to_string()),
            uploaded_image: None,
        })
    }

    async fn send_image(
        &self,
        _image: &MockFile,
        _prompt: &str,
    ) -> ava_types::Result<AssistantReply> {
        self.calls.set(self.calls.get() + 1);
        Err(TransportError::Network("offline".to_string()))
    }
}

struct DownStatus;

#[async_trait(?Send)]
impl StatusPort for DownStatus {
    async fn check_status(&self) -> ava_types::Result<ServiceStatus> {
        Err(TransportError::Network("unreachable".to_string()))
    }
}

struct OnePageSource;

#[async_trait(?Send)]
impl ConversationSource for OnePageSource {
    async fn list_conversations(&self, query: &PageQuery) -> ava_types::Result<ConversationPage> {
        Ok(ConversationPage {
            page: query.page,
            total: 1,
            rows: vec![ConversationSummary {
                id: 1,
                user_id: "bob@example.com".to_string(),
                content: "ping".to_string(),
                response: "pong".to_string(),
                timestamp: None,
            }],
        })
    }
}

fn quiet_session(bus: &EventBus) -> ChatSession {
    let config = WidgetConfig {
        greeting: String::new(),
        ..WidgetConfig::default()
    };
    ChatSession::new(config, bus.clone())
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(ChatEvent::Opened);
    assert!(bus.has_pending());
    assert_eq!(bus.drain(), vec![ChatEvent::Opened]);
    assert!(!bus.has_pending());
}

// ─── ChatSession Tests ───────────────────────────────────

#[wasm_bindgen_test]
async fn session_text_round_trip() {
    let bus = EventBus::new();
    let session = quiet_session(&bus);
    let transport = EchoTransport { calls: Cell::new(0) };

    let outcome = session.send_text(&transport, "hello").await;
    assert_eq!(outcome, SendOutcome::Delivered);
    assert_eq!(session.conversation_id().as_deref(), Some("c-1"));

    let events = bus.drain();
    assert_eq!(events.first(), Some(&ChatEvent::Appended(Message::user("hello"))));
    assert_eq!(
        events.last(),
        Some(&ChatEvent::Appended(Message::assistant("echo: hello")))
    );
}

#[wasm_bindgen_test]
async fn session_blank_input_sends_nothing() {
    let bus = EventBus::new();
    let session = quiet_session(&bus);
    let transport = EchoTransport { calls: Cell::new(0) };

    let outcome = session.send_text(&transport, "  ").await;
    assert_eq!(outcome, SendOutcome::Rejected(Rejection::EmptyMessage));
    assert_eq!(transport.calls.get(), 0);
}

#[wasm_bindgen_test]
async fn session_image_network_error() {
    let bus = EventBus::new();
    let session = quiet_session(&bus);
    let transport = EchoTransport { calls: Cell::new(0) };
    let file = MockFile { name: "a.png", mime: "image/png", size: 10 };

    let outcome = session.send_image(&transport, &file).await;
    assert!(matches!(outcome, SendOutcome::Failed(TransportError::Network(_))));
    assert!(!session.is_busy());

    let events = bus.drain();
    match events.last() {
        Some(ChatEvent::Appended(m)) => assert_eq!(m.sender, Sender::Assistant),
        other => panic!("unexpected last event {:?}", other),
    }
}

#[wasm_bindgen_test]
async fn session_status_failure_means_offline() {
    let bus = EventBus::new();
    let session = quiet_session(&bus);
    assert!(!session.refresh_status(&DownStatus).await);
    assert_eq!(session.state().online, Some(false));
}

// ─── ConversationBrowser Tests ───────────────────────────

#[wasm_bindgen_test]
async fn browser_loads_single_page() {
    let browser = ConversationBrowser::new(20);
    let outcome = browser.load(&OnePageSource, PageQuery::default()).await;
    assert_eq!(outcome, LoadOutcome::Applied);
    assert!(matches!(browser.view(), TableView::Rows(_)));

    let pagination = browser.pagination().unwrap();
    assert_eq!(pagination.total_pages(), 1);
    assert!(browser.next_query().is_none());
    assert!(browser.previous_query().is_none());
}

// ─── Export Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn export_names_user_and_date() {
    let at = Utc.with_ymd_and_hms(2024, 12, 1, 8, 0, 0).unwrap();
    let row = ConversationSummary {
        id: 1,
        user_id: "bob@example.com".to_string(),
        content: "ping".to_string(),
        response: "pong".to_string(),
        timestamp: None,
    };
    let export = ConversationExport::new(&row, at);
    assert_eq!(export.file_name, "AVA_Conversation_bob_example.com_2024-12-01.txt");
    assert!(export.body.contains(BANNER_TITLE));
    assert!(export.body.contains("pong"));
}
