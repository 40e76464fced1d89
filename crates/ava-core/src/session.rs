//! Chat session: the client-side state machine of the widget.
//!
//! Lifecycle of one exchange:
//! 1. `Idle` → `Sending` on submit (the user entry and the pending
//!    placeholder are emitted immediately)
//! 2. Exactly one transport call
//! 3. `Sending` → `Idle` on reply or error; the assistant entry (or the
//!    error sentence) is emitted
//!
//! A submit while `Sending` is dropped. State lives in a RefCell that is
//! never borrowed across an await point, so the session can be shared via
//! `Rc` with `spawn_local` tasks.

use std::cell::RefCell;

use ava_types::{
    TransportError,
    api::AssistantReply,
    config::WidgetConfig,
    event::ChatEvent,
    message::{Message, Sender},
};
use crate::event_bus::EventBus;
use crate::ports::{ChatTransport, StatusPort, UploadFile};
use crate::upload::validate_image;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Sending,
}

/// Snapshot of the session flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub open: bool,
    pub phase: SessionPhase,
    pub conversation_id: Option<String>,
    /// `None` until the first status check settles
    pub online: Option<bool>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            open: false,
            phase: SessionPhase::Idle,
            conversation_id: None,
            online: None,
        }
    }
}

/// Why a submit did nothing at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Busy,
    EmptyMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Reply rendered into the thread
    Delivered,
    /// Exchange ended with an error sentence in the thread
    Failed(TransportError),
    /// Nothing happened; no request, no thread entry
    Rejected(Rejection),
}

pub struct ChatSession {
    config: WidgetConfig,
    state: RefCell<SessionState>,
    event_bus: EventBus,
}

impl ChatSession {
    pub fn new(config: WidgetConfig, event_bus: EventBus) -> Self {
        if !config.greeting.trim().is_empty() {
            event_bus.emit(ChatEvent::Appended(Message::assistant(&config.greeting)));
        }
        Self {
            config,
            state: RefCell::new(SessionState::default()),
            event_bus,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().phase == SessionPhase::Sending
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    pub fn conversation_id(&self) -> Option<String> {
        self.state.borrow().conversation_id.clone()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ─── Panel visibility ────────────────────────────────────

    pub fn open(&self) {
        self.set_open(true);
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    /// Flip visibility and return the new value
    pub fn toggle(&self) -> bool {
        let open = !self.is_open();
        self.set_open(open);
        open
    }

    fn set_open(&self, open: bool) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.open != open;
            state.open = open;
            changed
        };
        if changed {
            log::debug!("Chat panel {}", if open { "opened" } else { "closed" });
            self.event_bus.emit(if open { ChatEvent::Opened } else { ChatEvent::Closed });
        }
    }

    // ─── Exchanges ───────────────────────────────────────────

    /// Send one trimmed text message. Empty input and busy sessions are no-ops.
    pub async fn send_text<T>(&self, transport: &T, input: &str) -> SendOutcome
    where
        T: ChatTransport + ?Sized,
    {
        let message = input.trim();
        if message.is_empty() {
            return SendOutcome::Rejected(Rejection::EmptyMessage);
        }

        let conversation_id = match self.begin_send() {
            Ok(id) => id,
            Err(rejection) => return SendOutcome::Rejected(rejection),
        };

        log::info!("Sending message ({} chars)", message.chars().count());
        self.event_bus.emit(ChatEvent::Appended(Message::user(message)));
        self.event_bus.emit(ChatEvent::PendingStarted);

        let result = transport
            .send_text(message, conversation_id.as_deref())
            .await;

        self.finish(result.map(|reply| {
            let conversation_id = reply.conversation_id.clone();
            (vec![assistant_message(reply)], conversation_id)
        }))
    }

    /// Validate and upload an image. A rejected file never reaches the
    /// transport; its validation sentence is appended instead.
    pub async fn send_image<T>(&self, transport: &T, file: &T::Upload) -> SendOutcome
    where
        T: ChatTransport + ?Sized,
    {
        if self.is_busy() {
            log::debug!("Image upload dropped: exchange already in flight");
            return SendOutcome::Rejected(Rejection::Busy);
        }

        if let Err(invalid) = validate_image(file, self.config.max_upload_bytes) {
            log::warn!("Image rejected before upload: {}", invalid);
            let err = TransportError::from(invalid);
            self.event_bus
                .emit(ChatEvent::Appended(Message::assistant(err.user_message())));
            return SendOutcome::Failed(err);
        }

        if let Err(rejection) = self.begin_send() {
            return SendOutcome::Rejected(rejection);
        }

        let original_name = file.file_name();
        log::info!("Uploading image {} ({} bytes)", original_name, file.size());
        self.event_bus.emit(ChatEvent::PendingStarted);

        let result = transport.send_image(file, &self.config.caption_prompt).await;

        self.finish(result.map(|reply| {
            let echo = Message::with_image(
                Sender::User,
                format!("📎 {}", original_name),
                reply
                    .uploaded_image
                    .clone()
                    .map(|image| image.with_original_filename(&original_name)),
            );
            let conversation_id = reply.conversation_id.clone();
            (vec![echo, assistant_message(reply)], conversation_id)
        }))
    }

    /// Idle → Sending, handing out the conversation id to echo.
    fn begin_send(&self) -> Result<Option<String>, Rejection> {
        let mut state = self.state.borrow_mut();
        if state.phase == SessionPhase::Sending {
            log::debug!("Submit dropped: exchange already in flight");
            return Err(Rejection::Busy);
        }
        state.phase = SessionPhase::Sending;
        Ok(state.conversation_id.clone())
    }

    /// Sending → Idle, then render the outcome.
    fn finish(
        &self,
        result: Result<(Vec<Message>, Option<String>), TransportError>,
    ) -> SendOutcome {
        self.state.borrow_mut().phase = SessionPhase::Idle;
        self.event_bus.emit(ChatEvent::PendingFinished);

        match result {
            Ok((messages, conversation_id)) => {
                if let Some(id) = conversation_id {
                    // The first id names the conversation for the whole session
                    let mut state = self.state.borrow_mut();
                    match state.conversation_id.as_deref() {
                        None => {
                            log::info!("Conversation id set to {}", id);
                            state.conversation_id = Some(id);
                        }
                        Some(current) if current != id => {
                            log::debug!("Ignoring conversation id {}, keeping {}", id, current);
                        }
                        Some(_) => {}
                    }
                }
                for message in messages {
                    self.event_bus.emit(ChatEvent::Appended(message));
                }
                SendOutcome::Delivered
            }
            Err(e) => {
                log::error!("Chat exchange failed: {}", e);
                self.event_bus
                    .emit(ChatEvent::Appended(Message::assistant(e.user_message())));
                SendOutcome::Failed(e)
            }
        }
    }

    // ─── Availability ────────────────────────────────────────

    /// Poll the status endpoint. Failures count as offline and are never
    /// shown in the thread.
    pub async fn refresh_status<S>(&self, port: &S) -> bool
    where
        S: StatusPort + ?Sized,
    {
        let online = match port.check_status().await {
            Ok(status) => status.online,
            Err(e) => {
                log::warn!("Status check failed: {}", e);
                false
            }
        };

        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.online != Some(online);
            state.online = Some(online);
            changed
        };
        if changed {
            log::info!("Assistant is {}", if online { "online" } else { "offline" });
            self.event_bus.emit(ChatEvent::AvailabilityChanged { online });
        }
        online
    }
}

fn assistant_message(reply: AssistantReply) -> Message {
    Message::with_image(Sender::Assistant, reply.text, reply.image)
}
