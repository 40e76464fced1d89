//! What the chat session and the dashboard need from the backend.
//!
//! `ava-platform` answers these with `fetch` calls against the Flask
//! routes; the tests in this crate answer them with scripted mocks.

use async_trait::async_trait;
use ava_types::{
    Result,
    api::{AssistantReply, ServiceStatus},
    conversation::{ConversationPage, PageQuery},
};

// ─── Status Port ─────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StatusPort {
    /// Ask the backend whether the assistant is running.
    /// A login redirect surfaces as `TransportError::Http { status: 302, .. }`.
    async fn check_status(&self) -> Result<ServiceStatus>;
}

// ─── Chat Transport Port ─────────────────────────────────────

/// Metadata of a user-picked file, readable without loading its bytes.
pub trait UploadFile {
    fn file_name(&self) -> String;
    fn mime_type(&self) -> String;
    fn size(&self) -> u64;
}

#[async_trait(?Send)]
pub trait ChatTransport {
    /// Platform handle for a picked file (a browser `File` in production)
    type Upload: UploadFile;

    /// Exchange one text message for one assistant reply
    async fn send_text(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<AssistantReply>;

    /// Upload an already validated image with a fixed caption prompt
    async fn send_image(&self, image: &Self::Upload, prompt: &str) -> Result<AssistantReply>;
}

// ─── Conversation Source Port ────────────────────────────────

#[async_trait(?Send)]
pub trait ConversationSource {
    /// Fetch one page of the stored conversation list
    async fn list_conversations(&self, query: &PageQuery) -> Result<ConversationPage>;
}
