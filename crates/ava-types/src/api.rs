//! Wire formats of the backend chat and dashboard API.
//!
//! Bodies are deserialized leniently (every optional field defaults) and then
//! converted into typed results, so classification happens here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::message::ImageRef;
use crate::conversation::{ConversationPage, ConversationSummary};

/// Fallback when a successful reply carries no text
pub const EMPTY_REPLY_TEXT: &str = "Response received without content";

/// Fallback when the server reports failure without a message
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

/// Value of `ava_status` meaning the assistant process is up
pub const STATUS_RUNNING: &str = "running";

/// Multipart field names for `/api/chat/image-analysis`
pub mod upload_fields {
    pub const IMAGE: &str = "image";
    pub const MESSAGE: &str = "message";
    pub const UNLIMITED: &str = "unlimited";
}

/// Body of `POST /api/chat/message`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

/// Reply of both chat endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReplyBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub image_generated: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub user_image_filename: Option<String>,
    #[serde(default)]
    pub user_image_path: Option<String>,
}

/// A successful assistant turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    /// Image produced by the assistant, only when renderable
    pub image: Option<ImageRef>,
    pub conversation_id: Option<String>,
    /// The user's upload as stored by the server
    pub uploaded_image: Option<ImageRef>,
}

impl ChatReplyBody {
    pub fn parse(raw: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Classify the body: `success: false` becomes an application error.
    pub fn into_reply(self) -> Result<AssistantReply, TransportError> {
        if !self.success {
            let message = non_empty(self.response)
                .or_else(|| non_empty(self.error))
                .unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string());
            return Err(TransportError::Application(message));
        }

        let image = if self.image_generated == Some(true) {
            ImageRef::renderable(self.image_url.as_deref(), self.image_filename.as_deref())
        } else {
            None
        };

        let uploaded_image = ImageRef::renderable(
            self.user_image_path.as_deref(),
            self.user_image_filename.as_deref(),
        );

        Ok(AssistantReply {
            text: non_empty(self.response).unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string()),
            image,
            conversation_id: non_empty(self.conversation_id),
            uploaded_image,
        })
    }
}

/// Reply of `GET /api/chat/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusBody {
    #[serde(default)]
    pub ava_status: Option<String>,
}

/// Availability of the assistant backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceStatus {
    pub online: bool,
}

impl From<StatusBody> for ServiceStatus {
    fn from(body: StatusBody) -> Self {
        Self {
            online: body.ava_status.as_deref() == Some(STATUS_RUNNING),
        }
    }
}

/// One row of `GET /api/conversations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationRecord {
    pub rowid: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Reply of `GET /api/conversations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationListBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub conversations: Vec<ConversationRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub error: Option<String>,
}

impl ConversationListBody {
    pub fn into_page(self, page: u32) -> Result<ConversationPage, TransportError> {
        if !self.success {
            let message = non_empty(self.error)
                .unwrap_or_else(|| "No conversations available".to_string());
            return Err(TransportError::Application(message));
        }
        Ok(ConversationPage {
            page,
            total: self.total,
            rows: self
                .conversations
                .into_iter()
                .map(ConversationSummary::from)
                .collect(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
