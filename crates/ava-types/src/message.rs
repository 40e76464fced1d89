use serde::{Deserialize, Serialize};

/// Who authored a thread entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// CSS modifier used by the rendered message container
    pub fn css_class(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// Reference to an image shown in (or uploaded to) the thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Retrieval path, e.g. `/api/chat/image/<filename>`
    pub url: String,
    /// Display / download name
    pub filename: String,
    /// Name of the file as picked by the user, for uploads only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_filename: Option<String>,
}

impl ImageRef {
    /// Build a reference only when both url and filename are usable.
    pub fn renderable(url: Option<&str>, filename: Option<&str>) -> Option<Self> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        let filename = filename.map(str::trim).filter(|f| !f.is_empty())?;
        Some(Self {
            url: url.to_string(),
            filename: filename.to_string(),
            original_filename: None,
        })
    }

    pub fn with_original_filename(mut self, name: impl Into<String>) -> Self {
        self.original_filename = Some(name.into());
        self
    }
}

/// Content of a thread entry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    WithImage { text: String, image: ImageRef },
    Text { text: String },
}

impl MessageBody {
    pub fn text(&self) -> &str {
        match self {
            MessageBody::Text { text } | MessageBody::WithImage { text, .. } => text,
        }
    }

    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            MessageBody::WithImage { image, .. } => Some(image),
            MessageBody::Text { .. } => None,
        }
    }
}

/// A single displayed chat entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub body: MessageBody,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            body: MessageBody::Text { text: text.into() },
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            body: MessageBody::Text { text: text.into() },
        }
    }

    /// Text plus an optional image; a missing image degrades to text-only.
    pub fn with_image(sender: Sender, text: impl Into<String>, image: Option<ImageRef>) -> Self {
        let text = text.into();
        let body = match image {
            Some(image) => MessageBody::WithImage { text, image },
            None => MessageBody::Text { text },
        };
        Self { sender, body }
    }

    pub fn text(&self) -> &str {
        self.body.text()
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.body.image()
    }
}
