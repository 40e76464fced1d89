use serde::{Deserialize, Serialize};

/// Top-level widget configuration.
/// Read from the `data-ava-config` attribute of the mount element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Prefix for every backend path; empty means same origin
    pub api_base: String,
    pub assistant_name: String,
    pub greeting: String,
    /// Prompt sent with image uploads instead of the file name
    pub caption_prompt: String,
    pub status_poll_interval_ms: u32,
    pub max_upload_bytes: u64,
    pub page_size: u32,
    pub log_level: LogLevel,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            assistant_name: "AVA".to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            caption_prompt: DEFAULT_CAPTION_PROMPT.to_string(),
            status_poll_interval_ms: 30_000,
            max_upload_bytes: 5 * 1024 * 1024,
            page_size: 20,
            log_level: LogLevel::Info,
        }
    }
}

impl WidgetConfig {
    /// Parse a JSON config blob; unknown keys are ignored and missing ones defaulted.
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.api_base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Backend routes, all derived from one base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn status(&self) -> String {
        format!("{}/api/chat/status", self.base)
    }

    pub fn message(&self) -> String {
        format!("{}/api/chat/message", self.base)
    }

    pub fn image_analysis(&self) -> String {
        format!("{}/api/chat/image-analysis", self.base)
    }

    pub fn conversations(&self) -> String {
        format!("{}/api/conversations", self.base)
    }

    pub fn conversation_detail(&self, id: i64) -> String {
        format!("{}/conversation/{}", self.base, id)
    }

    pub fn login(&self) -> String {
        format!("{}/login", self.base)
    }
}

const DEFAULT_GREETING: &str = "Hi! I'm AVA, your virtual assistant. How can I help you?";

const DEFAULT_CAPTION_PROMPT: &str =
    "Analyze this image and describe what you see in detail.";
