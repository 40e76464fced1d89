use thiserror::Error;

/// Client-side precondition failures for image uploads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file has no name")]
    EmptyFileName,

    #[error("not an image: {mime_type}")]
    NotAnImage { mime_type: String },

    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::EmptyFileName => "The selected file is empty.".to_string(),
            ValidationError::NotAnImage { .. } => {
                "Please select an image file (JPG, PNG, GIF or WebP).".to_string()
            }
            ValidationError::TooLarge { limit, .. } => format!(
                "The image is too large. The maximum size is {} MB.",
                limit / (1024 * 1024)
            ),
        }
    }
}

/// Everything that can end one exchange with the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Application error: {0}")]
    Application(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl TransportError {
    /// Status the backend uses to bounce unauthenticated callers to the login page.
    pub const LOGIN_REDIRECT: u16 = 302;

    pub fn login_redirect() -> Self {
        TransportError::Http {
            status: Self::LOGIN_REDIRECT,
            status_text: "Found".to_string(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, TransportError::Http { status, .. } if *status == Self::LOGIN_REDIRECT)
    }

    /// Fixed sentence appended to the thread for this failure.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Network(_) => {
                "🔌 Could not reach the server. Check your internet connection.".to_string()
            }
            TransportError::Http { status: 500..=599, .. } => {
                "⚠️ Internal server error. AVA may be restarting.".to_string()
            }
            TransportError::Http { status: 404, .. } => {
                "🔍 Service not found. Contact the administrator.".to_string()
            }
            TransportError::Http { status: Self::LOGIN_REDIRECT, .. } => {
                "🔒 Your session has expired. Please sign in again.".to_string()
            }
            TransportError::Http { status, .. } => {
                format!("❌ The server answered with HTTP {}.", status)
            }
            TransportError::Parse(_) => "📄 The server response had an invalid format.".to_string(),
            TransportError::Application(message) => format!("❌ {}", message),
            TransportError::Validation(e) => format!("⚠️ {}", e.user_message()),
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Parse(e.to_string())
    }
}
