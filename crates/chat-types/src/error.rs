use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl ChatError {
    /// Errors that the controller folds into the fixed error reply.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChatError::Network(_)
                | ChatError::Http { .. }
                | ChatError::MalformedReply(_)
                | ChatError::Timeout(_)
                | ChatError::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
