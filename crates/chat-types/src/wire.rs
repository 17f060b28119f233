//! JSON bodies exchanged with the chat backend.
//!
//!   POST /chat    {"message": "...", "session_id": "..."}
//!             ->  {"intent": <any>?, "response": "..."}
//!   GET  /health  ->  {"status": "...", "timestamp": "...", "service": "..."}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ChatError, Result};

/// Outbound body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.into(),
        }
    }
}

/// Success body of `POST /chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// What a well-formed reply means for the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    /// The backend classified the intent; show its text verbatim
    Answer(String),
    /// No intent marker; show the fixed fallback instead
    Unclassified,
}

impl ChatReply {
    pub fn answer(intent: impl Into<Value>, response: impl Into<String>) -> Self {
        Self {
            intent: Some(intent.into()),
            response: Some(response.into()),
        }
    }

    pub fn has_intent(&self) -> bool {
        self.intent.as_ref().is_some_and(is_truthy)
    }

    /// Classify the reply. An intent without a `response` string is malformed.
    pub fn into_content(self) -> Result<ReplyContent> {
        if !self.has_intent() {
            return Ok(ReplyContent::Unclassified);
        }
        self.response
            .map(ReplyContent::Answer)
            .ok_or_else(|| ChatError::MalformedReply("intent present but no response".to_string()))
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Truthiness as the backend's JSON producers understand it:
/// null, false, 0 and "" do not count as an intent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
