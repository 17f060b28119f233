use serde::{Deserialize, Serialize};

/// Top-level controller configuration.
///
/// Deserialized from whatever the host page hands over; every field has a
/// default so a partial (or empty) object is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Endpoint fields sit at the top level of the host's object
    #[serde(flatten)]
    pub backend: BackendConfig,
    /// Durable key under which the session token is stored
    pub storage_key: String,
    pub overlap: OverlapPolicy,
    pub stale_replies: StaleReplyPolicy,
    /// Reply substituted when the backend returns no intent
    pub fallback_text: String,
    /// Reply substituted on any transport failure
    pub error_text: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            overlap: OverlapPolicy::default(),
            stale_replies: StaleReplyPolicy::default(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            error_text: DEFAULT_ERROR_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Empty means same origin as the page
    pub api_base: String,
    pub chat_path: String,
    pub health_path: String,
    /// `None` waits for the request to settle, however long that takes
    pub request_timeout_ms: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            chat_path: "/chat".to_string(),
            health_path: "/health".to_string(),
            request_timeout_ms: None,
        }
    }
}

impl BackendConfig {
    pub fn chat_url(&self) -> String {
        join_url(&self.api_base, &self.chat_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.api_base, &self.health_path)
    }
}

/// What `send_message` does when another request is still in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the new call without touching the transcript
    #[default]
    Reject,
    /// Wait for the in-flight request, then run
    Queue,
}

/// What happens to a reply whose request predates a session reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleReplyPolicy {
    #[default]
    Discard,
    Apply,
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

pub const DEFAULT_STORAGE_KEY: &str = "travel_chat_session_id";

pub const DEFAULT_ERROR_TEXT: &str = "❌ Something went wrong.";

pub const DEFAULT_FALLBACK_TEXT: &str = "🤔 Hmm, I'm still learning how to help with that!

Here are some things you can ask me:
• 🔥 Events happening in Lagos
• 🏠 Where to stay
• 🧳 Help me plan my trip in Lekki
• 👗 Outfit suggestions

What would you like to explore next?";
