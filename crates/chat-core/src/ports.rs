//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use chat_types::{
    Result,
    wire::{ChatReply, ChatRequest, HealthStatus},
};

// ─── Storage Port ────────────────────────────────────────────

/// Durable client-side key-value store holding plain strings.
#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Chat Backend Port ───────────────────────────────────────

#[async_trait(?Send)]
pub trait ChatBackendPort {
    /// One request/response round-trip for a user turn.
    /// Any non-2xx status or undecodable body comes back as `Err`.
    async fn send(&self, req: &ChatRequest) -> Result<ChatReply>;

    /// Liveness probe of the backend
    async fn health(&self) -> Result<HealthStatus>;
}
