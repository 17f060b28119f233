//! HTTP adapter for the travel chat backend.
//!
//! Uses browser `fetch()` via gloo-net for WASM compatibility.
//! Every failure mode (network, non-2xx, undecodable body, timeout) comes
//! back as an `Err`; the controller decides what the user sees.

use std::future::Future;
use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;

use chat_core::ports::ChatBackendPort;
use chat_types::{
    ChatError, Result,
    config::BackendConfig,
    wire::{ChatReply, ChatRequest, HealthStatus},
};

pub struct HttpChatBackend {
    config: BackendConfig,
}

impl HttpChatBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn post_chat(&self, req: &ChatRequest) -> Result<ChatReply> {
        let response = Request::post(&self.config.chat_url())
            .json(req)
            .map_err(|e| ChatError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let body = read_body(response).await?;
        log::debug!("Response from server: {}", body);

        serde_json::from_str(&body).map_err(|e| ChatError::MalformedReply(e.to_string()))
    }

    async fn get_health(&self) -> Result<HealthStatus> {
        let response = Request::get(&self.config.health_url())
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let body = read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ChatError::MalformedReply(e.to_string()))
    }
}

#[async_trait(?Send)]
impl ChatBackendPort for HttpChatBackend {
    async fn send(&self, req: &ChatRequest) -> Result<ChatReply> {
        with_timeout(self.config.request_timeout_ms, self.post_chat(req)).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        with_timeout(self.config.request_timeout_ms, self.get_health()).await
    }
}

/// Race `fut` against `timeout_ms`; `None` waits for `fut` however long it takes.
pub async fn with_timeout<T>(
    timeout_ms: Option<u64>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(ms) = timeout_ms else {
        return fut.await;
    };

    let timer = TimeoutFuture::new(u32::try_from(ms).unwrap_or(u32::MAX));
    match select(Box::pin(fut), Box::pin(timer)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(ChatError::Timeout(ms)),
    }
}

/// Body text of a 2xx response; anything else becomes `ChatError::Http`.
pub fn check_status(status: u16, body: String) -> Result<String> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(ChatError::Http { status, body })
    }
}

async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    match response.text().await {
        Ok(body) => check_status(status, body),
        Err(_) if !response.ok() => check_status(status, "unknown error".to_string()),
        Err(e) => Err(ChatError::Network(e.to_string())),
    }
}
