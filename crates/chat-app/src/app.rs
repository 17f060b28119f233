//! JavaScript-facing wrapper around the chat controller.
//!
//! The page reads `snapshot()` to render and calls the actions; it should
//! `subscribe` to re-render whenever the controller emits an event.
//! Async actions return Promises and never reject for chat failures, which
//! show up as transcript content instead.

use std::rc::Rc;

use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use chat_core::event_bus::EventBus;
use chat_core::{ChatSessionController, Rejection, TurnOutcome};
use chat_platform::backend::HttpChatBackend;
use chat_platform::storage::auto_detect_storage;
use chat_types::{ChatError, config::ChatConfig};

#[wasm_bindgen]
pub struct TravelChat {
    controller: Rc<ChatSessionController>,
}

#[wasm_bindgen]
impl TravelChat {
    /// `config` is an optional plain object; omitted fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TravelChat, JsError> {
        let config = parse_config(&config).map_err(|e| JsError::new(&e.to_string()))?;
        log::info!("Chat endpoint: {}", config.backend.chat_url());

        let storage = auto_detect_storage();
        let backend = Rc::new(HttpChatBackend::new(config.backend.clone()));
        let controller = ChatSessionController::new(config, storage, backend, EventBus::new());

        Ok(Self {
            controller: Rc::new(controller),
        })
    }

    /// Resolves with the session id once the identity is ready.
    pub fn initialize(&self) -> Promise {
        let controller = self.controller.clone();
        future_to_promise(async move {
            let session_id = controller.initialize().await;
            Ok(JsValue::from_str(&session_id))
        })
    }

    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&self, text: String) {
        self.controller.set_input(text);
    }

    /// Resolves with the outcome label, e.g. `"answered"` or `"rejected:busy"`.
    pub fn submit(&self) -> Promise {
        let controller = self.controller.clone();
        future_to_promise(async move {
            let outcome = controller.submit().await;
            Ok(JsValue::from_str(outcome_label(outcome)))
        })
    }

    #[wasm_bindgen(js_name = sendMessage)]
    pub fn send_message(&self, text: String) -> Promise {
        let controller = self.controller.clone();
        future_to_promise(async move {
            let outcome = controller.send_message(&text).await;
            Ok(JsValue::from_str(outcome_label(outcome)))
        })
    }

    /// Resolves with the new session id.
    #[wasm_bindgen(js_name = resetSession)]
    pub fn reset_session(&self) -> Promise {
        let controller = self.controller.clone();
        future_to_promise(async move {
            let session_id = controller.reset_session().await;
            Ok(JsValue::from_str(&session_id))
        })
    }

    /// `{ input, transcript: [{ id, role, content }], pending, session_token }`
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        JsValue::from_serde(&self.controller.snapshot()).map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> bool {
        self.controller.is_pending()
    }

    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.controller.is_ready()
    }

    /// Call `callback(event)` synchronously for every controller event.
    pub fn subscribe(&self, callback: Function) {
        self.controller.event_bus().subscribe(move |event| {
            let value = match JsValue::from_serde(event) {
                Ok(v) => v,
                Err(e) => {
                    log::error!("Could not convert event for JS: {}", e);
                    return;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::error!("Event subscriber threw: {:?}", e);
            }
        });
    }

    /// Buffered events since the last drain, for polling consumers.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsError> {
        let events = self.controller.event_bus().drain();
        JsValue::from_serde(&events).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Resolves with the backend's health body; rejects if unreachable.
    #[wasm_bindgen(js_name = healthCheck)]
    pub fn health_check(&self) -> Promise {
        let controller = self.controller.clone();
        future_to_promise(async move {
            let health = controller
                .health()
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            JsValue::from_serde(&health).map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }
}

fn parse_config(value: &JsValue) -> Result<ChatConfig, ChatError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ChatConfig::default());
    }
    value
        .into_serde()
        .map_err(|e| ChatError::Config(e.to_string()))
}

fn outcome_label(outcome: TurnOutcome) -> &'static str {
    match outcome {
        TurnOutcome::Answered => "answered",
        TurnOutcome::Unclassified => "unclassified",
        TurnOutcome::Failed => "failed",
        TurnOutcome::Stale => "stale",
        TurnOutcome::Rejected(Rejection::NotReady) => "rejected:not_ready",
        TurnOutcome::Rejected(Rejection::EmptyInput) => "rejected:empty_input",
        TurnOutcome::Rejected(Rejection::Busy) => "rejected:busy",
    }
}
