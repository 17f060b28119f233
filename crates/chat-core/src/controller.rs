//! Chat session controller — one request/response round-trip per user turn.
//!
//! `send_message` runs in two clearly ordered phases:
//! 1. Append the user's turn and raise `pending` (optimistic, before any I/O)
//! 2. Await the backend, then append exactly one assistant turn:
//!    the reply text, the fallback text (no intent), or the error text
//! 3. Clear `pending` and the input buffer, whatever happened in step 2
//!
//! Nothing escapes as an error: failures become transcript content plus a
//! diagnostic log line and a `ChatEvent`.

use std::cell::RefCell;
use std::rc::Rc;

use futures::lock::Mutex;
use serde::Serialize;

use chat_types::{
    Result,
    config::{ChatConfig, OverlapPolicy, StaleReplyPolicy},
    event::ChatEvent,
    message::Message,
    wire::{ChatReply, ChatRequest, HealthStatus, ReplyContent},
};
use crate::event_bus::EventBus;
use crate::identity::SessionIdentity;
use crate::ports::{ChatBackendPort, StoragePort};

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatSnapshot {
    pub input: String,
    pub transcript: Vec<Message>,
    pub pending: bool,
    pub session_token: Option<String>,
}

/// Why a submission was refused before anything was appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Session identity has not finished initializing
    NotReady,
    /// Input buffer was blank after trimming
    EmptyInput,
    /// Another request is in flight and the overlap policy is `Reject`
    Busy,
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::NotReady => "Session not initialized yet",
            Rejection::EmptyInput => "Nothing to send",
            Rejection::Busy => "A request is already in flight",
        }
    }
}

/// Which branch of the turn state machine ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Backend classified the intent; its text was appended verbatim
    Answered,
    /// No intent in the reply; the fallback text was appended
    Unclassified,
    /// Transport or parse failure; the error text was appended
    Failed,
    /// The session was reset mid-flight and the reply was dropped
    Stale,
    Rejected(Rejection),
}

#[derive(Default)]
struct ChatState {
    input: String,
    transcript: Vec<Message>,
    in_flight: usize,
    /// Bumped on every reset so late replies can be recognized
    generation: u64,
    turn_counter: u64,
}

pub struct ChatSessionController {
    config: ChatConfig,
    identity: SessionIdentity,
    backend: Rc<dyn ChatBackendPort>,
    event_bus: EventBus,
    state: RefCell<ChatState>,
    /// Single request slot; held for the whole round-trip
    slot: Mutex<()>,
}

impl ChatSessionController {
    pub fn new(
        config: ChatConfig,
        storage: Rc<dyn StoragePort>,
        backend: Rc<dyn ChatBackendPort>,
        event_bus: EventBus,
    ) -> Self {
        let identity = SessionIdentity::new(storage, config.storage_key.clone());
        Self {
            config,
            identity,
            backend,
            event_bus,
            state: RefCell::new(ChatState::default()),
            slot: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ─── State ───────────────────────────────────────────────

    pub fn snapshot(&self) -> ChatSnapshot {
        let state = self.state.borrow();
        ChatSnapshot {
            input: state.input.clone(),
            transcript: state.transcript.clone(),
            pending: state.in_flight > 0,
            session_token: self.identity.token(),
        }
    }

    pub fn input(&self) -> String {
        self.state.borrow().input.clone()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.state.borrow().transcript.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().in_flight > 0
    }

    pub fn session_token(&self) -> Option<String> {
        self.identity.token()
    }

    pub fn is_ready(&self) -> bool {
        self.identity.is_ready()
    }

    // ─── Actions ─────────────────────────────────────────────

    /// Obtain the session identity. Submissions are refused until this ran.
    pub async fn initialize(&self) -> String {
        let session_id = self.identity.initialize().await;
        self.event_bus.emit(ChatEvent::SessionReady {
            session_id: session_id.clone(),
        });
        session_id
    }

    /// Replace the input buffer verbatim.
    pub fn set_input(&self, text: impl Into<String>) {
        self.state.borrow_mut().input = text.into();
    }

    /// Send the trimmed input buffer, if there is anything to send.
    pub async fn submit(&self) -> TurnOutcome {
        let text = self.state.borrow().input.trim().to_string();
        if text.is_empty() {
            return self.reject(Rejection::EmptyInput);
        }
        if !self.is_ready() {
            return self.reject(Rejection::NotReady);
        }
        self.send_message(&text).await
    }

    /// Run one user turn against the backend.
    pub async fn send_message(&self, text: &str) -> TurnOutcome {
        if !self.is_ready() {
            return self.reject(Rejection::NotReady);
        }

        let _slot = match self.config.overlap {
            OverlapPolicy::Reject => match self.slot.try_lock() {
                Some(guard) => guard,
                None => return self.reject(Rejection::Busy),
            },
            OverlapPolicy::Queue => self.slot.lock().await,
        };

        // Phase 1: optimistic append
        let (turn, request) = self.begin_turn(text);
        log::debug!("Sending turn {} for session {}", turn.turn_id, request.session_id);

        // Phase 2: round-trip
        let result = self
            .backend
            .send(&request)
            .await
            .and_then(ChatReply::into_content);

        let (outcome, reply_text) = match result {
            Ok(ReplyContent::Answer(text)) => (TurnOutcome::Answered, text),
            Ok(ReplyContent::Unclassified) => {
                log::info!("Reply carried no intent, using fallback");
                (TurnOutcome::Unclassified, self.config.fallback_text.clone())
            }
            Err(e) => {
                log::error!("Chat request failed: {}", e);
                self.event_bus.emit(ChatEvent::TransportError {
                    message: e.to_string(),
                });
                (TurnOutcome::Failed, self.config.error_text.clone())
            }
        };

        let stale = self.state.borrow().generation != turn.generation;
        if stale && self.config.stale_replies == StaleReplyPolicy::Discard {
            log::warn!("Dropping reply for turn {}: session was reset", turn.turn_id);
            self.event_bus.emit(ChatEvent::StaleReply { turn_id: turn.turn_id });
            return TurnOutcome::Stale;
        }

        // Phase 3 runs when `turn` drops on the way out
        self.append(Message::assistant(reply_text));
        outcome
    }

    /// Start an unrelated conversation. In-flight requests are not cancelled.
    pub async fn reset_session(&self) -> String {
        let session_id = self.identity.reset().await;
        {
            let mut state = self.state.borrow_mut();
            state.transcript.clear();
            state.generation += 1;
        }
        self.event_bus.emit(ChatEvent::SessionReset {
            session_id: session_id.clone(),
        });
        session_id
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.backend.health().await
    }

    // ─── Internals ───────────────────────────────────────────

    fn begin_turn(&self, text: &str) -> (PendingTurn<'_>, ChatRequest) {
        let session_id = self.identity.token().unwrap_or_default();
        let message = Message::user(text);
        let (turn_id, generation) = {
            let mut state = self.state.borrow_mut();
            state.transcript.push(message.clone());
            state.in_flight += 1;
            state.turn_counter += 1;
            (state.turn_counter, state.generation)
        };
        self.event_bus.emit(ChatEvent::MessageAppended { message });
        self.event_bus.emit(ChatEvent::TurnStart { turn_id });

        let turn = PendingTurn {
            controller: self,
            turn_id,
            generation,
        };
        (turn, ChatRequest::new(text, session_id))
    }

    fn finish_turn(&self, turn_id: u64) {
        {
            let mut state = self.state.borrow_mut();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.input.clear();
        }
        self.event_bus.emit(ChatEvent::TurnEnd { turn_id });
    }

    fn append(&self, message: Message) {
        self.state.borrow_mut().transcript.push(message.clone());
        self.event_bus.emit(ChatEvent::MessageAppended { message });
    }

    fn reject(&self, rejection: Rejection) -> TurnOutcome {
        log::warn!("{}", rejection.reason());
        self.event_bus.emit(ChatEvent::Rejected {
            reason: rejection.reason().to_string(),
        });
        TurnOutcome::Rejected(rejection)
    }
}

/// An outstanding round-trip. Dropping it clears `pending` and the input
/// buffer, so cleanup runs exactly once on every exit path, including a
/// caller dropping the future mid-request.
struct PendingTurn<'a> {
    controller: &'a ChatSessionController,
    turn_id: u64,
    generation: u64,
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        self.controller.finish_turn(self.turn_id);
    }
}
