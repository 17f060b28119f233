use serde::{Deserialize, Serialize};
use crate::message::Message;

/// Events emitted by the chat controller.
/// The presentation layer subscribes to these to know when to re-render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatEvent {
    /// Session identity is ready; submissions are now accepted
    SessionReady { session_id: String },

    /// A new conversation was started with a fresh identity
    SessionReset { session_id: String },

    /// A request round-trip started; `pending` is now true
    TurnStart { turn_id: u64 },

    /// A message was appended to the transcript
    MessageAppended { message: Message },

    /// The round-trip settled; `pending` cleared and input emptied
    TurnEnd { turn_id: u64 },

    /// A submission was refused before anything was appended
    Rejected { reason: String },

    /// The request failed; the user only sees the fixed error reply
    TransportError { message: String },

    /// A reply arrived for a conversation that has since been reset
    StaleReply { turn_id: u64 },
}
