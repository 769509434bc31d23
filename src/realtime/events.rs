//! Realtime event types exchanged over the chat channel.
//!
//! Events travel as JSON frames of the form `{"event": ..., "data": ...}`,
//! matching the server's socket handler names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events the client emits to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutgoingEvent {
    /// Liveness ping, emitted on a fixed interval while connected.
    Heartbeat,
    /// Open a conversation with another user.
    EnterChat { target_id: String },
    /// Send a chat message to the active conversation.
    SendMessage { receiver_id: String, content: String },
}

/// A chat message as delivered by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Events the client receives from the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum IncomingEvent {
    /// Handshake acknowledgement.
    Connected,
    /// Server confirmed delivery of a sent message.
    MessageSent { receiver_id: String },
    /// A chat message arrived.
    NewMessage(ChatMessage),
    /// A notification push (comment, like, follow, system).
    NewNotification(Value),
    /// Heartbeat echo.
    HeartbeatAck,
    /// Synthesized by the transport when the connection drops; never
    /// parsed off the wire.
    #[serde(skip)]
    Disconnected { reason: String },
}
