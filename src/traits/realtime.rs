//! Realtime transport trait abstraction.
//!
//! Abstracts the websocket transport so the connection manager can be
//! driven by the production tungstenite adapter or a mock in tests.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::realtime::events::{IncomingEvent, OutgoingEvent};

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("not connected")]
    NotConnected,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),
}

/// Parameters for opening a realtime connection.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    /// Full websocket URL including the handshake path and query string.
    pub url: String,
    /// Access token, sent verbatim in the first auth frame. The same token
    /// is already embedded in the URL query for transports that cannot
    /// carry an auth frame.
    pub token: Option<String>,
    /// Handshake timeout.
    pub handshake_timeout: Duration,
}

/// Trait for opening realtime connections.
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Open a connection. Resolves once the transport handshake completes.
    async fn connect(
        &self,
        request: ConnectRequest,
    ) -> Result<Arc<dyn TransportHandle>, TransportError>;
}

/// A live transport connection.
///
/// Incoming events are fanned out over a broadcast channel so the manager
/// and any observer (tests, debug tooling) can subscribe independently.
#[async_trait]
pub trait TransportHandle: Send + Sync {
    /// Emit a domain event to the server.
    async fn emit(&self, event: OutgoingEvent) -> Result<(), TransportError>;

    /// Whether the underlying transport currently reports itself connected.
    fn is_connected(&self) -> bool;

    /// Subscribe to incoming events.
    fn subscribe(&self) -> broadcast::Receiver<IncomingEvent>;

    /// Close the transport. Safe to call more than once.
    fn close(&self);
}
