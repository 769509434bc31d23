//! Client configuration for the Blogline API and realtime channel.

use std::time::Duration;

/// Configuration for the HTTP API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://blogline.example` or an
    /// empty-origin relative deployment behind the same host.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Configuration for the realtime connection.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Origin the websocket connects to, e.g. `wss://blogline.example`.
    pub origin: String,
    /// Handshake path on the origin.
    pub path: String,
    /// Handshake timeout.
    pub handshake_timeout: Duration,
    /// Interval between heartbeat emits while connected.
    pub heartbeat_interval: Duration,
    /// Transport-level reconnection attempts before giving up.
    pub reconnect_attempts: u8,
    /// Fixed delay between reconnection attempts.
    pub reconnect_delay: Duration,
    /// Delay before the single emit retry when not yet connected.
    pub emit_retry_delay: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            origin: "ws://127.0.0.1:5001".to_string(),
            path: "/socket.io/".to_string(),
            handshake_timeout: Duration::from_secs(30),
            heartbeat_interval: Duration::from_secs(30),
            reconnect_attempts: 5,
            reconnect_delay: Duration::from_secs(5),
            emit_retry_delay: Duration::from_secs(1),
        }
    }
}

impl RealtimeConfig {
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }
}
