//! The realtime connection manager.
//!
//! Maintains at most one authenticated realtime channel per session. The
//! connection is opened on login and closed on logout; a fixed-interval
//! heartbeat keeps liveness visible to the server while the transport
//! reports itself connected.

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RealtimeConfig;
use crate::session::SessionStore;
use crate::traits::{ConnectRequest, RealtimeTransport, TransportError, TransportHandle};

use super::events::{IncomingEvent, OutgoingEvent};

struct Connection {
    handle: Arc<dyn TransportHandle>,
    heartbeat: JoinHandle<()>,
    pump: JoinHandle<()>,
}

/// Singleton-per-session realtime channel.
pub struct RealtimeManager {
    config: RealtimeConfig,
    transport: Arc<dyn RealtimeTransport>,
    session: Arc<SessionStore>,
    conn: Mutex<Option<Connection>>,
    active_chat: std::sync::Mutex<Option<String>>,
    /// Fan-out of domain events to application subscribers.
    events_tx: broadcast::Sender<IncomingEvent>,
}

impl RealtimeManager {
    pub fn new(
        config: RealtimeConfig,
        transport: Arc<dyn RealtimeTransport>,
        session: Arc<SessionStore>,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            config,
            transport,
            session,
            conn: Mutex::new(None),
            active_chat: std::sync::Mutex::new(None),
            events_tx,
        }
    }

    /// Open the connection. A no-op when a handle already exists, so event
    /// handlers are registered exactly once per connection.
    pub async fn connect(&self) -> Result<(), TransportError> {
        let mut conn = self.conn.lock().await;
        if conn.is_some() {
            debug!("connect called while already connected, ignoring");
            return Ok(());
        }

        let token = self.session.access_token();
        let request = ConnectRequest {
            url: self.build_url(token.as_deref()),
            token,
            handshake_timeout: self.config.handshake_timeout,
        };
        let handle = self.transport.connect(request).await?;
        info!("realtime channel connected");

        let pump = tokio::spawn(pump_events(handle.subscribe(), self.events_tx.clone()));
        let heartbeat = tokio::spawn(heartbeat_loop(
            handle.clone(),
            self.config.heartbeat_interval,
        ));

        *conn = Some(Connection {
            handle,
            heartbeat,
            pump,
        });
        Ok(())
    }

    /// Close the connection. Safe to call when not connected, and safe to
    /// call more than once.
    pub async fn disconnect(&self) {
        let mut conn = self.conn.lock().await;
        if let Some(connection) = conn.take() {
            connection.heartbeat.abort();
            connection.pump.abort();
            connection.handle.close();
            info!("realtime channel disconnected");
        }
    }

    /// Whether a live, connected handle exists.
    pub async fn is_connected(&self) -> bool {
        self.connected_handle().await.is_some()
    }

    /// Subscribe to domain events (new messages, notifications).
    pub fn subscribe(&self) -> broadcast::Receiver<IncomingEvent> {
        self.events_tx.subscribe()
    }

    /// Open a conversation with the given user.
    pub async fn enter_chat(&self, target_id: &str) -> Result<(), TransportError> {
        *self
            .active_chat
            .lock()
            .expect("active chat lock poisoned") = Some(target_id.to_string());
        debug!(target_id, "entering chat");
        self.emit_or_retry(OutgoingEvent::EnterChat {
            target_id: target_id.to_string(),
        })
        .await
    }

    /// Send a chat message to the active conversation.
    ///
    /// Empty and whitespace-only content never emits. `on_local_ack` runs
    /// immediately after the emit for optimistic UI updates; true delivery
    /// confirmation arrives later as [`IncomingEvent::MessageSent`].
    ///
    /// Returns whether an event was emitted.
    pub async fn send_message(
        &self,
        content: &str,
        on_local_ack: impl FnOnce() + Send,
    ) -> Result<bool, TransportError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(false);
        }
        let receiver_id = match self
            .active_chat
            .lock()
            .expect("active chat lock poisoned")
            .clone()
        {
            Some(id) => id,
            None => return Ok(false),
        };

        self.emit_or_retry(OutgoingEvent::SendMessage {
            receiver_id,
            content: content.to_string(),
        })
        .await?;
        on_local_ack();
        Ok(true)
    }

    /// Emit immediately when connected; otherwise trigger `connect()` and
    /// retry exactly once after the configured delay.
    async fn emit_or_retry(&self, event: OutgoingEvent) -> Result<(), TransportError> {
        if let Some(handle) = self.connected_handle().await {
            return handle.emit(event).await;
        }

        if let Err(e) = self.connect().await {
            warn!("connect before retry failed: {}", e);
        }
        tokio::time::sleep(self.config.emit_retry_delay).await;

        match self.connected_handle().await {
            Some(handle) => handle.emit(event).await,
            None => Err(TransportError::NotConnected),
        }
    }

    async fn connected_handle(&self) -> Option<Arc<dyn TransportHandle>> {
        let conn = self.conn.lock().await;
        conn.as_ref()
            .filter(|c| c.handle.is_connected())
            .map(|c| c.handle.clone())
    }

    fn build_url(&self, token: Option<&str>) -> String {
        let origin = self.config.origin.trim_end_matches('/');
        let origin = if let Some(rest) = origin.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = origin.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            origin.to_string()
        };
        match token {
            Some(token) => format!(
                "{}{}?token={}",
                origin,
                self.config.path,
                urlencoding::encode(token)
            ),
            None => format!("{}{}", origin, self.config.path),
        }
    }
}

/// Emit a heartbeat on a fixed interval while the transport is connected.
async fn heartbeat_loop(handle: Arc<dyn TransportHandle>, interval: std::time::Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The immediate first tick is not a heartbeat.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if handle.is_connected() {
            if let Err(e) = handle.emit(OutgoingEvent::Heartbeat).await {
                warn!("heartbeat emit failed: {}", e);
            }
        }
    }
}

/// Forward domain events to subscribers; lifecycle events only log.
async fn pump_events(
    mut rx: broadcast::Receiver<IncomingEvent>,
    events_tx: broadcast::Sender<IncomingEvent>,
) {
    loop {
        match rx.recv().await {
            Ok(IncomingEvent::Connected) => debug!("server confirmed connection"),
            Ok(IncomingEvent::HeartbeatAck) => debug!("heartbeat acknowledged"),
            Ok(IncomingEvent::MessageSent { receiver_id }) => {
                debug!(receiver_id, "message delivery confirmed");
                let _ = events_tx.send(IncomingEvent::MessageSent { receiver_id });
            }
            Ok(IncomingEvent::Disconnected { reason }) => {
                warn!(reason, "transport reported disconnect");
            }
            Ok(event) => {
                let _ = events_tx.send(event);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event pump lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
