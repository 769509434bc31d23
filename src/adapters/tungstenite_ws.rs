//! Production realtime transport backed by tokio-tungstenite.
//!
//! Frames are JSON events. The access token travels in the connection URL
//! query (set by the manager) and again as the first frame after every
//! successful handshake, for servers that cannot read handshake queries.
//!
//! Transport-level reconnection is handled here: a bounded number of
//! attempts with a fixed delay between them. When attempts run out the
//! handle reports disconnected and emits a synthesized
//! [`IncomingEvent::Disconnected`]; escalation beyond logging is not this
//! layer's job.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::realtime::events::{IncomingEvent, OutgoingEvent};
use crate::traits::{ConnectRequest, RealtimeTransport, TransportError, TransportHandle};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Reconnection policy applied by the connection loop.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub attempts: u8,
    pub delay: Duration,
}

/// Websocket transport factory.
pub struct TungsteniteTransport {
    policy: ReconnectPolicy,
}

impl TungsteniteTransport {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl RealtimeTransport for TungsteniteTransport {
    async fn connect(
        &self,
        request: ConnectRequest,
    ) -> Result<Arc<dyn TransportHandle>, TransportError> {
        let connected = tokio::time::timeout(request.handshake_timeout, connect_async(&request.url))
            .await
            .map_err(|_| TransportError::HandshakeTimeout(request.handshake_timeout))?
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        info!(url = %request.url, "realtime transport connected");

        let (mut sink, stream) = connected.0.split();
        if let Some(frame) = auth_frame(request.token.as_deref()) {
            sink.send(Message::Text(frame))
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        }

        let (outgoing_tx, outgoing_rx) = mpsc::channel::<OutgoingEvent>(64);
        let (incoming_tx, _) = broadcast::channel::<IncomingEvent>(64);
        let is_connected = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(AtomicBool::new(false));

        tokio::spawn(run_connection_loop(
            request,
            self.policy.clone(),
            sink,
            stream,
            outgoing_rx,
            incoming_tx.clone(),
            is_connected.clone(),
            shutdown.clone(),
        ));

        Ok(Arc::new(TungsteniteHandle {
            outgoing_tx,
            incoming_tx,
            is_connected,
            shutdown,
        }))
    }
}

/// Handle to a live tungstenite connection.
pub struct TungsteniteHandle {
    outgoing_tx: mpsc::Sender<OutgoingEvent>,
    incoming_tx: broadcast::Sender<IncomingEvent>,
    is_connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

#[async_trait]
impl TransportHandle for TungsteniteHandle {
    async fn emit(&self, event: OutgoingEvent) -> Result<(), TransportError> {
        self.outgoing_tx
            .send(event)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> broadcast::Receiver<IncomingEvent> {
        self.incoming_tx.subscribe()
    }

    fn close(&self) {
        debug!("closing realtime transport");
        self.shutdown.store(true, Ordering::SeqCst);
        self.is_connected.store(false, Ordering::SeqCst);
    }
}

impl Drop for TungsteniteHandle {
    fn drop(&mut self) {
        self.close();
    }
}

fn auth_frame(token: Option<&str>) -> Option<String> {
    token.map(|token| json!({"event": "auth", "data": {"Authorization": token}}).to_string())
}

#[allow(clippy::too_many_arguments)]
async fn run_connection_loop(
    request: ConnectRequest,
    policy: ReconnectPolicy,
    mut sink: WsSink,
    mut stream: WsStream,
    mut outgoing_rx: mpsc::Receiver<OutgoingEvent>,
    incoming_tx: broadcast::Sender<IncomingEvent>,
    is_connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            debug!("shutdown requested, closing connection");
            let _ = sink.close().await;
            break;
        }

        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<IncomingEvent>(&text) {
                            Ok(event) => {
                                debug!(?event, "incoming event");
                                let _ = incoming_tx.send(event);
                            }
                            Err(e) => {
                                // Skip malformed frames rather than dropping the connection.
                                warn!("unparseable frame: {} - {}", e, text);
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                        is_connected.store(false, Ordering::SeqCst);
                        match reconnect(&request, &policy, &shutdown).await {
                            Some((new_sink, new_stream)) => {
                                sink = new_sink;
                                stream = new_stream;
                                is_connected.store(true, Ordering::SeqCst);
                            }
                            None => {
                                let _ = incoming_tx.send(IncomingEvent::Disconnected {
                                    reason: "reconnection attempts exhausted".to_string(),
                                });
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Binary, pong and raw frames are not part of the protocol.
                    }
                }
            }
            event = outgoing_rx.recv() => {
                match event {
                    Some(event) => {
                        match serde_json::to_string(&event) {
                            Ok(frame) => {
                                if let Err(e) = sink.send(Message::Text(frame)).await {
                                    // The connection may recover on the next stream error.
                                    error!("failed to send frame: {}", e);
                                }
                            }
                            Err(e) => error!("failed to serialize event: {}", e),
                        }
                    }
                    None => {
                        debug!("outgoing channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    is_connected.store(false, Ordering::SeqCst);
    info!("realtime connection loop ended");
}

/// Bounded reconnection with a fixed delay between attempts.
async fn reconnect(
    request: &ConnectRequest,
    policy: &ReconnectPolicy,
    shutdown: &Arc<AtomicBool>,
) -> Option<(WsSink, WsStream)> {
    for attempt in 1..=policy.attempts {
        if shutdown.load(Ordering::SeqCst) {
            return None;
        }

        info!(
            "reconnection attempt {} of {}, waiting {:?}",
            attempt, policy.attempts, policy.delay
        );
        tokio::time::sleep(policy.delay).await;

        if shutdown.load(Ordering::SeqCst) {
            return None;
        }

        match connect_async(&request.url).await {
            Ok((ws_stream, _)) => {
                info!("reconnected on attempt {}", attempt);
                let (mut sink, stream) = ws_stream.split();
                if let Some(frame) = auth_frame(request.token.as_deref()) {
                    if sink.send(Message::Text(frame)).await.is_err() {
                        warn!("auth frame failed after reconnect");
                        continue;
                    }
                }
                return Some((sink, stream));
            }
            Err(e) => warn!("reconnection attempt {} failed: {}", attempt, e),
        }
    }

    error!(
        "failed to reconnect after {} attempts, giving up",
        policy.attempts
    );
    None
}
