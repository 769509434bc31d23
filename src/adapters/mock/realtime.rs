//! Mock realtime transport for tests.
//!
//! Records connect requests and emitted events, and lets tests drive
//! incoming events and connectivity by hand.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::realtime::events::{IncomingEvent, OutgoingEvent};
use crate::traits::{ConnectRequest, RealtimeTransport, TransportError, TransportHandle};

/// Mock transport; every successful connect hands out the same handle so
/// tests can inspect emits across reconnects.
pub struct MockTransport {
    handle: Arc<MockHandle>,
    connects: Mutex<Vec<ConnectRequest>>,
    /// Number of leading connect calls that should fail.
    fail_connects: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            handle: Arc::new(MockHandle::new()),
            connects: Mutex::new(Vec::new()),
            fail_connects: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` connect calls fail.
    pub fn fail_next_connects(&self, n: usize) {
        self.fail_connects.store(n, Ordering::SeqCst);
    }

    /// The shared handle handed out on connect.
    pub fn handle(&self) -> Arc<MockHandle> {
        self.handle.clone()
    }

    /// Connect requests seen so far.
    pub fn connect_requests(&self) -> Vec<ConnectRequest> {
        self.connects.lock().unwrap().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeTransport for MockTransport {
    async fn connect(
        &self,
        request: ConnectRequest,
    ) -> Result<Arc<dyn TransportHandle>, TransportError> {
        self.connects.lock().unwrap().push(request);

        let remaining = self.fail_connects.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_connects.store(remaining - 1, Ordering::SeqCst);
            return Err(TransportError::ConnectionFailed(
                "mock connect failure".to_string(),
            ));
        }

        self.handle.set_connected(true);
        self.handle.closed.store(false, Ordering::SeqCst);
        Ok(self.handle.clone())
    }
}

/// Mock handle recording emitted events.
pub struct MockHandle {
    emitted: Mutex<Vec<OutgoingEvent>>,
    connected: AtomicBool,
    closed: AtomicBool,
    incoming_tx: broadcast::Sender<IncomingEvent>,
}

impl MockHandle {
    fn new() -> Self {
        let (incoming_tx, _) = broadcast::channel(64);
        Self {
            emitted: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            incoming_tx,
        }
    }

    /// Events emitted through this handle, in order.
    pub fn emitted(&self) -> Vec<OutgoingEvent> {
        self.emitted.lock().unwrap().clone()
    }

    /// Drive the reported connectivity.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Inject an incoming event, as if the server pushed it.
    pub fn push_incoming(&self, event: IncomingEvent) {
        let _ = self.incoming_tx.send(event);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportHandle for MockHandle {
    async fn emit(&self, event: OutgoingEvent) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        self.emitted.lock().unwrap().push(event);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> broadcast::Receiver<IncomingEvent> {
        self.incoming_tx.subscribe()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request() -> ConnectRequest {
        ConnectRequest {
            url: "ws://test/socket.io/?token=t".to_string(),
            token: Some("t".to_string()),
            handshake_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_records_connects_and_emits() {
        let transport = MockTransport::new();
        let handle = transport.connect(request()).await.unwrap();

        handle.emit(OutgoingEvent::Heartbeat).await.unwrap();
        assert_eq!(transport.connect_count(), 1);
        assert_eq!(transport.handle().emitted(), vec![OutgoingEvent::Heartbeat]);
    }

    #[tokio::test]
    async fn test_fail_next_connects() {
        let transport = MockTransport::new();
        transport.fail_next_connects(1);

        assert!(transport.connect(request()).await.is_err());
        assert!(transport.connect(request()).await.is_ok());
        assert_eq!(transport.connect_count(), 2);
    }

    #[tokio::test]
    async fn test_emit_while_disconnected_fails() {
        let transport = MockTransport::new();
        let handle = transport.connect(request()).await.unwrap();
        transport.handle().set_connected(false);

        let result = handle.emit(OutgoingEvent::Heartbeat).await;
        assert!(matches!(result, Err(TransportError::NotConnected)));
    }
}
