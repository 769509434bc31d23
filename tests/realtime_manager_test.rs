//! Integration tests for the realtime connection manager, driven through
//! the mock transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use blogline::adapters::mock::MockTransport;
use blogline::config::RealtimeConfig;
use blogline::realtime::events::{ChatMessage, IncomingEvent, OutgoingEvent};
use blogline::realtime::RealtimeManager;
use blogline::session::{SessionState, SessionStore};
use blogline::traits::TransportError;

fn manager() -> (RealtimeManager, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let session = Arc::new(SessionStore::ephemeral(SessionState {
        access_token: Some("Bearer tok".to_string()),
        refresh_token: Some("Bearer ref".to_string()),
        ..Default::default()
    }));
    let manager = RealtimeManager::new(
        RealtimeConfig::with_origin("http://127.0.0.1:5001"),
        transport.clone(),
        session,
    );
    (manager, transport)
}

#[tokio::test]
async fn connect_is_idempotent() {
    let (manager, transport) = manager();

    manager.connect().await.unwrap();
    manager.connect().await.unwrap();

    assert_eq!(transport.connect_count(), 1);
    assert!(manager.is_connected().await);
}

#[tokio::test]
async fn connect_carries_token_in_url_and_request() {
    let (manager, transport) = manager();
    manager.connect().await.unwrap();

    let requests = transport.connect_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        "ws://127.0.0.1:5001/socket.io/?token=Bearer%20tok"
    );
    assert_eq!(requests[0].token.as_deref(), Some("Bearer tok"));
}

#[tokio::test]
async fn disconnect_closes_handle_and_tolerates_repeats() {
    let (manager, transport) = manager();

    // Disconnecting before connecting is a no-op.
    manager.disconnect().await;
    assert_eq!(transport.connect_count(), 0);

    manager.connect().await.unwrap();
    manager.disconnect().await;
    assert!(transport.handle().is_closed());
    assert!(!manager.is_connected().await);

    manager.disconnect().await;

    // A later connect opens a fresh channel.
    manager.connect().await.unwrap();
    assert_eq!(transport.connect_count(), 2);
    assert!(manager.is_connected().await);
}

#[tokio::test]
async fn send_message_trims_and_skips_empty_content() {
    let (manager, transport) = manager();
    manager.connect().await.unwrap();
    manager.enter_chat("42").await.unwrap();

    assert!(!manager.send_message("", || {}).await.unwrap());
    assert!(!manager.send_message("   \n\t ", || {}).await.unwrap());

    let sent = manager.send_message("  hello  ", || {}).await.unwrap();
    assert!(sent);

    let emitted = transport.handle().emitted();
    assert_eq!(
        emitted,
        vec![
            OutgoingEvent::EnterChat {
                target_id: "42".to_string()
            },
            OutgoingEvent::SendMessage {
                receiver_id: "42".to_string(),
                content: "hello".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn send_message_without_active_chat_is_dropped() {
    let (manager, transport) = manager();
    manager.connect().await.unwrap();

    let acked = AtomicBool::new(false);
    let sent = manager
        .send_message("hello", || acked.store(true, Ordering::SeqCst))
        .await
        .unwrap();

    assert!(!sent);
    assert!(!acked.load(Ordering::SeqCst));
    assert!(transport.handle().emitted().is_empty());
}

#[tokio::test]
async fn send_message_runs_local_ack_after_emit() {
    let (manager, _transport) = manager();
    manager.connect().await.unwrap();
    manager.enter_chat("7").await.unwrap();

    let acked = AtomicBool::new(false);
    let sent = manager
        .send_message("hi", || acked.store(true, Ordering::SeqCst))
        .await
        .unwrap();

    assert!(sent);
    assert!(acked.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn enter_chat_before_connect_retries_once_after_delay() {
    let (manager, transport) = manager();

    // Not connected yet: the manager connects on demand, waits out the
    // retry delay, then emits.
    manager.enter_chat("42").await.unwrap();

    assert_eq!(transport.connect_count(), 1);
    assert_eq!(
        transport.handle().emitted(),
        vec![OutgoingEvent::EnterChat {
            target_id: "42".to_string()
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn emit_fails_when_connect_keeps_failing() {
    let (manager, transport) = manager();
    transport.fail_next_connects(1);

    let result = manager.enter_chat("42").await;

    assert!(matches!(result, Err(TransportError::NotConnected)));
    assert_eq!(transport.connect_count(), 1);
    assert!(transport.handle().emitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn heartbeat_fires_on_the_interval_while_connected() {
    let (manager, transport) = manager();
    manager.connect().await.unwrap();
    // Let the heartbeat task start its interval before moving the clock.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    tokio::time::advance(Duration::from_secs(30)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(
        transport.handle().emitted(),
        vec![OutgoingEvent::Heartbeat]
    );

    tokio::time::advance(Duration::from_secs(30)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(
        transport.handle().emitted(),
        vec![OutgoingEvent::Heartbeat, OutgoingEvent::Heartbeat]
    );
}

#[tokio::test(start_paused = true)]
async fn heartbeat_pauses_while_transport_reports_disconnected() {
    let (manager, transport) = manager();
    manager.connect().await.unwrap();
    transport.handle().set_connected(false);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    tokio::time::advance(Duration::from_secs(90)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert!(transport.handle().emitted().is_empty());
}

#[tokio::test]
async fn incoming_messages_reach_subscribers() {
    let (manager, transport) = manager();
    manager.connect().await.unwrap();
    let mut events = manager.subscribe();

    let message = ChatMessage {
        sender_id: "7".to_string(),
        receiver_id: "42".to_string(),
        content: "hi".to_string(),
        timestamp: None,
    };
    transport
        .handle()
        .push_incoming(IncomingEvent::NewMessage(message.clone()));

    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("event should arrive")
        .unwrap();
    assert_eq!(event, IncomingEvent::NewMessage(message));
}

#[tokio::test]
async fn delivery_confirmations_are_forwarded() {
    let (manager, transport) = manager();
    manager.connect().await.unwrap();
    let mut events = manager.subscribe();

    transport.handle().push_incoming(IncomingEvent::MessageSent {
        receiver_id: "42".to_string(),
    });

    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("event should arrive")
        .unwrap();
    assert_eq!(
        event,
        IncomingEvent::MessageSent {
            receiver_id: "42".to_string()
        }
    );
}
