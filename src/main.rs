//! Connectivity probe for a Blogline backend.
//!
//! Fetches the first page of the hot feed over HTTP, then opens the
//! realtime channel and prints incoming events until interrupted. Useful
//! for checking a deployment end to end without a full frontend.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use blogline::adapters::{ReconnectPolicy, TungsteniteTransport};
use blogline::api::PostsApi;
use blogline::client::ApiClient;
use blogline::config::{ApiConfig, RealtimeConfig};
use blogline::effects::default_bridge;
use blogline::realtime::RealtimeManager;
use blogline::session::{SessionState, SessionStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let origin = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:5001".to_string());
    info!(origin, "probing backend");

    let session = Arc::new(
        SessionStore::open_default()
            .unwrap_or_else(|| SessionStore::ephemeral(SessionState::default())),
    );
    let client = Arc::new(ApiClient::new(
        ApiConfig::with_base_url(&origin),
        session.clone(),
        default_bridge(),
    ));

    match PostsApi::new(client).list(1, "hot", None).await {
        Ok(env) => info!(total = ?env.total, "feed reachable"),
        Err(e) => error!("feed request failed: {}", e),
    }

    let config = RealtimeConfig::with_origin(&origin);
    let transport = Arc::new(TungsteniteTransport::new(ReconnectPolicy {
        attempts: config.reconnect_attempts,
        delay: config.reconnect_delay,
    }));
    let manager = RealtimeManager::new(config, transport, session);

    if let Err(e) = manager.connect().await {
        error!("realtime connect failed: {}", e);
        return;
    }

    let mut events = manager.subscribe();
    info!("listening for realtime events, ctrl-c to exit");
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => info!(?event, "event"),
                Err(e) => {
                    error!("event stream ended: {}", e);
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    manager.disconnect().await;
    // Give the transport a moment to flush the close.
    tokio::time::sleep(Duration::from_millis(100)).await;
}
