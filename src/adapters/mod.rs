//! Adapter implementations of the crate's trait seams.
//!
//! Production adapters wrap real transports; `mock` holds recording
//! implementations used by unit and integration tests.

pub mod mock;
mod tungstenite_ws;

pub use tungstenite_ws::{ReconnectPolicy, TungsteniteHandle, TungsteniteTransport};
