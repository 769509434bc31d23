//! Trait seams for dependency injection.
//!
//! Production adapters live in [`crate::adapters`]; mocks for tests live in
//! [`crate::adapters::mock`].

mod realtime;
mod ui;

pub use realtime::{ConnectRequest, RealtimeTransport, TransportError, TransportHandle};
pub use ui::{Route, ToastKind, UiBridge};
