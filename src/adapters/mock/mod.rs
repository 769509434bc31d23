//! Mock adapters for testing.

mod realtime;
mod ui;

pub use realtime::{MockHandle, MockTransport};
pub use ui::RecordingBridge;
