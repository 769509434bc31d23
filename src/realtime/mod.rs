//! The realtime chat and notification channel.

pub mod events;
mod manager;

pub use manager::RealtimeManager;
