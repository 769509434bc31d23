//! Blogline client - networking core for the blogging platform
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod client;
pub mod config;
pub mod effects;
pub mod envelope;
pub mod error;
pub mod realtime;
pub mod session;
pub mod traits;
