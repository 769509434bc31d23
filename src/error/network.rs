//! Transport-level error types.
//!
//! Failures where no usable envelope reached us: timeouts, connection
//! resets, and non-200 HTTP statuses.

use thiserror::Error;

/// Network and HTTP-status failures.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// No response arrived at all (timeout, DNS, refused connection).
    #[error("no response from server: {message}")]
    NoResponse { message: String },

    /// Request timed out at the client's fixed per-request deadline.
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The server answered with a non-200 HTTP status.
    #[error("HTTP status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The body could not be decoded as JSON.
    #[error("invalid response body: {message}")]
    InvalidBody { message: String },
}

impl NetworkError {
    /// The HTTP status, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Classify a reqwest error into the crate's network taxonomy.
pub fn classify_reqwest_error(err: &reqwest::Error, timeout_secs: u64) -> NetworkError {
    if err.is_timeout() {
        return NetworkError::Timeout {
            seconds: timeout_secs,
        };
    }
    if let Some(status) = err.status() {
        return NetworkError::HttpStatus {
            status: status.as_u16(),
            message: err.to_string(),
        };
    }
    if err.is_decode() {
        return NetworkError::InvalidBody {
            message: err.to_string(),
        };
    }
    NetworkError::NoResponse {
        message: err.to_string(),
    }
}
