//! Error types for the Blogline client.
//!
//! The taxonomy follows how failures reach us:
//!
//! - [`NetworkError`]: transport failures and non-200 HTTP statuses
//! - [`ApiError`]: business errors carried inside a 200 envelope, including
//!   the auth-expiry subtypes driving the refresh protocol
//! - [`ClientError`]: the unified error returned to callers

mod api;
mod network;

pub use api::ApiError;
pub use network::{classify_reqwest_error, NetworkError};

use thiserror::Error;

/// Unified error type returned by the client facade and API modules.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// Whether the failure might succeed on a plain retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(NetworkError::NoResponse { .. })
            | ClientError::Network(NetworkError::Timeout { .. }) => true,
            ClientError::Network(NetworkError::HttpStatus { status, .. }) => *status >= 500,
            ClientError::Network(NetworkError::InvalidBody { .. }) => false,
            ClientError::Api(_) => false,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let err: ClientError = NetworkError::Timeout { seconds: 10 }.into();
        assert!(err.is_retryable());

        let err: ClientError = NetworkError::HttpStatus {
            status: 503,
            message: "unavailable".to_string(),
        }
        .into();
        assert!(err.is_retryable());

        let err: ClientError = NetworkError::HttpStatus {
            status: 403,
            message: "forbidden".to_string(),
        }
        .into();
        assert!(!err.is_retryable());

        let err: ClientError = ApiError::FreshLoginRequired.into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transparent_display() {
        let err: ClientError = ApiError::NotAuthenticated.into();
        assert_eq!(err.to_string(), "not authenticated");
    }
}
