//! Business-level API errors carried inside a 200 response envelope.

use thiserror::Error;

/// Errors surfaced by the unified response envelope or the refresh protocol.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Envelope with a non-200 business code.
    #[error("API error {code}: {message}")]
    Business { code: i64, message: String },

    /// Access token expired and the refresh cycle could not recover it.
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    /// The backend demands a fresh login for this operation. Never retried.
    #[error("fresh login required")]
    FreshLoginRequired,

    /// The refresh call itself was rejected as unauthorized.
    #[error("refresh token rejected: {message}")]
    RefreshRejected { message: String },

    /// No token of the required kind is stored locally.
    #[error("not authenticated")]
    NotAuthenticated,
}

impl ApiError {
    /// Whether signing in again could resolve this error.
    pub fn requires_reauth(&self) -> bool {
        !matches!(self, ApiError::Business { .. })
    }

    /// A message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Business { message, .. } => message.clone(),
            ApiError::SessionExpired { .. } => {
                "Your session has expired, please sign in again".to_string()
            }
            ApiError::FreshLoginRequired => {
                "Please sign in again to confirm this action".to_string()
            }
            ApiError::RefreshRejected { .. } => {
                "Your session could not be renewed, please sign in again".to_string()
            }
            ApiError::NotAuthenticated => "Please sign in first".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_reauth() {
        assert!(ApiError::FreshLoginRequired.requires_reauth());
        assert!(ApiError::NotAuthenticated.requires_reauth());
        assert!(ApiError::RefreshRejected {
            message: "401".to_string()
        }
        .requires_reauth());
        assert!(!ApiError::Business {
            code: 5001,
            message: "post not found".to_string()
        }
        .requires_reauth());
    }

    #[test]
    fn test_business_user_message_passthrough() {
        let err = ApiError::Business {
            code: 5001,
            message: "title too long".to_string(),
        };
        assert_eq!(err.user_message(), "title too long");
    }
}
