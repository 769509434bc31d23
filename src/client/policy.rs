//! Status-to-action policy for failed requests.
//!
//! The mapping from HTTP status to user-visible effect is kept as a data
//! table so the policy can be tested row by row, independent of the
//! request pipeline.

use crate::traits::Route;

/// User-facing message constants.
pub mod msg {
    pub const TIMEOUT: &str = "Server timed out";
    pub const BAD_REQUEST: &str = "Request failed";
    pub const LOGIN_REQUIRED: &str = "Please sign in again";
    pub const GENERIC_RETRY: &str = "Request failed, please try again later";
    pub const SESSION_EXPIRED: &str = "Your session has expired, please sign in again";
    pub const FRESH_LOGIN: &str = "Please sign in again to confirm this action";
}

/// Effect the facade performs before rejecting a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Show an error toast.
    Toast(&'static str),
    /// Show an error toast and navigate.
    ToastAndNavigate(&'static str, Route),
    /// Navigate to an error view.
    Navigate(Route),
    /// Reject without any visible effect (caller-specific backoff expected).
    Silent,
    /// Surface the envelope's message when the body carries a non-200
    /// code, else show the generic retry toast.
    SurfaceEnvelope,
}

/// Exact-status rows. Ranges (no response, >= 500, fallback) are handled by
/// [`action_for`].
pub const STATUS_ACTIONS: &[(u16, ErrorAction)] = &[
    (400, ErrorAction::Toast(msg::BAD_REQUEST)),
    (
        401,
        ErrorAction::ToastAndNavigate(msg::LOGIN_REQUIRED, Route::Login),
    ),
    (403, ErrorAction::Navigate(Route::Forbidden)),
    (404, ErrorAction::Navigate(Route::NotFound)),
    (429, ErrorAction::Silent),
];

/// Look up the action for a failed request. `None` means no response
/// arrived at all.
pub fn action_for(status: Option<u16>) -> ErrorAction {
    let status = match status {
        None => return ErrorAction::Toast(msg::TIMEOUT),
        Some(s) => s,
    };
    if status >= 500 {
        return ErrorAction::Navigate(Route::ServerError);
    }
    STATUS_ACTIONS
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, action)| *action)
        .unwrap_or(ErrorAction::SurfaceEnvelope)
}
