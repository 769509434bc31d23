//! User-visible side effect seam.
//!
//! The HTTP facade owns error toasts, redirects, and forced logout so call
//! sites stay free of error-branching boilerplate. Those effects cross this
//! trait; the embedding application decides how to render them.

/// Views the error policy can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Forbidden,
    NotFound,
    ServerError,
}

impl Route {
    /// The route path, matching the application's router table.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Forbidden => "/403",
            Route::NotFound => "/404",
            Route::ServerError => "/500",
        }
    }
}

/// Severity of a transient toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

/// Trait for surfacing client effects to the user.
///
/// Implementations must be cheap and non-blocking; the facade calls these
/// from the request path. The crate ships [`crate::effects::LoggingBridge`]
/// as a default and a recording mock under `adapters::mock` for tests.
pub trait UiBridge: Send + Sync {
    /// Show a transient notification.
    fn toast(&self, kind: ToastKind, text: &str);

    /// Navigate to an error or login view.
    fn navigate(&self, route: Route);

    /// The session was forcibly ended (failed refresh, fresh-login demand).
    /// Fired after the session store has been cleared.
    fn session_expired(&self);
}
