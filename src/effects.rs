//! Default [`UiBridge`] implementations.
//!
//! [`DedupToasts`] enforces the platform's toast policy: at most one
//! visible toast per kind at a time, keyed by kind with a fixed clear
//! delay. [`LoggingBridge`] is the fallback sink that renders effects as
//! log lines, used by headless embedders and the probe binary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::traits::{Route, ToastKind, UiBridge};

/// How long a toast kind stays suppressed after being shown.
const TOAST_CLEAR_DELAY: Duration = Duration::from_millis(3000);

/// Sink that logs every effect via `tracing`.
#[derive(Debug, Default, Clone)]
pub struct LoggingBridge;

impl UiBridge for LoggingBridge {
    fn toast(&self, kind: ToastKind, text: &str) {
        match kind {
            ToastKind::Error => tracing::error!(toast = text, "toast"),
            ToastKind::Warning => tracing::warn!(toast = text, "toast"),
            ToastKind::Success | ToastKind::Info => tracing::info!(toast = text, "toast"),
        }
    }

    fn navigate(&self, route: Route) {
        tracing::info!(route = route.path(), "navigate");
    }

    fn session_expired(&self) {
        tracing::warn!("session expired, forced logout");
    }
}

/// Decorator that de-duplicates toasts by kind.
///
/// A second toast of the same kind inside the clear delay is dropped;
/// navigation and logout pass through untouched.
pub struct DedupToasts<B> {
    inner: B,
    shown: Mutex<HashMap<ToastKind, Instant>>,
    clear_delay: Duration,
}

impl<B: UiBridge> DedupToasts<B> {
    pub fn new(inner: B) -> Self {
        Self::with_clear_delay(inner, TOAST_CLEAR_DELAY)
    }

    pub fn with_clear_delay(inner: B, clear_delay: Duration) -> Self {
        Self {
            inner,
            shown: Mutex::new(HashMap::new()),
            clear_delay,
        }
    }

    fn should_show(&self, kind: ToastKind) -> bool {
        let mut shown = self.shown.lock().expect("toast gate lock poisoned");
        let now = Instant::now();
        match shown.get(&kind) {
            Some(last) if now.duration_since(*last) < self.clear_delay => false,
            _ => {
                shown.insert(kind, now);
                true
            }
        }
    }
}

impl<B: UiBridge> UiBridge for DedupToasts<B> {
    fn toast(&self, kind: ToastKind, text: &str) {
        if self.should_show(kind) {
            self.inner.toast(kind, text);
        } else {
            tracing::debug!(toast = text, "toast suppressed by de-dup");
        }
    }

    fn navigate(&self, route: Route) {
        self.inner.navigate(route);
    }

    fn session_expired(&self) {
        self.inner.session_expired();
    }
}

/// The default effect stack: de-duplicated toasts over the logging sink.
pub fn default_bridge() -> Arc<dyn UiBridge> {
    Arc::new(DedupToasts::new(LoggingBridge))
}
