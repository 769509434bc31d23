//! Recording UI bridge for tests.

use std::sync::{Arc, Mutex};

use crate::traits::{Route, ToastKind, UiBridge};

#[derive(Default)]
struct Recorded {
    toasts: Vec<(ToastKind, String)>,
    navigations: Vec<Route>,
    session_expirations: usize,
}

/// A [`UiBridge`] that records every effect for later assertion.
#[derive(Clone, Default)]
pub struct RecordingBridge {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<(ToastKind, String)> {
        self.recorded.lock().unwrap().toasts.clone()
    }

    pub fn navigations(&self) -> Vec<Route> {
        self.recorded.lock().unwrap().navigations.clone()
    }

    pub fn session_expirations(&self) -> usize {
        self.recorded.lock().unwrap().session_expirations
    }
}

impl UiBridge for RecordingBridge {
    fn toast(&self, kind: ToastKind, text: &str) {
        self.recorded
            .lock()
            .unwrap()
            .toasts
            .push((kind, text.to_string()));
    }

    fn navigate(&self, route: Route) {
        self.recorded.lock().unwrap().navigations.push(route);
    }

    fn session_expired(&self) {
        self.recorded.lock().unwrap().session_expirations += 1;
    }
}
