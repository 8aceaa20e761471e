#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex};

pub const DEFAULT_TITLE: &str = "Warning";
pub const DEFAULT_BUTTON: &str = "OK";

/// A modal message shown to the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub title: String,
    pub button: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: DEFAULT_TITLE.to_string(),
            button: DEFAULT_BUTTON.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acknowledgement {
    Acknowledged,
    Dismissed,
}

/// Operator notification channel. `notify` returns once the operator has
/// acknowledged the notice; the calling operation is suspended until then.
pub trait NotificationPort {
    fn notify(&self, notice: &Notice) -> Acknowledgement;
}

impl<T: NotificationPort + ?Sized> NotificationPort for &T {
    fn notify(&self, notice: &Notice) -> Acknowledgement {
        (**self).notify(notice)
    }
}

impl<T: NotificationPort + ?Sized> NotificationPort for Arc<T> {
    fn notify(&self, notice: &Notice) -> Acknowledgement {
        (**self).notify(notice)
    }
}

/// Serializes notices onto a port: at most one notice is in flight and every
/// other caller waits until it is acknowledged.
#[derive(Debug)]
pub struct NotificationGate<N> {
    port: N,
    in_flight: Mutex<()>,
}

impl<N: NotificationPort> NotificationGate<N> {
    pub fn new(port: N) -> Self {
        Self {
            port,
            in_flight: Mutex::new(()),
        }
    }

    pub fn port(&self) -> &N {
        &self.port
    }

    pub fn into_port(self) -> N {
        self.port
    }
}

impl<N: NotificationPort> NotificationPort for NotificationGate<N> {
    fn notify(&self, notice: &Notice) -> Acknowledgement {
        let _turn = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::debug!(title = %notice.title, message = %notice.message, "operator notified");
        self.port.notify(notice)
    }
}

/// Headless port: records every notice and acknowledges it immediately.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|n| n.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationPort for CollectingNotifier {
    fn notify(&self, notice: &Notice) -> Acknowledgement {
        self.lock().push(notice.clone());
        Acknowledgement::Acknowledged
    }
}
