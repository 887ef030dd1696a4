//! User-facing notifications
//!
//! Every dispatch shows a loading notice, then dismisses it and shows exactly
//! one success or error notice. How they are displayed is up to the
//! [`Notifier`] implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{error, info};

/// Handle to a shown loading notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

/// Label of the loading notice
pub const LOADING_LABEL: &str = "Loading...";

pub trait Notifier: Send + Sync {
    fn loading(&self, label: &str) -> NotificationId;
    fn dismiss(&self, id: NotificationId);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes notifications to the tracing log
#[derive(Debug, Default)]
pub struct TracingNotifier {
    next_id: AtomicU64,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for TracingNotifier {
    fn loading(&self, label: &str) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        info!(id = id.0, "{}", label);
        id
    }

    fn dismiss(&self, _id: NotificationId) {}

    fn success(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Shows nothing
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn loading(&self, _label: &str) -> NotificationId {
        NotificationId(0)
    }

    fn dismiss(&self, _id: NotificationId) {}

    fn success(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Loading { id: NotificationId, label: String },
    Dismissed(NotificationId),
    Success(String),
    Error(String),
}

/// Keeps every notification in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    next_id: AtomicU64,
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: Notification) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn loading(&self, label: &str) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.push(Notification::Loading {
            id,
            label: label.to_string(),
        });
        id
    }

    fn dismiss(&self, id: NotificationId) {
        self.push(Notification::Dismissed(id));
    }

    fn success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order_and_ids() {
        let notifier = RecordingNotifier::new();
        let first = notifier.loading(LOADING_LABEL);
        let second = notifier.loading(LOADING_LABEL);
        notifier.dismiss(first);
        notifier.error("bad url");

        assert_ne!(first, second);
        assert_eq!(
            notifier.events(),
            vec![
                Notification::Loading {
                    id: first,
                    label: LOADING_LABEL.into()
                },
                Notification::Loading {
                    id: second,
                    label: LOADING_LABEL.into()
                },
                Notification::Dismissed(first),
                Notification::Error("bad url".into()),
            ]
        );
    }
}
