//! Best-effort change notifications.

use std::sync::Mutex;

use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to publish to {topic}: {message}")]
pub struct NotifyError {
    pub topic: String,
    pub message: String,
}

/// Fire-and-forget publication channel.
pub trait Notifier: Send + Sync {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), NotifyError>;
}

/// Publishes by emitting a log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), NotifyError> {
        info!(topic, payload, "change published");
        Ok(())
    }
}

/// Keeps every publication in memory; can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every publish fails.
    pub fn failing() -> Self {
        Self {
            published: Mutex::default(),
            fail: true,
        }
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), NotifyError> {
        let error = |message: &str| NotifyError {
            topic: topic.to_string(),
            message: message.to_string(),
        };
        if self.fail {
            return Err(error("subscriber channel closed"));
        }
        self.published
            .lock()
            .map_err(|_| error("lock poisoned"))?
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}
