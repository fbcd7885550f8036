//! Engine event stream.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 1024;

/// A single diagnostic event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: String,
    pub payload: String,
}

impl LogEvent {
    pub fn new(level: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            payload: payload.into(),
        }
    }
}

/// Fan-out point for engine events.
///
/// Engines embed one of these and hand out receivers from
/// [`ProxyEngine::subscribe`](super::ProxyEngine::subscribe).
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<LogEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a hub whose subscribers may lag by at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; returns how many subscribers it reached.
    pub fn publish(&self, level: impl Into<String>, payload: impl Into<String>) -> usize {
        self.tx.send(LogEvent::new(level, payload)).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let hub = EventHub::new();
        assert_eq!(hub.publish("info", "nobody listening"), 0);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = EventHub::with_capacity(4);
        let mut rx = hub.subscribe();

        assert_eq!(hub.publish("warning", "dns timeout"), 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, LogEvent::new("warning", "dns timeout"));
    }
}
