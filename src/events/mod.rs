use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Change notification emitted by the task store after every successful
/// mutation. Subscribers (UI layers, loggers) receive these as JSON strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    TaskAdded { id: String, title: String },
    TaskUpdated { id: String },
    TaskRemoved { id: String },
    TasksReordered { from: usize, to: usize },
}

/// Broadcasts store change notifications to all subscribers.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<String>,
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self { tx }
    }

    /// Send a store event to all subscribers.
    pub fn broadcast(&self, event: &StoreEvent) {
        // Ignore errors — no subscribers is fine
        let _ = self
            .tx
            .send(serde_json::to_string(event).unwrap_or_default());
    }

    /// Subscribe to all broadcast events.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}
