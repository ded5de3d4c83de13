//! In-process pub/sub [`Transport`].
//!
//! One `tokio::sync::broadcast` channel per topic, created lazily on first
//! publish or subscribe. Clones share the same topic table, so several
//! sessions in one process can collaborate through a single hub. Like a
//! broker topic, a publish reaches every subscriber including the sender.

#[cfg(test)]
#[path = "hub_test.rs"]
mod hub_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::debug;

use crate::sync::{Transport, TransportError};

/// Messages buffered per topic before slow receivers start lagging.
pub const DEFAULT_TOPIC_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct LocalHub {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<String>>>>,
    capacity: usize,
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TOPIC_CAPACITY)
    }
}

impl LocalHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hub whose topics buffer `capacity` messages. Zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { topics: Arc::new(Mutex::new(HashMap::new())), capacity: capacity.max(1) }
    }

    /// Current subscriber count on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .lock()
            .map_or(0, |topics| topics.get(topic).map_or(0, broadcast::Sender::receiver_count))
    }

    fn sender(&self, topic: &str) -> Result<broadcast::Sender<String>, TransportError> {
        let mut topics = self
            .topics
            .lock()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        let capacity = self.capacity;
        Ok(topics
            .entry(topic.to_owned())
            .or_insert_with(|| broadcast::channel(capacity).0)
            .clone())
    }
}

impl Transport for LocalHub {
    fn publish(&self, topic: &str, payload: String) -> Result<(), TransportError> {
        if let Err(e) = self.sender(topic)?.send(payload) {
            debug!(%topic, dropped = e.0.len(), "hub: no subscribers");
        }
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<broadcast::Receiver<String>, TransportError> {
        Ok(self.sender(topic)?.subscribe())
    }
}
