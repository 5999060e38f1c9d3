//! Fixed-topic batch entry points.
//!
//! Mirrors the trigger-function style of consumption: an external runtime
//! hands over a batch of raw events for one topic and each event's contents
//! are logged.

use tracing::{info, warn};

/// Batch entry point bound to a single topic.
///
/// `on_batch` logs every event's UTF-8 payload; events that are not valid
/// UTF-8 are skipped with a warning. It never fails; a bad event in a batch
/// must not prevent the rest from being logged.
pub struct BatchTrigger {
    topic: String,
}

impl BatchTrigger {
    /// Creates a trigger for `topic`.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }

    /// The topic this trigger is bound to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Logs the contents of one batch of raw events. Returns the number of
    /// events logged.
    pub fn on_batch(&self, events: &[&[u8]]) -> usize {
        let mut logged = 0;
        for event in events {
            match std::str::from_utf8(event) {
                Ok(value) => {
                    info!("[{}] {}", self.topic, value);
                    logged += 1;
                }
                Err(e) => {
                    warn!(
                        "skipping non-UTF-8 event on topic '{}' ({} bytes): {}",
                        self.topic,
                        event.len(),
                        e
                    );
                }
            }
        }
        logged
    }
}
