//! Topic-to-handler dispatch table.

use crate::codec::Envelope;
use crate::error::{DispatchError, Result};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Type alias for message handlers.
///
/// Handlers are async functions that consume one envelope and return a Result.
pub type HandlerBox =
    Box<dyn Fn(Envelope) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Maps topic names to the handlers responsible for them.
///
/// The table is populated once at startup and read-only afterwards, so it is
/// safe to share across tasks without locking. Lookups for an unregistered
/// topic fail explicitly rather than silently dropping the message.
#[derive(Default)]
pub struct Router {
    handlers: HashMap<String, HandlerBox>,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a topic. The last registration for a topic
    /// wins.
    pub fn register(&mut self, topic: impl Into<String>, handler: HandlerBox) {
        let topic = topic.into();
        debug!("registering handler for topic '{}'", topic);
        self.handlers.insert(topic, handler);
    }

    /// Dispatches an envelope to the handler registered for its topic.
    ///
    /// The handler is invoked exactly once, inline, with the unmodified
    /// envelope. Dispatch never retries; the caller decides whether a failure
    /// is fatal or merely logged.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownTopic`] when no handler is registered
    /// for the envelope's topic; no handler is invoked in that case.
    pub async fn dispatch(&self, envelope: Envelope) -> Result<()> {
        let handler = self
            .handlers
            .get(envelope.topic())
            .ok_or_else(|| DispatchError::UnknownTopic(envelope.topic().to_string()))?;
        handler(envelope).await
    }

    /// All registered topics, in arbitrary order.
    pub fn topics(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Whether a handler is registered for `topic`.
    pub fn is_registered(&self, topic: &str) -> bool {
        self.handlers.contains_key(topic)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
