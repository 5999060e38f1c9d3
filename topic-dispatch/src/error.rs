//! Error types for the dispatch library.

use thiserror::Error;

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors that can occur while routing, decoding, or transporting messages.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Connection, send, or receive failure surfaced by the broker client.
    #[error("transport error: {0}")]
    Transport(#[from] rdkafka::error::KafkaError),

    /// Malformed payload bytes (empty, non-UTF-8, or invalid JSON).
    #[error("failed to decode payload: {0}")]
    Decode(String),

    /// No handler registered for the topic.
    #[error("no handler registered for topic '{0}'")]
    UnknownTopic(String),

    /// Error serializing a message to JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Error raised by a message handler.
    #[error("handler error: {0}")]
    Handler(String),
}
