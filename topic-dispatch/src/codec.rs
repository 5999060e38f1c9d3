//! Raw bytes to envelope conversion and back.
//!
//! The wire format is UTF-8 JSON: one object per message, with an optional
//! `"topic"` field naming the logical channel. When the payload carries no
//! topic of its own, the transport-supplied topic is used instead.

use crate::error::{DispatchError, Result};
use serde_json::{Map, Value};
use topic_messages::TopicMessage;

/// Decoded in-memory representation of one message plus its topic.
///
/// The topic is always mirrored into the field map under the `"topic"` key,
/// so encoding an envelope and decoding the bytes yields the same envelope.
/// Envelopes are immutable after creation and passed by value through
/// dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    topic: String,
    fields: Map<String, Value>,
}

impl Envelope {
    /// Creates an envelope for `topic` with the given named fields.
    ///
    /// The topic is written into the field map, overriding any existing
    /// `"topic"` entry.
    pub fn new(topic: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        let topic = topic.into();
        fields.insert("topic".to_string(), Value::String(topic.clone()));
        Self { topic, fields }
    }

    /// Builds an envelope from a typed message, targeting the type's topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the message does not serialize to a JSON object.
    pub fn from_message<T: TopicMessage>(message: &T) -> Result<Self> {
        let value = serde_json::to_value(message)
            .map_err(|e| DispatchError::Serialization(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self::new(T::TOPIC, fields)),
            other => Err(DispatchError::Serialization(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Converts the envelope's fields into a typed message.
    ///
    /// The target shape is selected by the caller (normally via the topic
    /// discriminator); missing or mistyped fields fail with a decode error.
    pub fn to_message<T: TopicMessage>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| DispatchError::Decode(e.to_string()))
    }

    /// The topic this envelope belongs to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Looks up a named field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All named fields, including the `"topic"` entry.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Decodes raw payload bytes into an envelope.
///
/// The topic is taken from the payload's own `"topic"` field when present;
/// otherwise `transport_topic` (the topic the transport delivered the message
/// on) is used.
///
/// # Errors
///
/// Fails with [`DispatchError::Decode`] on empty input, non-UTF-8 bytes,
/// malformed JSON, or a JSON document that is not an object.
pub fn decode(payload: &[u8], transport_topic: &str) -> Result<Envelope> {
    if payload.is_empty() {
        return Err(DispatchError::Decode("empty payload".to_string()));
    }

    let text = std::str::from_utf8(payload)
        .map_err(|e| DispatchError::Decode(format!("payload is not UTF-8: {e}")))?;

    let value: Value = serde_json::from_str(text)
        .map_err(|e| DispatchError::Decode(format!("invalid JSON: {e}")))?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(DispatchError::Decode(format!(
                "expected a JSON object, got {other}"
            )))
        }
    };

    let topic = match fields.get("topic").and_then(Value::as_str) {
        Some(topic) => topic.to_string(),
        None => transport_topic.to_string(),
    };

    Ok(Envelope::new(topic, fields))
}

/// Encodes an envelope back into wire bytes. Deterministic inverse of
/// [`decode`]; cannot fail for well-formed envelopes since all field values
/// are already JSON primitives.
pub fn encode(envelope: &Envelope) -> Vec<u8> {
    serde_json::to_vec(envelope.fields()).expect("JSON map serialization is infallible")
}
