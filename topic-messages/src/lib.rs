//! Topic-bound message type definitions.
//!
//! This crate provides the core `TopicMessage` trait that associates a payload
//! type with the topic it travels on, plus the concrete payload shapes used by
//! the dispatch demo.

use serde::{Deserialize, Serialize};

/// Trait for types that travel over a named topic.
///
/// Implementors must specify the topic their messages belong to. The trait
/// also requires `Serialize` and `Deserialize` for JSON encoding/decoding.
///
/// # Example
///
/// ```
/// use topic_messages::TopicMessage;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct ProductCreated {
///     id: i64,
///     name: String,
/// }
///
/// impl TopicMessage for ProductCreated {
///     const TOPIC: &'static str = "Products";
/// }
/// ```
pub trait TopicMessage: Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// The topic that messages of this type are published to.
    const TOPIC: &'static str;
}

/// A Star Wars character event. Carries its topic inline so consumers can
/// route on the payload alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwCharacter {
    pub id: i64,
    pub name: String,
    pub planet: String,
    pub topic: String,
}

impl SwCharacter {
    pub fn new(id: i64, name: impl Into<String>, planet: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            planet: planet.into(),
            topic: Self::TOPIC.to_string(),
        }
    }
}

impl TopicMessage for SwCharacter {
    const TOPIC: &'static str = "StarWars";
}

/// A Dragon Ball character event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbCharacter {
    pub id: i64,
    pub name: String,
    pub topic: String,
}

impl DbCharacter {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            topic: Self::TOPIC.to_string(),
        }
    }
}

impl TopicMessage for DbCharacter {
    const TOPIC: &'static str = "DragonBall";
}
