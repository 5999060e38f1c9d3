//! Topic-routed Kafka consumption and message generation, built on `rdkafka`
//! and `tokio`.
//!
//! # Features
//!
//! - [`Router`]: process-wide topic-to-handler dispatch table, populated at
//!   startup, read-only afterwards
//! - [`topic_handlers!`] macro for registering typed handlers
//! - [`codec`]: UTF-8 JSON to [`Envelope`] boundary with explicit decode
//!   failures
//! - [`Consumer`]: inbound loop that decodes, dispatches, and drops bad
//!   messages without halting
//! - [`Producer`]: typed and raw outbound sends with a bounded flush
//! - [`Generator`]: bounded synthetic-message production loop
//! - [`BatchTrigger`]: fixed-topic batch entry points
//! - Graceful shutdown via cloneable [`ShutdownHandle`]s, integrated tracing
//!
//! # Example
//!
//! ```no_run
//! use topic_dispatch::{topic_handlers, BrokerConfig, Consumer};
//! use topic_messages::{DbCharacter, SwCharacter};
//!
//! async fn handle_star_wars(msg: SwCharacter) -> anyhow::Result<()> {
//!     println!("{} (id {}) from planet {}", msg.name, msg.id, msg.planet);
//!     Ok(())
//! }
//!
//! async fn handle_dragon_ball(msg: DbCharacter) -> anyhow::Result<()> {
//!     println!("{} (id {})", msg.name, msg.id);
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BrokerConfig::new("localhost:9092", "demo-group");
//!     let router = topic_handlers![
//!         SwCharacter => handle_star_wars,
//!         DbCharacter => handle_dragon_ball,
//!     ];
//!
//!     let consumer = Consumer::new(&config, router)?;
//!     consumer.subscribe()?;
//!     consumer.run().await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
mod config;
mod consumer;
mod error;
mod generator;
mod producer;
mod router;
mod shutdown;
mod trigger;

pub use codec::{decode, encode, Envelope};
pub use config::{AuthMode, BrokerConfig};
pub use consumer::{process_payload, Consumer};
pub use error::{DispatchError, Result};
pub use generator::{synthesize, Generator, GeneratorConfig};
pub use producer::{Outbound, Producer};
pub use router::{HandlerBox, Router};
pub use shutdown::ShutdownHandle;
pub use trigger::BatchTrigger;

/// Re-export the TopicMessage trait for convenience
pub use topic_messages::TopicMessage;

/// Macro to build a [`Router`] from typed topic handlers.
///
/// Each handler is an async function taking the typed message and returning
/// `anyhow::Result<()>`; the envelope is converted to the message type at
/// dispatch time, selected by the type's topic.
///
/// # Example
///
/// ```
/// use topic_dispatch::topic_handlers;
/// use topic_messages::SwCharacter;
///
/// async fn handle_star_wars(msg: SwCharacter) -> anyhow::Result<()> {
///     println!("{:?}", msg);
///     Ok(())
/// }
///
/// let router = topic_handlers![
///     SwCharacter => handle_star_wars,
/// ];
/// assert!(router.is_registered("StarWars"));
/// ```
#[macro_export]
macro_rules! topic_handlers {
    ($($msg_type:ty => $handler:expr),* $(,)?) => {{
        let mut router = $crate::Router::new();
        $(
            let handler = ::std::sync::Arc::new($handler);
            router.register(
                <$msg_type as $crate::TopicMessage>::TOPIC,
                Box::new(move |envelope: $crate::Envelope| {
                    let handler = ::std::sync::Arc::clone(&handler);
                    Box::pin(async move {
                        let msg: $msg_type = envelope.to_message()?;
                        handler(msg)
                            .await
                            .map_err(|e| $crate::DispatchError::Handler(e.to_string()))
                    })
                }),
            );
        )*
        router
    }};
}
