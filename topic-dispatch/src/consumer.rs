//! Inbound consumption loop with topic-routed dispatch.

use crate::codec;
use crate::config::BrokerConfig;
use crate::error::{DispatchError, Result};
use crate::router::Router;
use crate::shutdown::ShutdownHandle;
use rdkafka::consumer::{Consumer as RdConsumer, StreamConsumer};
use rdkafka::message::Message;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Kafka consumer that routes each received message through a [`Router`].
///
/// Per message: decode the payload, look up the handler for its topic,
/// invoke it. Every per-message error (malformed payload, unknown topic,
/// handler failure) is logged and the message dropped; a single bad message
/// never halts the loop. Offset management and redelivery stay with the
/// client library.
pub struct Consumer {
    inner: StreamConsumer,
    router: Router,
    shutdown: ShutdownHandle,
}

impl Consumer {
    /// Creates a consumer over the router's registered topics.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use topic_dispatch::{topic_handlers, BrokerConfig, Consumer};
    /// use topic_messages::SwCharacter;
    ///
    /// async fn handle_star_wars(msg: SwCharacter) -> anyhow::Result<()> {
    ///     println!("{} from {}", msg.name, msg.planet);
    ///     Ok(())
    /// }
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = BrokerConfig::new("localhost:9092", "demo-group");
    /// let router = topic_handlers![
    ///     SwCharacter => handle_star_wars,
    /// ];
    /// let consumer = Consumer::new(&config, router)?;
    /// consumer.subscribe()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &BrokerConfig, router: Router) -> Result<Self> {
        info!(
            "creating consumer with brokers: {}, group: {}",
            config.brokers, config.group_id
        );

        let consumer: StreamConsumer = config
            .client_config()
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false")
            .create()?;

        Ok(Self {
            inner: consumer,
            router,
            shutdown: ShutdownHandle::new(),
        })
    }

    /// Subscribes to all topics that have registered handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if subscription fails.
    pub fn subscribe(&self) -> Result<()> {
        let topics = self.router.topics();
        info!("subscribing to topics: {:?}", topics);

        self.inner.subscribe(&topics)?;
        Ok(())
    }

    /// Runs the consumption loop until shutdown is requested.
    ///
    /// # Errors
    ///
    /// Per-message errors are logged and swallowed; only a failure to keep
    /// the loop itself alive would surface here.
    pub async fn run(&self) -> Result<()> {
        info!("starting consumer loop");

        loop {
            if self.shutdown.is_shutdown().await {
                info!("shutdown signal received, stopping consumer");
                break;
            }

            // Bounded recv so the shutdown flag is observed promptly.
            match tokio::time::timeout(Duration::from_secs(1), self.inner.recv()).await {
                Ok(Ok(message)) => {
                    let topic = message.topic();
                    debug!(
                        "received message from topic '{}' (partition: {}, offset: {})",
                        topic,
                        message.partition(),
                        message.offset()
                    );

                    match message.payload() {
                        Some(payload) => process_payload(&self.router, topic, payload).await,
                        None => {
                            warn!("received message with no payload from topic '{}'", topic)
                        }
                    }
                }
                Ok(Err(e)) => {
                    error!("error receiving message: {}", e);
                    sleep(Duration::from_secs(1)).await;
                }
                Err(_) => {
                    // recv timeout, loop back to the shutdown check
                    continue;
                }
            }
        }

        info!("consumer stopped");
        Ok(())
    }

    /// Returns a handle that can signal shutdown from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }
}

/// Decodes one payload and dispatches it through the router.
///
/// All failures are logged with enough context to diagnose (topic, payload
/// length) and the message is dropped: an undecodable payload, an
/// unregistered topic, or a failing handler must never halt the consumption
/// loop.
pub async fn process_payload(router: &Router, transport_topic: &str, payload: &[u8]) {
    let envelope = match codec::decode(payload, transport_topic) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(
                "dropping undecodable message from topic '{}' ({} bytes): {}",
                transport_topic,
                payload.len(),
                e
            );
            return;
        }
    };

    match router.dispatch(envelope).await {
        Ok(()) => {}
        Err(DispatchError::UnknownTopic(topic)) => {
            warn!("dropping message: no handler registered for topic '{}'", topic);
        }
        Err(e) => {
            error!(
                "handler failed for message from topic '{}' ({} bytes): {}",
                transport_topic,
                payload.len(),
                e
            );
        }
    }
}
