//! Outbound transport: typed and raw Kafka producer.

use crate::config::BrokerConfig;
use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer as RdProducer};
use std::time::Duration;
use topic_messages::TopicMessage;
use tracing::{debug, error, info};

/// Outbound transport seam: accepts a topic and a serialized payload and
/// delivers it to the broker asynchronously.
///
/// [`Producer`] is the real implementation; tests substitute a recording
/// mock.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Sends one payload to `topic`.
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<()>;

    /// Drains any pending sends, waiting at most `timeout`.
    async fn flush(&self, timeout: Duration) -> Result<()>;
}

/// Kafka producer wrapping an rdkafka `FutureProducer`.
///
/// Typed messages are serialized to JSON and sent to the topic named by their
/// type; raw payloads go out via the [`Outbound`] trait.
///
/// # Example
///
/// ```no_run
/// use topic_dispatch::{BrokerConfig, Producer};
/// use topic_messages::SwCharacter;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = BrokerConfig::new("localhost:9092", "demo");
/// let producer = Producer::new(&config)?;
/// producer.send(&SwCharacter::new(1, "Luke Skywalker", "Tatooine")).await?;
/// # Ok(())
/// # }
/// ```
pub struct Producer {
    inner: FutureProducer,
}

impl Producer {
    /// Creates a new producer from the broker configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new(config: &BrokerConfig) -> Result<Self> {
        info!("creating producer with brokers: {}", config.brokers);

        let producer: FutureProducer = config
            .client_config()
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { inner: producer })
    }

    /// Sends a typed message to the topic named by its type.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the send is not
    /// acknowledged.
    pub async fn send<T: TopicMessage>(&self, message: &T) -> Result<()> {
        let payload = serde_json::to_vec(message)
            .map_err(|e| DispatchError::Serialization(e.to_string()))?;
        self.send_raw(T::TOPIC, &payload).await
    }

    /// Sends an already-serialized payload to `topic`.
    ///
    /// # Errors
    ///
    /// Returns an error if the send is not acknowledged by the broker.
    pub async fn send_raw(&self, topic: &str, payload: &[u8]) -> Result<()> {
        debug!("sending message to topic '{}' ({} bytes)", topic, payload.len());

        let record = FutureRecord {
            topic,
            partition: None,
            payload: Some(payload),
            key: None::<&[u8]>,
            timestamp: None,
            headers: None,
        };

        match self.inner.send(record, Duration::from_secs(5)).await {
            Ok((partition, offset)) => {
                debug!(
                    "message delivered to topic '{}' (partition: {}, offset: {})",
                    topic, partition, offset
                );
                Ok(())
            }
            Err((kafka_err, _msg)) => {
                error!("failed to send message to topic '{}': {}", topic, kafka_err);
                Err(DispatchError::Transport(kafka_err))
            }
        }
    }
}

#[async_trait]
impl Outbound for Producer {
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<()> {
        self.send_raw(topic, payload).await
    }

    async fn flush(&self, timeout: Duration) -> Result<()> {
        RdProducer::flush(&self.inner, timeout)?;
        Ok(())
    }
}
