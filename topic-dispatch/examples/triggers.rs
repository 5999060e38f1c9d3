//! Trigger-style entry points: one fixed-topic batch consumer per topic,
//! each logging the contents of every batch it receives.
//!
//! Emulates function-host Kafka trigger bindings: the host owns the
//! subscription and hands batches of raw events to the trigger.
//!
//! To run this example:
//! ```bash
//! cargo run --example triggers
//! ```
//!
//! Set KAFKA_USERNAME / KAFKA_PASSWORD to connect with SASL/PLAIN.

use rdkafka::consumer::{Consumer as RdConsumer, StreamConsumer};
use rdkafka::message::Message;
use std::time::Duration;
use topic_dispatch::{AuthMode, BatchTrigger, BrokerConfig};
use tracing::{error, info, Level};

const MAX_BATCH: usize = 16;

/// Polls one topic and feeds batches to the trigger until the task is
/// aborted.
async fn run_trigger(config: BrokerConfig, topic: &'static str) -> anyhow::Result<()> {
    let trigger = BatchTrigger::new(topic);

    let consumer: StreamConsumer = config
        .client_config()
        .set("group.id", &config.group_id)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .create()?;
    consumer.subscribe(&[topic])?;
    info!("trigger for '{}' subscribed", topic);

    loop {
        let mut batch: Vec<Vec<u8>> = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(500);

        while batch.len() < MAX_BATCH {
            match tokio::time::timeout_at(deadline, consumer.recv()).await {
                Ok(Ok(message)) => {
                    if let Some(payload) = message.payload() {
                        batch.push(payload.to_vec());
                    }
                }
                Ok(Err(e)) => {
                    error!("trigger for '{}' receive error: {}", topic, e);
                    break;
                }
                Err(_) => break, // batch window elapsed
            }
        }

        if !batch.is_empty() {
            let events: Vec<&[u8]> = batch.iter().map(Vec::as_slice).collect();
            trigger.on_batch(&events);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let brokers = std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "kafka:9092".to_string());

    let auth = match (
        std::env::var("KAFKA_USERNAME"),
        std::env::var("KAFKA_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) => AuthMode::Plain { username, password },
        _ => AuthMode::None,
    };

    let config = BrokerConfig::new(&brokers, "$Default").with_auth(auth);

    let star_wars = tokio::spawn(run_trigger(config.clone(), "StarWars"));
    let dragon_ball = tokio::spawn(run_trigger(config.clone(), "DragonBall"));

    info!("triggers running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    star_wars.abort();
    dragon_ball.abort();

    info!("triggers stopped");
    Ok(())
}
