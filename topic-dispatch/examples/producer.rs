//! One-shot typed producer example.
//!
//! Sends a handful of character events to their topics and flushes before
//! exiting.
//!
//! To run this example:
//! ```bash
//! cargo run --example producer
//! ```
//!
//! Make sure you have a Kafka broker running on localhost:9092 (or set
//! KAFKA_BROKERS).

use std::time::Duration;
use topic_dispatch::{BrokerConfig, Outbound, Producer};
use topic_messages::{DbCharacter, SwCharacter};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let brokers =
        std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());

    let config = BrokerConfig::new(&brokers, "producer-example");
    let producer = Producer::new(&config)?;
    info!("producer created, brokers: {}", brokers);

    let star_wars = [
        SwCharacter::new(1, "Luke Skywalker", "Tatooine"),
        SwCharacter::new(2, "Leia Organa", "Alderaan"),
        SwCharacter::new(3, "Yoda", "Dagobah"),
    ];
    for character in &star_wars {
        info!("sending {} to '{}'", character.name, character.topic);
        producer.send(character).await?;
    }

    let dragon_ball = [DbCharacter::new(4, "Goku"), DbCharacter::new(5, "Vegeta")];
    for character in &dragon_ball {
        info!("sending {} to '{}'", character.name, character.topic);
        producer.send(character).await?;
    }

    info!("flushing pending messages");
    producer.flush(Duration::from_secs(10)).await?;

    info!("all messages sent");
    Ok(())
}
