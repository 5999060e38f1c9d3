//! Hosted-service example: inbound subscription and outbound generation
//! running concurrently in one process.
//!
//! The consumer routes StarWars and DragonBall messages to their handlers
//! while the generator pushes 100 alternating character events through the
//! producer. Ctrl+C shuts both down gracefully.
//!
//! To run this example:
//! ```bash
//! cargo run --example service
//! ```
//!
//! Make sure you have a Kafka broker running on localhost:9092 (or set
//! KAFKA_BROKERS / KAFKA_GROUP_ID).

use topic_dispatch::{
    topic_handlers, BrokerConfig, Consumer, Generator, GeneratorConfig, Producer,
};
use topic_messages::{DbCharacter, SwCharacter};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Handler for StarWars messages
async fn handle_star_wars(msg: SwCharacter) -> anyhow::Result<()> {
    info!(
        "consuming message from topic {}: {} (id {}) from planet {}",
        msg.topic, msg.name, msg.id, msg.planet
    );
    Ok(())
}

/// Handler for DragonBall messages
async fn handle_dragon_ball(msg: DbCharacter) -> anyhow::Result<()> {
    info!(
        "consuming message from topic {}: {} (id {})",
        msg.topic, msg.name, msg.id
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder().with_max_level(Level::INFO).init();

    let brokers =
        std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
    let group_id =
        std::env::var("KAFKA_GROUP_ID").unwrap_or_else(|_| "dispatch-demo".to_string());

    let config = BrokerConfig::new(&brokers, &group_id);
    info!("service config - brokers: {}, group: {}", brokers, group_id);

    let router = topic_handlers![
        SwCharacter => handle_star_wars,
        DbCharacter => handle_dragon_ball,
    ];

    let consumer = Consumer::new(&config, router)?;
    consumer.subscribe()?;

    let producer = Producer::new(&config)?;
    let generator = Generator::new(producer, GeneratorConfig::new(100));

    let consumer_shutdown = consumer.shutdown_handle();
    let generator_shutdown = generator.shutdown_handle();
    tokio::spawn(async move {
        signal::ctrl_c().await.expect("failed to listen for Ctrl+C");
        info!("received shutdown signal (Ctrl+C)");
        consumer_shutdown.shutdown().await;
        generator_shutdown.shutdown().await;
    });

    let consume = tokio::spawn(async move { consumer.run().await });

    let sent = generator.run().await?;
    info!("generator done, {} messages sent", sent);

    consume.await??;
    info!("service shut down gracefully");
    Ok(())
}
