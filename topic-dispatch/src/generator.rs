//! Synthetic message generation loop.
//!
//! Produces a bounded sequence of example payloads, alternating between the
//! two character shapes by index parity, and pushes each through the outbound
//! transport in index order.

use crate::codec::{self, Envelope};
use crate::error::Result;
use crate::producer::Outbound;
use crate::shutdown::ShutdownHandle;
use std::time::Duration;
use topic_messages::{DbCharacter, SwCharacter};
use tracing::{debug, error, info};

const STAR_WARS_CHARACTERS: &[&str] = &[
    "Luke Skywalker",
    "Leia Organa",
    "Han Solo",
    "Darth Vader",
    "Yoda",
    "Obi-Wan Kenobi",
    "Chewbacca",
    "Rey",
    "Lando Calrissian",
    "Mace Windu",
];

const STAR_WARS_PLANETS: &[&str] = &[
    "Tatooine",
    "Alderaan",
    "Hoth",
    "Dagobah",
    "Naboo",
    "Coruscant",
    "Endor",
    "Kashyyyk",
];

const DRAGON_BALL_CHARACTERS: &[&str] = &[
    "Goku",
    "Vegeta",
    "Piccolo",
    "Gohan",
    "Trunks",
    "Krillin",
    "Bulma",
    "Frieza",
    "Cell",
    "Majin Buu",
];

/// Configuration for the generation loop.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of messages to generate.
    pub count: u32,

    /// Timeout for the final flush after all sends.
    pub flush_timeout: Duration,

    /// Abort the loop on the first send failure instead of continuing.
    pub fail_fast: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 100,
            flush_timeout: Duration::from_secs(10),
            fail_fast: false,
        }
    }
}

impl GeneratorConfig {
    /// Creates a configuration producing `count` messages.
    pub fn new(count: u32) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Sets the flush timeout.
    pub fn with_flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    /// Aborts on the first send failure instead of tolerating it.
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }
}

/// Generation loop over an outbound transport.
///
/// Even indices produce Star Wars characters, odd indices Dragon Ball
/// characters, mirroring the demo's alternation rule. By default a failed
/// send is logged and the loop continues; `fail_fast` surfaces it instead.
pub struct Generator<O: Outbound> {
    outbound: O,
    config: GeneratorConfig,
    shutdown: ShutdownHandle,
}

impl<O: Outbound> Generator<O> {
    /// Creates a generator over the given transport.
    pub fn new(outbound: O, config: GeneratorConfig) -> Self {
        Self {
            outbound,
            config,
            shutdown: ShutdownHandle::new(),
        }
    }

    /// Runs the loop: encode and submit each envelope in index order, then
    /// drain the transport once with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns the first send error when `fail_fast` is set, or a flush
    /// error; otherwise send failures are logged and skipped.
    pub async fn run(&self) -> Result<u32> {
        info!("starting generation loop ({} messages)", self.config.count);

        let mut sent = 0;
        for index in 0..self.config.count {
            if self.shutdown.is_shutdown().await {
                info!("shutdown signal received, stopping generator at index {}", index);
                break;
            }

            let envelope = synthesize(index)?;
            let payload = codec::encode(&envelope);
            debug!("producer sending: {}", String::from_utf8_lossy(&payload));

            match self.outbound.send(envelope.topic(), &payload).await {
                Ok(()) => sent += 1,
                Err(e) if self.config.fail_fast => {
                    error!("send failed at index {}, aborting: {}", index, e);
                    return Err(e);
                }
                Err(e) => {
                    error!("send failed at index {}, continuing: {}", index, e);
                }
            }
        }

        // Drain pending deliveries before signaling completion.
        self.outbound.flush(self.config.flush_timeout).await?;

        info!("generation loop finished ({} messages sent)", sent);
        Ok(sent)
    }

    /// Returns a handle that can signal shutdown from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }
}

/// Builds the envelope for one loop index: Star Wars on even indices,
/// Dragon Ball on odd ones. Names and planets are drawn from fixed pools.
pub fn synthesize(index: u32) -> Result<Envelope> {
    let i = index as usize;
    if index % 2 == 0 {
        let character = SwCharacter::new(
            index as i64,
            STAR_WARS_CHARACTERS[i / 2 % STAR_WARS_CHARACTERS.len()],
            STAR_WARS_PLANETS[i / 2 % STAR_WARS_PLANETS.len()],
        );
        Envelope::from_message(&character)
    } else {
        let character = DbCharacter::new(
            index as i64,
            DRAGON_BALL_CHARACTERS[i / 2 % DRAGON_BALL_CHARACTERS.len()],
        );
        Envelope::from_message(&character)
    }
}
