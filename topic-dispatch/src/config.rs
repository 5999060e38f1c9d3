//! Broker connection configuration.

use rdkafka::ClientConfig;

/// Authentication mode for the broker connection.
#[derive(Debug, Clone, Default)]
pub enum AuthMode {
    /// Plaintext connection, no authentication.
    #[default]
    None,
    /// SASL/PLAIN with username and password.
    Plain { username: String, password: String },
}

/// Connection parameters shared by consumers and producers.
///
/// Replaces hard-coded broker addresses and topic literals with an explicit
/// structure passed into each component at construction.
///
/// # Example
///
/// ```
/// use topic_dispatch::{AuthMode, BrokerConfig};
///
/// let config = BrokerConfig::new("localhost:9092", "demo-group")
///     .with_auth(AuthMode::Plain {
///         username: "demo".into(),
///         password: "secret".into(),
///     });
/// assert_eq!(config.brokers, "localhost:9092");
/// ```
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Comma-separated host:port seed list.
    pub brokers: String,

    /// Consumer group id. Ignored by producers.
    pub group_id: String,

    /// Authentication mode.
    pub auth: AuthMode,
}

impl BrokerConfig {
    /// Creates a configuration with no authentication.
    pub fn new(brokers: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            group_id: group_id.into(),
            auth: AuthMode::None,
        }
    }

    /// Sets the authentication mode.
    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    /// Builds the base rdkafka client configuration: bootstrap servers plus
    /// security settings. Consumers and producers layer their own options on
    /// top.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", &self.brokers);

        match &self.auth {
            AuthMode::None => {
                config.set("security.protocol", "plaintext");
            }
            AuthMode::Plain { username, password } => {
                config
                    .set("security.protocol", "sasl_plaintext")
                    .set("sasl.mechanism", "PLAIN")
                    .set("sasl.username", username)
                    .set("sasl.password", password);
            }
        }

        config
    }
}
