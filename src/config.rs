//! Runtime configuration.
//!
//! All settings resolve once at startup from environment variables, each
//! with a fixed fallback default. Pointing the bridge at a different feed
//! (e.g. page-delete instead of page-create) is purely a matter of
//! configuration: the {topic, stream URL, user-agent} tuple, not a code
//! path.

use rdkafka::config::ClientConfig;
use std::env;
use std::time::Duration;

pub const DEFAULT_BOOTSTRAP_SERVERS: &str = "kafka.kafka:9092";
pub const DEFAULT_TOPIC: &str = "mediawiki.page-create";
pub const DEFAULT_STREAM_URL: &str =
    "https://stream.wikimedia.org/v2/stream/mediawiki.page-create";
pub const DEFAULT_USER_AGENT: &str = "k8s-data-platform-mediawiki-kafka-ingester";

/// Delay between reconnect attempts (fixed, no backoff growth)
const RECONNECT_DELAY_SECS: u64 = 5;

/// Bound on the final producer drain at shutdown
const FLUSH_TIMEOUT_SECS: u64 = 10;

/// Configuration for one stream-to-topic bridge instance.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Upstream SSE feed URL
    pub stream_url: String,
    /// Destination Kafka topic
    pub topic: String,
    /// Identifying User-Agent sent on every stream request
    pub user_agent: String,
    /// Delay between reconnect attempts
    pub reconnect_delay: Duration,
    /// Bound on the final producer drain at shutdown
    pub flush_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            reconnect_delay: Duration::from_secs(RECONNECT_DELAY_SECS),
            flush_timeout: Duration::from_secs(FLUSH_TIMEOUT_SECS),
        }
    }
}

impl BridgeConfig {
    /// Resolve the bridge configuration from the environment:
    /// `EVENTSTREAM_URL`, `KAFKA_TOPIC`, and `USER_AGENT`.
    pub fn from_env() -> Self {
        Self::default()
            .with_stream_url(env_or("EVENTSTREAM_URL", DEFAULT_STREAM_URL))
            .with_topic(env_or("KAFKA_TOPIC", DEFAULT_TOPIC))
            .with_user_agent(env_or("USER_AGENT", DEFAULT_USER_AGENT))
    }

    /// Set the upstream stream URL.
    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Set the destination topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Set the User-Agent header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the reconnect delay.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

/// Kafka connection settings.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated bootstrap broker list
    pub bootstrap_servers: String,
    /// SASL/PLAIN username
    pub sasl_username: String,
    /// SASL/PLAIN password
    pub sasl_password: String,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: DEFAULT_BOOTSTRAP_SERVERS.to_string(),
            sasl_username: "user".to_string(),
            sasl_password: "user".to_string(),
        }
    }
}

impl KafkaConfig {
    /// Resolve Kafka settings from the environment:
    /// `KAFKA_BOOTSTRAP_SERVERS`, `KAFKA_SASL_USERNAME`, and
    /// `KAFKA_SASL_PASSWORD`.
    pub fn from_env() -> Self {
        Self {
            bootstrap_servers: env_or("KAFKA_BOOTSTRAP_SERVERS", DEFAULT_BOOTSTRAP_SERVERS),
            sasl_username: env_or("KAFKA_SASL_USERNAME", "user"),
            sasl_password: env_or("KAFKA_SASL_PASSWORD", "user"),
        }
    }

    /// Render the full producer client configuration.
    ///
    /// Delivery guarantees: acknowledgment from all in-sync replicas,
    /// idempotent production, zstd-compressed batches, bounded in-flight
    /// requests, and a finite per-send delivery timeout.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set("acks", "all")
            .set("enable.idempotence", "true")
            .set("compression.type", "zstd")
            .set("security.protocol", "SASL_PLAINTEXT")
            .set("sasl.mechanisms", "PLAIN")
            .set("sasl.username", &self.sasl_username)
            .set("sasl.password", &self.sasl_password)
            .set("linger.ms", "50")
            .set("max.in.flight.requests.per.connection", "5")
            .set("delivery.timeout.ms", "120000");
        config
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
