//! Process entry point.
//!
//! Wires configuration, the signal-to-shutdown mapping, the Kafka
//! publisher, and the stream supervisor, then performs the final bounded
//! producer drain once the supervisor stops.

use wikifeed::config::{BridgeConfig, KafkaConfig};
use wikifeed::publisher::{EventSink, KafkaPublisher};
use wikifeed::shutdown::{install_signal_handlers, ShutdownSignal};
use wikifeed::supervisor::StreamSupervisor;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BridgeConfig::from_env();
    let kafka = KafkaConfig::from_env();

    let publisher = match KafkaPublisher::new(&kafka, &config.topic) {
        Ok(publisher) => publisher,
        Err(err) => {
            error!("Failed to create Kafka producer: {}", err);
            std::process::exit(1);
        }
    };

    let shutdown = ShutdownSignal::new();
    install_signal_handlers(shutdown.clone());

    info!(
        "Starting bridge: {} -> topic {}",
        config.stream_url, config.topic
    );

    let flush_timeout = config.flush_timeout;
    let supervisor = StreamSupervisor::new(config, publisher, shutdown);
    supervisor.run().await;

    // One bounded opportunity to drain messages the producer has already
    // accepted; whatever is still queued afterwards is abandoned
    info!("Draining producer (up to {:?})", flush_timeout);
    if let Err(err) = supervisor.sink().flush(flush_timeout) {
        error!("Shutdown drain incomplete: {}", err);
    }
    info!("Shutdown complete");
}
