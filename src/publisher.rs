//! Kafka publish path.
//!
//! Decoded events are handed to the producer's non-blocking enqueue path.
//! Publishing is best-effort: a failed submission drops that single message
//! (logged by the caller), there is no local retry queue. The producer's
//! own machinery handles acknowledgment and broker-side retries; a bounded
//! `flush` at shutdown drains whatever it has already accepted.

use crate::config::KafkaConfig;
use crate::decoder::DecodedEvent;
use rdkafka::error::KafkaError;
use rdkafka::producer::{BaseProducer, BaseRecord, Producer};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the publish path
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to create producer: {0}")]
    Create(KafkaError),

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to enqueue message: {0}")]
    Enqueue(KafkaError),

    #[error("flush incomplete: {0}")]
    Flush(KafkaError),
}

/// Sink for decoded events.
///
/// Abstracts the broker producer so the supervisor can be driven against a
/// recording sink in tests.
pub trait EventSink: Send {
    /// Enqueue one event for delivery without blocking the caller.
    ///
    /// An error means this single message was dropped; the stream loop
    /// carries on regardless.
    fn publish(&self, event: &DecodedEvent) -> Result<(), PublishError>;

    /// Drain messages already accepted into the send queue, waiting at most
    /// `timeout`. Messages still queued afterwards are abandoned.
    fn flush(&self, timeout: Duration) -> Result<(), PublishError>;
}

/// Publisher backed by a Kafka producer.
///
/// Each message gets a freshly generated random key: it only serves as a
/// partition-distribution hint, not for deduplication or per-entity
/// ordering.
pub struct KafkaPublisher {
    producer: BaseProducer,
    topic: String,
}

impl KafkaPublisher {
    /// Create a producer for the given destination topic.
    pub fn new(config: &KafkaConfig, topic: impl Into<String>) -> Result<Self, PublishError> {
        let producer = config
            .client_config()
            .create()
            .map_err(PublishError::Create)?;

        Ok(Self {
            producer,
            topic: topic.into(),
        })
    }
}

impl EventSink for KafkaPublisher {
    fn publish(&self, event: &DecodedEvent) -> Result<(), PublishError> {
        // serde_json writes UTF-8 with non-ASCII characters preserved,
        // not escaped
        let value = serde_json::to_vec(event)?;
        let key = Uuid::new_v4();

        self.producer
            .send(
                BaseRecord::to(self.topic.as_str())
                    .key(key.as_bytes().as_slice())
                    .payload(value.as_slice()),
            )
            .map_err(|(err, _)| PublishError::Enqueue(err))?;

        // Service delivery callbacks without blocking, so buffered sends
        // keep being acknowledged and retried between submissions
        self.producer.poll(Duration::ZERO);

        Ok(())
    }

    fn flush(&self, timeout: Duration) -> Result<(), PublishError> {
        self.producer.flush(timeout).map_err(PublishError::Flush)
    }
}
