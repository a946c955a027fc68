//! Wikifeed - bridges a Wikimedia EventStreams SSE feed into Kafka
//!
//! Consumes a server-sent-event change feed over HTTPS, decodes each
//! event's `data:` payload as JSON, and republishes it to a Kafka topic
//! with idempotent-producer semantics. Survives reconnects and shuts down
//! with a bounded producer flush.
//!
//! This library exposes modules for use in integration tests.

pub mod config;
pub mod decoder;
pub mod publisher;
pub mod shutdown;
pub mod sse;
pub mod supervisor;
