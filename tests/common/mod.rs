//! Common test utilities for integration tests.
//!
//! Provides a recording event sink plus small polling helpers for driving
//! the stream supervisor against a mock SSE server.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use wikifeed::decoder::DecodedEvent;
use wikifeed::publisher::{EventSink, PublishError};
use wiremock::MockServer;

/// Sink that records publishes and flushes instead of talking to Kafka.
#[derive(Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<SinkState>>,
}

#[derive(Default)]
struct SinkState {
    published: Vec<DecodedEvent>,
    flushes: Vec<Duration>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<DecodedEvent> {
        self.inner.lock().unwrap().published.clone()
    }

    pub fn publish_count(&self) -> usize {
        self.inner.lock().unwrap().published.len()
    }

    pub fn flushes(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().flushes.clone()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &DecodedEvent) -> Result<(), PublishError> {
        self.inner.lock().unwrap().published.push(event.clone());
        Ok(())
    }

    fn flush(&self, timeout: Duration) -> Result<(), PublishError> {
        self.inner.lock().unwrap().flushes.push(timeout);
        Ok(())
    }
}

/// Poll `cond` every 10ms until it holds, panicking after ~3s.
pub async fn wait_until<F: Fn() -> bool>(what: &str, cond: F) {
    for _ in 0..300 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

/// Wait until the mock server has seen at least `n` requests.
pub async fn wait_for_requests(server: &MockServer, n: usize) {
    for _ in 0..300 {
        let seen = server.received_requests().await.unwrap_or_default().len();
        if seen >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {} requests", n);
}
