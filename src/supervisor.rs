//! Stream session supervision.
//!
//! The supervisor owns one streaming HTTP connection at a time, drives the
//! SSE frame buffer over the response body, and forwards flushed payloads
//! through the decoder to the event sink. Any connection-level failure
//! tears the session down and reconnects after a fixed delay; there is no
//! cap on reconnect attempts. Only the shutdown signal ends the loop.

use crate::config::BridgeConfig;
use crate::decoder::decode_event;
use crate::publisher::EventSink;
use crate::shutdown::ShutdownSignal;
use crate::sse::FrameBuffer;
use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Connection-level stream errors. All of them are transient: the
/// supervisor recovers by reconnecting.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Transport failure: connect, reset, timeout, or body read error
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("unexpected HTTP status {status}")]
    HttpStatus { status: u16 },

    /// Upstream closed what should be an endless stream
    #[error("upstream closed the stream")]
    Closed,
}

/// Supervises one upstream stream, republishing its events into `sink`.
pub struct StreamSupervisor<S> {
    config: BridgeConfig,
    client: Client,
    sink: S,
    shutdown: Arc<ShutdownSignal>,
}

impl<S: EventSink> StreamSupervisor<S> {
    pub fn new(config: BridgeConfig, sink: S, shutdown: Arc<ShutdownSignal>) -> Self {
        Self {
            config,
            client: Client::new(),
            sink,
            shutdown,
        }
    }

    /// The sink this supervisor publishes into, for the driver's final
    /// bounded drain.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run until the shutdown signal is set.
    ///
    /// Cycles connect -> stream -> reconnect-wait indefinitely. The
    /// shutdown signal is observed before each reconnect attempt, before
    /// each body line, and during the reconnect sleep.
    pub async fn run(&self) {
        while !self.shutdown.is_set() {
            if let Err(err) = self.stream_once().await {
                warn!(
                    "Stream session ended: {}; reconnecting in {:?}",
                    err, self.config.reconnect_delay
                );
                self.reconnect_wait().await;
            }
        }
        info!("Stream supervisor stopped");
    }

    /// Open one connection and consume it until it fails or shutdown is
    /// signalled. Returns `Ok(())` only on shutdown.
    async fn stream_once(&self) -> Result<(), StreamError> {
        let response = self
            .client
            .get(&self.config.stream_url)
            .header("Accept", "text/event-stream")
            .header("User-Agent", &self.config.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::HttpStatus {
                status: status.as_u16(),
            });
        }

        info!("Connected to event stream at {}", self.config.stream_url);

        let mut body = Box::pin(response.bytes_stream());
        let mut buffer = BytesMut::new();
        // Frame state lives and dies with this connection; a partial event
        // left behind on teardown is discarded
        let mut frames = FrameBuffer::new();

        loop {
            // Drain complete lines already buffered, checking the shutdown
            // flag before each one
            while let Some(line) = next_line(&mut buffer) {
                if self.shutdown.is_set() {
                    return Ok(());
                }
                self.handle_line(&line, &mut frames);
            }

            tokio::select! {
                _ = self.shutdown.notified() => return Ok(()),
                chunk = body.next() => match chunk {
                    Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                    Some(Err(err)) => return Err(StreamError::Transport(err)),
                    None => return Err(StreamError::Closed),
                },
            }
        }
    }

    /// Feed one line through frame buffer -> decoder -> sink. Decode and
    /// publish failures are local to the event and never end the session.
    fn handle_line(&self, line: &str, frames: &mut FrameBuffer) {
        if let Some(payload) = frames.feed_line(line) {
            match decode_event(&payload) {
                Ok(event) => {
                    if let Err(err) = self.sink.publish(&event) {
                        error!("Dropping event, publish failed: {}", err);
                    }
                }
                Err(err) => {
                    warn!("Dropping undecodable event: {}", err);
                }
            }
        }
    }

    /// Sleep out the fixed reconnect delay, unless shutdown interrupts it.
    async fn reconnect_wait(&self) {
        tokio::select! {
            _ = self.shutdown.notified() => {}
            _ = tokio::time::sleep(self.config.reconnect_delay) => {}
        }
    }
}

/// Carve the next `\n`-terminated line out of `buffer`, stripping the
/// terminator and a preceding `\r`.
///
/// Splitting happens at the byte level so a multi-byte UTF-8 codepoint
/// spanning two network chunks is never cut; invalid UTF-8 within a line is
/// replaced lossily, matching the upstream feed's tolerant decoding.
fn next_line(buffer: &mut BytesMut) -> Option<String> {
    let pos = buffer.iter().position(|&b| b == b'\n')?;
    let mut line = buffer.split_to(pos + 1);
    line.truncate(pos);
    if line.last() == Some(&b'\r') {
        line.truncate(pos - 1);
    }
    Some(String::from_utf8_lossy(&line).into_owned())
}
