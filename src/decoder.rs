//! Event payload decoding.
//!
//! Each flushed SSE payload is parsed strictly as JSON. A malformed payload
//! is a local failure: the caller logs it, drops it, and keeps consuming
//! the stream.

use serde_json::Value;
use thiserror::Error;

/// One decoded upstream event: an arbitrary JSON document.
pub type DecodedEvent = Value;

/// Errors from decoding an event payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Strictly parse one event payload as JSON.
pub fn decode_event(payload: &str) -> Result<DecodedEvent, DecodeError> {
    Ok(serde_json::from_str(payload)?)
}
