//! SSE (Server-Sent Events) line framing.
//!
//! The upstream EventStreams feed frames events as:
//! - `data: <json>` - payload line(s)
//! - Empty line - signals end of event
//!
//! The feed publishes a single `data` field per event, so every other line
//! (comments starting with `:`, `event:`/`id:` fields) is ignored.

/// Represents a classified SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Payload fragment: content after the `data:` prefix, leading
    /// whitespace stripped
    Data(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment, non-`data` field, or anything else
    Ignored,
}

/// Classify a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim_start().to_string());
    }

    SseLine::Ignored
}

/// Stateful frame buffer that accumulates `data:` fragments and emits a
/// complete event payload at each blank-line boundary.
///
/// Owned by one stream session; a connection drop with an unflushed partial
/// event discards it (the session simply starts over with a fresh buffer).
#[derive(Debug, Default)]
pub struct FrameBuffer {
    /// Accumulated data fragments (SSE allows multiple `data:` lines)
    pending: Vec<String>,
}

impl FrameBuffer {
    /// Create a new, empty frame buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a line to the buffer, potentially returning a complete payload.
    ///
    /// Returns:
    /// - `Some(payload)` - a blank line closed a non-empty event; fragments
    ///   are joined with `\n` in arrival order and the buffer is cleared
    /// - `None` - the line was consumed (or ignored) but no event is
    ///   complete; a blank line with nothing buffered is a no-op
    pub fn feed_line(&mut self, line: &str) -> Option<String> {
        match parse_sse_line(line) {
            SseLine::Data(fragment) => {
                self.pending.push(fragment);
                None
            }
            SseLine::Empty => {
                if self.pending.is_empty() {
                    return None;
                }
                let payload = self.pending.join("\n");
                self.pending.clear();
                Some(payload)
            }
            SseLine::Ignored => None,
        }
    }

    /// True while an event is being assembled
    pub fn has_partial(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests for parse_sse_line

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line("data: {\"text\": \"hello\"}"),
            SseLine::Data("{\"text\": \"hello\"}".to_string())
        );
        assert_eq!(
            parse_sse_line("data:{\"x\":1}"),
            SseLine::Data("{\"x\":1}".to_string())
        );
    }

    #[test]
    fn test_parse_data_line_strips_leading_whitespace_only() {
        assert_eq!(
            parse_sse_line("data:   padded  "),
            SseLine::Data("padded  ".to_string())
        );
    }

    #[test]
    fn test_parse_comment_line_ignored() {
        assert_eq!(parse_sse_line(": keep-alive"), SseLine::Ignored);
        assert_eq!(parse_sse_line(":"), SseLine::Ignored);
    }

    #[test]
    fn test_parse_other_fields_ignored() {
        // The feed only uses `data:`; other SSE fields are not honored
        assert_eq!(parse_sse_line("event: message"), SseLine::Ignored);
        assert_eq!(parse_sse_line("id: 42"), SseLine::Ignored);
        assert_eq!(parse_sse_line("retry: 3000"), SseLine::Ignored);
        assert_eq!(parse_sse_line("unknown garbage"), SseLine::Ignored);
    }

    // Tests for FrameBuffer

    #[test]
    fn test_buffer_single_data_event() {
        let mut buffer = FrameBuffer::new();

        assert!(buffer.feed_line("data: {\"id\":1}").is_none());
        assert!(buffer.has_partial());

        let payload = buffer.feed_line("");
        assert_eq!(payload, Some("{\"id\":1}".to_string()));
        assert!(!buffer.has_partial());
    }

    #[test]
    fn test_buffer_blank_line_with_empty_buffer_is_noop() {
        let mut buffer = FrameBuffer::new();

        assert!(buffer.feed_line("").is_none());
        assert!(buffer.feed_line("").is_none());
        assert!(!buffer.has_partial());
    }

    #[test]
    fn test_buffer_joins_fragments_in_order() {
        let mut buffer = FrameBuffer::new();

        buffer.feed_line("data: first");
        buffer.feed_line("data: second");
        buffer.feed_line("data: third");

        let payload = buffer.feed_line("");
        assert_eq!(payload, Some("first\nsecond\nthird".to_string()));
    }

    #[test]
    fn test_buffer_cleared_after_each_block() {
        let mut buffer = FrameBuffer::new();

        buffer.feed_line("data: one");
        assert_eq!(buffer.feed_line(""), Some("one".to_string()));

        buffer.feed_line("data: two");
        assert_eq!(buffer.feed_line(""), Some("two".to_string()));
        assert!(!buffer.has_partial());
    }

    #[test]
    fn test_buffer_ignores_comments_and_other_fields() {
        let mut buffer = FrameBuffer::new();

        buffer.feed_line(": connected");
        buffer.feed_line("event: message");
        buffer.feed_line("id: 99");
        buffer.feed_line("data: payload");
        buffer.feed_line(": another comment");

        let payload = buffer.feed_line("");
        assert_eq!(payload, Some("payload".to_string()));
    }

    #[test]
    fn test_buffer_realistic_stream() {
        let mut buffer = FrameBuffer::new();
        let mut payloads = Vec::new();

        // Simulate a realistic slice of the EventStreams feed
        let stream_lines = [
            ": welcome",
            "",
            "event: message",
            "id: [{\"topic\":\"eqiad.mediawiki.page-create\",\"partition\":0,\"offset\":1}]",
            "data: {\"title\":\"First\"}",
            "",
            "event: message",
            "data: {\"title\":\"Second\"}",
            "",
            ": keep-alive",
            "",
        ];

        for line in stream_lines {
            if let Some(payload) = buffer.feed_line(line) {
                payloads.push(payload);
            }
        }

        assert_eq!(
            payloads,
            vec![
                "{\"title\":\"First\"}".to_string(),
                "{\"title\":\"Second\"}".to_string(),
            ]
        );
        assert!(!buffer.has_partial());
    }
}
