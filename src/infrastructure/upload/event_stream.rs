//! Incremental parser for the server's progress event stream
//!
//! The response body is a sequence of `data: <json>` records separated
//! by blank lines, arriving in arbitrarily split network chunks. The
//! parser buffers raw bytes and yields each event exactly once, no
//! matter where the chunk boundaries fall.

use crate::domain::upload::ProgressEvent;

const DATA_PREFIX: &str = "data: ";
const RECORD_SEPARATOR: &[u8] = b"\n\n";

/// Streaming decoder for progress events
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: Vec<u8>,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk; returns every event completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((pos, sep_len)) = find_separator(&self.buffer) {
            let segment: Vec<u8> = self.buffer.drain(..pos + sep_len).collect();
            if let Some(event) = parse_segment(&segment[..pos]) {
                events.push(event);
            }
        }
        events
    }

    /// Consume the parser at end of stream, yielding a trailing event
    /// that was never terminated by a blank line
    pub fn finish(self) -> Option<ProgressEvent> {
        if self.buffer.is_empty() {
            return None;
        }
        parse_segment(&self.buffer)
    }
}

/// Locate the blank-line record boundary, in either LF or CRLF form.
/// Returns the separator's offset and byte length.
fn find_separator(buffer: &[u8]) -> Option<(usize, usize)> {
    for (i, window) in buffer.windows(2).enumerate() {
        if window == RECORD_SEPARATOR {
            return Some((i, RECORD_SEPARATOR.len()));
        }
        if window == b"\r\n" && buffer[i + 2..].starts_with(b"\r\n") {
            return Some((i, 4));
        }
    }
    None
}

/// Decode one record. Malformed records are logged and skipped so a
/// glitching server cannot wedge the stream.
fn parse_segment(segment: &[u8]) -> Option<ProgressEvent> {
    let text = String::from_utf8_lossy(segment);
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            match serde_json::from_str::<ProgressEvent>(payload) {
                Ok(event) => return Some(event),
                Err(err) => {
                    log::warn!("skipping malformed progress event: {}", err);
                    return None;
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upload::ProgressStep;

    fn record(json: &str) -> Vec<u8> {
        format!("data: {}\n\n", json).into_bytes()
    }

    #[test]
    fn parses_a_complete_record() {
        let mut parser = EventStreamParser::new();
        let events = parser.push(&record(r#"{"step":"validating","message":"Checking file"}"#));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, ProgressStep::Validating);
        assert_eq!(events[0].message, "Checking file");
    }

    #[test]
    fn parses_multiple_records_in_one_chunk() {
        let mut parser = EventStreamParser::new();
        let mut chunk = record(r#"{"step":"validating"}"#);
        chunk.extend(record(r#"{"step":"transcribing"}"#));
        let events = parser.push(&chunk);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].step, ProgressStep::Validating);
        assert_eq!(events[1].step, ProgressStep::Transcribing);
    }

    #[test]
    fn partial_record_waits_for_the_rest() {
        let mut parser = EventStreamParser::new();
        let full = record(r#"{"step":"summarizing","message":"Writing minutes"}"#);
        let (head, tail) = full.split_at(10);

        assert!(parser.push(head).is_empty());
        let events = parser.push(tail);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, ProgressStep::Summarizing);
    }

    #[test]
    fn byte_at_a_time_yields_identical_events() {
        let mut whole = record(r#"{"step":"validating"}"#);
        whole.extend(record(r#"{"step":"complete","redirect":"/meetings/7"}"#));

        let mut reference = EventStreamParser::new();
        let expected = reference.push(&whole);

        let mut parser = EventStreamParser::new();
        let mut got = Vec::new();
        for byte in &whole {
            got.extend(parser.push(std::slice::from_ref(byte)));
        }
        assert_eq!(got, expected);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn split_at_any_offset_yields_identical_events() {
        let mut whole = record(r#"{"step":"transcribing","message":"a"}"#);
        whole.extend(record(r#"{"step":"error","message":"boom"}"#));

        let mut reference = EventStreamParser::new();
        let expected = reference.push(&whole);

        for split in 0..=whole.len() {
            let mut parser = EventStreamParser::new();
            let mut got = parser.push(&whole[..split]);
            got.extend(parser.push(&whole[split..]));
            assert_eq!(got, expected, "split at byte {}", split);
        }
    }

    #[test]
    fn malformed_record_is_skipped() {
        let mut parser = EventStreamParser::new();
        let mut chunk = b"data: {not json}\n\n".to_vec();
        chunk.extend(record(r#"{"step":"complete"}"#));
        let events = parser.push(&chunk);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].step, ProgressStep::Complete);
    }

    #[test]
    fn lines_without_data_prefix_are_ignored() {
        let mut parser = EventStreamParser::new();
        let events = parser.push(b": keepalive\n\n");
        assert!(events.is_empty());
    }

    #[test]
    fn finish_recovers_unterminated_trailing_record() {
        let mut parser = EventStreamParser::new();
        assert!(parser
            .push(br#"data: {"step":"complete","redirect":"/m/1"}"#)
            .is_empty());
        let event = parser.finish().unwrap();
        assert_eq!(event.step, ProgressStep::Complete);
        assert_eq!(event.redirect.as_deref(), Some("/m/1"));
    }

    #[test]
    fn finish_on_empty_buffer_is_none() {
        assert!(EventStreamParser::new().finish().is_none());
    }

    #[test]
    fn crlf_separators_are_tolerated() {
        let mut parser = EventStreamParser::new();
        let events = parser.push(b"data: {\"step\":\"validating\"}\r\n\n");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn full_crlf_records_split_like_lf_records() {
        let mut parser = EventStreamParser::new();
        let mut body = b"data: {\"step\":\"validating\"}\r\n\r\n".to_vec();
        body.extend(b"data: {\"step\":\"complete\",\"redirect\":\"/m/3\"}\r\n\r\n");

        let events = parser.push(&body);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].step, ProgressStep::Validating);
        assert_eq!(events[1].step, ProgressStep::Complete);
        assert_eq!(events[1].redirect.as_deref(), Some("/m/3"));
    }

    #[test]
    fn crlf_body_split_at_any_offset_yields_identical_events() {
        let mut whole = b"data: {\"step\":\"transcribing\"}\r\n\r\n".to_vec();
        whole.extend(b"data: {\"step\":\"complete\"}\r\n\r\n");

        let mut reference = EventStreamParser::new();
        let expected = reference.push(&whole);
        assert_eq!(expected.len(), 2);

        for split in 0..=whole.len() {
            let mut parser = EventStreamParser::new();
            let mut got = parser.push(&whole[..split]);
            got.extend(parser.push(&whole[split..]));
            assert_eq!(got, expected, "split at byte {}", split);
        }
    }
}
