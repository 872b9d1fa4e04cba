//! Incremental decoder for the relay's `text/event-stream` responses
//!
//! Network chunks can split a frame, a line or even a UTF-8 sequence, so bytes
//! are buffered until a full line is available and frames are only emitted at
//! the blank line that ends an event.

use crate::domain::models::StreamFrame;

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk, returning every frame it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let decoded = String::from_utf8_lossy(&raw[..newline]);
            let line = decoded.strip_suffix('\r').unwrap_or(&*decoded);
            if let Some(frame) = self.process_line(line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush a trailing event that was not followed by a blank line
    pub fn finish(&mut self) -> Option<StreamFrame> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest).trim_end().to_string();
            if let Some(frame) = self.process_line(&line) {
                return Some(frame);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<StreamFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        // Comments double as keep-alives
        if line.starts_with(':') {
            return None;
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<StreamFrame> {
        if self.data.is_empty() {
            return None;
        }
        let payload = std::mem::take(&mut self.data).join("\n");
        let frame = StreamFrame::from_data(&payload);
        if frame.is_none() {
            tracing::warn!("Ignoring unrecognized stream payload: {}", payload);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_complete_frames() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: {\"text\":\"Hel\"}\n\ndata: {\"text\":\"lo\"}\n\ndata: [DONE]\n\n");
        assert_eq!(
            frames,
            vec![
                StreamFrame::Text("Hel".into()),
                StreamFrame::Text("lo".into()),
                StreamFrame::Done,
            ]
        );
    }

    #[test]
    fn test_frames_split_across_chunks() {
        let wire = "data: {\"text\":\"héllo\"}\n\ndata: [DONE]\n\n".as_bytes();
        let mut decoder = SseDecoder::new();
        let mut frames = Vec::new();
        for byte in wire.chunks(1) {
            frames.extend(decoder.feed(byte));
        }
        assert_eq!(frames, vec![StreamFrame::Text("héllo".into()), StreamFrame::Done]);
    }

    #[test]
    fn test_ignores_comments_and_crlf() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b": keep-alive\r\n\r\ndata: {\"error\":\"quota\"}\r\n\r\n");
        assert_eq!(frames, vec![StreamFrame::Error("quota".into())]);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: [DONE]").is_empty());
        assert_eq!(decoder.finish(), Some(StreamFrame::Done));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_unknown_payload_is_skipped() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: hello\n\n").is_empty());
    }
}
