//! Line buffering for `text/event-stream` bodies.
//!
//! Bytes arrive in arbitrary slices, so lines (and UTF-8 sequences) can be
//! split across network chunks. Bytes are held until a full line is seen.

#[derive(Debug, Default)]
pub(crate) struct SseBuffer {
    pending: Vec<u8>,
}

impl SseBuffer {
    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Next `data:` payload from the complete lines received so far.
    ///
    /// Comments, blank lines and other SSE fields are skipped.
    pub(crate) fn next_data(&mut self) -> Option<String> {
        while let Some(end) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=end).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(data) = line.strip_prefix("data:") {
                return Some(data.trim().to_string());
            }
        }
        None
    }

    /// Whatever is left once the body has ended without a trailing newline.
    pub(crate) fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        self.pending.push(b'\n');
        self.next_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_data_lines_only() {
        let mut buf = SseBuffer::default();
        buf.push(b": keep-alive\n\nevent: message\ndata: {\"a\":1}\r\n\n");
        assert_eq!(buf.next_data().as_deref(), Some("{\"a\":1}"));
        assert!(buf.next_data().is_none());
    }

    #[test]
    fn holds_partial_lines() {
        let mut buf = SseBuffer::default();
        buf.push(b"data: hel");
        assert!(buf.next_data().is_none());
        buf.push(b"lo\n");
        assert_eq!(buf.next_data().as_deref(), Some("hello"));
    }

    #[test]
    fn multibyte_split_across_pushes() {
        let text = "data: caf\u{e9}\n".as_bytes();
        let (a, b) = text.split_at(text.len() - 2); // splits the é
        let mut buf = SseBuffer::default();
        buf.push(a);
        assert!(buf.next_data().is_none());
        buf.push(b);
        assert_eq!(buf.next_data().as_deref(), Some("caf\u{e9}"));
    }

    #[test]
    fn finish_flushes_unterminated_line() {
        let mut buf = SseBuffer::default();
        buf.push(b"data: [DONE]");
        assert!(buf.next_data().is_none());
        assert_eq!(buf.finish().as_deref(), Some("[DONE]"));
        assert!(buf.finish().is_none());
    }
}
