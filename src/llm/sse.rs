//! Incremental `text/event-stream` decoding
//!
//! Network reads split events at arbitrary byte offsets, including inside
//! multi-byte UTF-8 sequences, so raw bytes are buffered until a full line
//! is available. An event is dispatched at the blank line that ends it.

/// A complete event pulled out of the byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum SseFrame {
    /// Data of one event; multiple `data:` lines are joined with `\n`
    Data(String),
    /// The `[DONE]` sentinel that ends OpenAI-style streams
    Done,
}

#[derive(Debug, Default)]
pub(super) struct SseDecoder {
    buffer: Vec<u8>,
    /// `data:` lines of the event being assembled
    data: Option<String>,
}

impl SseDecoder {
    /// Feed bytes from the network, returning every event now complete.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush a trailing line and any event left open when the body ended.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let line = std::mem::take(&mut self.buffer);
        if !line.is_empty() {
            if let Some(frame) = self.process_line(&line) {
                return Some(frame);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, raw: &[u8]) -> Option<SseFrame> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\n', '\r']);

        // A blank line ends the event. Lines starting with ':' are comments
        // (some providers send them as keep-alives). Other fields such as
        // `event:` and `id:` carry nothing we use.
        if line.is_empty() {
            return self.dispatch();
        }
        let value = line.strip_prefix("data")?;
        let value = match value.strip_prefix(':') {
            Some(value) => value.strip_prefix(' ').unwrap_or(value),
            None if value.is_empty() => "",
            None => return None,
        };

        match &mut self.data {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => self.data = Some(value.to_string()),
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let data = self.data.take()?;
        if data.trim() == "[DONE]" {
            Some(SseFrame::Done)
        } else if data.trim().is_empty() {
            None
        } else {
            Some(SseFrame::Data(data))
        }
    }
}
