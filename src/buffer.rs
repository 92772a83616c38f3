use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lines kept per pod before the oldest ones are dropped.
pub const DEFAULT_MAX_LINES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Connecting,
    Streaming,
    Closed,
    Failed,
}

/// Bounded, append-only text accumulator for one pod's log stream.
///
/// The last line may be partial: the next chunk continues it until a line
/// feed arrives. Retention is a sliding window over whole lines.
#[derive(Debug)]
pub struct StreamBuffer {
    title: String,
    lines: VecDeque<String>,
    max_lines: usize,
    // Trailing bytes of an incomplete UTF-8 sequence, carried to the next chunk.
    pending: Vec<u8>,
    status: StreamStatus,
}

impl StreamBuffer {
    pub fn new(title: impl Into<String>, max_lines: usize) -> Self {
        Self {
            title: title.into(),
            lines: VecDeque::with_capacity(max_lines.min(DEFAULT_MAX_LINES)),
            max_lines: max_lines.max(1),
            pending: Vec::new(),
            status: StreamStatus::Connecting,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    pub fn set_status(&mut self, status: StreamStatus) {
        self.status = status;
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn append(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);
        let (text, rest) = decode_utf8(&bytes);
        self.pending = rest;
        self.push_text(&text);
    }

    /// Ends the stream: bytes of a sequence that never completed are written
    /// as U+FFFD.
    pub fn close(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            self.push_text(&String::from_utf8_lossy(&pending));
        }
        self.status = StreamStatus::Closed;
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let mut fragments = text.split('\n');
        if let Some(first) = fragments.next() {
            match self.lines.back_mut() {
                Some(last) => last.push_str(first),
                None => self.lines.push_back(first.to_string()),
            }
        }
        for fragment in fragments {
            // The previous line is now complete.
            if let Some(last) = self.lines.back_mut()
                && last.ends_with('\r')
            {
                last.pop();
            }
            self.lines.push_back(fragment.to_string());
        }

        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    /// Replaces all content with an error message and marks the stream failed.
    pub fn replace_with_error(&mut self, message: &str) {
        self.lines.clear();
        self.pending.clear();
        self.lines.extend(message.split('\n').map(str::to_string));
        self.status = StreamStatus::Failed;
    }

    pub fn text(&self) -> String {
        self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }

    /// The most recent `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).cloned().collect()
    }
}

/// Splits `bytes` into decoded text and an undecoded incomplete tail.
///
/// Invalid sequences become U+FFFD; a sequence cut off at the end of the
/// input is returned untouched so the next chunk can complete it.
fn decode_utf8(bytes: &[u8]) -> (String, Vec<u8>) {
    let mut text = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                return (text, Vec::new());
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                text.push_str(&String::from_utf8_lossy(valid));
                match e.error_len() {
                    Some(len) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[len..];
                    }
                    None => return (text, after.to_vec()),
                }
            }
        }
    }
}

/// Point-in-time copy of a buffer, taken under a single read lock.
#[derive(Debug, Clone)]
pub struct PaneSnapshot {
    pub title: String,
    pub status: StreamStatus,
    pub lines: Vec<String>,
}

/// A `StreamBuffer` written by one tailer and read by the renderer.
#[derive(Debug, Clone)]
pub struct SharedBuffer(Arc<RwLock<StreamBuffer>>);

impl SharedBuffer {
    pub fn new(title: impl Into<String>, max_lines: usize) -> Self {
        Self(Arc::new(RwLock::new(StreamBuffer::new(title, max_lines))))
    }

    pub fn append(&self, chunk: &[u8]) {
        self.write().append(chunk);
    }

    pub fn set_status(&self, status: StreamStatus) {
        self.write().set_status(status);
    }

    pub fn replace_with_error(&self, message: &str) {
        self.write().replace_with_error(message);
    }

    pub fn close(&self) {
        self.write().close();
    }

    pub fn status(&self) -> StreamStatus {
        self.read().status()
    }

    #[allow(dead_code)]
    pub fn title(&self) -> String {
        self.read().title().to_string()
    }

    #[allow(dead_code)]
    pub fn text(&self) -> String {
        self.read().text()
    }

    pub fn snapshot(&self, max_lines: usize) -> PaneSnapshot {
        let buffer = self.read();
        PaneSnapshot {
            title: buffer.title().to_string(),
            status: buffer.status(),
            lines: buffer.tail(max_lines),
        }
    }

    // Poisoning is ignored; the content is plain text.
    fn read(&self) -> RwLockReadGuard<'_, StreamBuffer> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StreamBuffer> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}
