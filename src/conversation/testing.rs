//! Mock implementations for testing
//!
//! These mocks let the controller run without a network or a real clock.

use crate::conversation::Message;
use crate::llm::{Chunk, ChunkStream, ResponseSource, StreamError};
use crate::stopwatch::TimerControl;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Response Source
// ============================================================================

/// What the next `open` call should produce
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Open succeeds and the stream yields these items, then ends
    Items(Vec<Result<Chunk, StreamError>>),
    /// Open itself fails
    OpenError(StreamError),
}

impl MockReply {
    pub fn texts(texts: &[&str]) -> Self {
        MockReply::Items(texts.iter().map(|t| Ok(Chunk::text(*t))).collect())
    }
}

/// Source that returns queued replies and records every history it saw
pub struct MockSource {
    replies: Mutex<VecDeque<MockReply>>,
    /// Record of the history passed to each `open`
    pub histories: Mutex<Vec<Vec<Message>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.queue(reply);
        self
    }

    pub fn queue(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn recorded_histories(&self) -> Vec<Vec<Message>> {
        self.histories.lock().unwrap().clone()
    }
}

impl ResponseSource for MockSource {
    fn open(&self, history: &[Message]) -> Result<ChunkStream, StreamError> {
        self.histories.lock().unwrap().push(history.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Items(items)) => Ok(futures::stream::iter(items).boxed()),
            Some(MockReply::OpenError(e)) => Err(e),
            None => Err(StreamError::unknown("No mock reply queued")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Recording Timer
// ============================================================================

/// Timer that only remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingTimer {
    pub running: bool,
    pub calls: Vec<&'static str>,
}

impl TimerControl for RecordingTimer {
    fn start(&mut self) {
        self.running = true;
        self.calls.push("start");
    }

    fn stop(&mut self) {
        self.running = false;
        self.calls.push("stop");
    }
}
