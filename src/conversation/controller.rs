//! Submission and streaming lifecycle

use super::{Message, Transcript};
use crate::config::{ChatConfig, ResponseMode};
use crate::llm::{self, ChunkStream, ResponseSource, StreamError};
use crate::stopwatch::TimerControl;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Shown in the assistant slot until the first chunk arrives
pub const PLACEHOLDER_TEXT: &str = "Thinking...";

/// Replaces partial content when the stream fails mid-way
pub const STREAM_ERROR_TEXT: &str =
    "Sorry, there was an error with the Hugging Face API. Please check your token and try again.";

/// Appended when a stream cannot be opened at all
pub const REQUEST_ERROR_TEXT: &str = "Sorry, there was an error processing your request.";

/// Replaces the placeholder when the user cancels before any text arrived
pub const CANCELLED_TEXT: &str = "Response cancelled.";

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("could not open response stream: {0}")]
    StreamOpen(#[source] StreamError),
    #[error("response stream failed: {0}")]
    StreamConsume(#[source] StreamError),
}

/// Outcome of a `submit` call
#[derive(Debug)]
pub enum Submission {
    /// Input was empty or whitespace; nothing changed
    Ignored,
    /// A response is already streaming; nothing changed
    Busy,
    /// User turn appended and a response stream is open
    Streaming,
    /// User turn appended but the stream could not be opened
    Failed(ConversationError),
}

/// Outcome of one `pump` step
#[derive(Debug)]
pub enum StreamProgress {
    /// Text was appended to the assistant message
    Appended,
    /// A chunk without text arrived
    Skipped,
    /// The stream ended normally
    Completed { chunks: usize, elapsed: Duration },
    /// The stream failed and the assistant message now holds the error text
    Failed(ConversationError),
}

struct ActiveStream {
    chunks: ChunkStream,
    text: String,
    received: usize,
    started: Instant,
}

/// Owns the transcript, the input buffer, and the in-flight response.
///
/// At most one response streams at a time. The timer is started when a
/// non-empty submission is accepted and stopped when its stream completes,
/// fails, or is cancelled.
pub struct ConversationController<T: TimerControl> {
    transcript: Transcript,
    input: String,
    source: Arc<dyn ResponseSource>,
    mode: ResponseMode,
    timer: T,
    active: Option<ActiveStream>,
}

impl<T: TimerControl> ConversationController<T> {
    pub fn new(source: Arc<dyn ResponseSource>, mode: ResponseMode, timer: T) -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            source,
            mode,
            timer,
            active: None,
        }
    }

    /// Pick the response source from the configured credential.
    pub fn from_config(config: &ChatConfig, timer: T) -> Result<Self, StreamError> {
        let mode = config.mode();
        let source = llm::source_for(config, mode)?;
        Ok(Self::new(source, mode, timer))
    }

    /// Accept a user turn and open a response stream for it.
    pub fn submit(&mut self, text: &str) -> Submission {
        if text.trim().is_empty() {
            return Submission::Ignored;
        }
        if self.active.is_some() {
            tracing::warn!("Submission rejected while a response is streaming");
            return Submission::Busy;
        }

        self.transcript.push(Message::user(text));
        self.input.clear();
        self.timer.start();

        match self.source.open(self.transcript.messages()) {
            Ok(chunks) => {
                self.transcript.push(Message::assistant(PLACEHOLDER_TEXT));
                self.active = Some(ActiveStream {
                    chunks,
                    text: String::new(),
                    received: 0,
                    started: Instant::now(),
                });
                tracing::info!(
                    source = %self.source.name(),
                    turns = self.transcript.len(),
                    "Response stream opened"
                );
                Submission::Streaming
            }
            Err(e) => {
                tracing::error!(
                    source = %self.source.name(),
                    kind = e.kind.as_str(),
                    error = %e,
                    "Failed to open response stream"
                );
                self.transcript.push(Message::assistant(REQUEST_ERROR_TEXT));
                self.timer.stop();
                Submission::Failed(ConversationError::StreamOpen(e))
            }
        }
    }

    /// Submit whatever is in the input buffer.
    ///
    /// The buffer is only cleared if the submission is accepted.
    pub fn submit_input(&mut self) -> Submission {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Wait for the next chunk of the active stream and apply it.
    ///
    /// Returns `None` when no stream is active. Cancel-safe: dropping the
    /// returned future loses no chunk.
    pub async fn pump(&mut self) -> Option<StreamProgress> {
        let active = self.active.as_mut()?;
        let item = active.chunks.next().await;

        let progress = match item {
            Some(Ok(chunk)) => {
                active.received += 1;
                match chunk.content {
                    Some(text) if !text.is_empty() => {
                        active.text.push_str(&text);
                        self.transcript.set_last_assistant(&active.text);
                        StreamProgress::Appended
                    }
                    _ => StreamProgress::Skipped,
                }
            }
            Some(Err(e)) => self.fail(e),
            None => self.complete(),
        };
        Some(progress)
    }

    /// Abandon the active stream. Text received so far is kept.
    ///
    /// Returns false if nothing was streaming.
    pub fn cancel(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        if active.text.is_empty() {
            self.transcript.set_last_assistant(CANCELLED_TEXT);
        }
        self.timer.stop();
        tracing::info!(
            chunks = active.received,
            elapsed_ms = millis(active.started.elapsed()),
            "Response stream cancelled"
        );
        true
    }

    fn complete(&mut self) -> StreamProgress {
        let (chunks, elapsed) = self
            .active
            .take()
            .map_or((0, Duration::ZERO), |a| (a.received, a.started.elapsed()));
        self.timer.stop();
        tracing::info!(
            chunks,
            elapsed_ms = millis(elapsed),
            "Response stream completed"
        );
        StreamProgress::Completed { chunks, elapsed }
    }

    fn fail(&mut self, error: StreamError) -> StreamProgress {
        let received = self.active.take().map_or(0, |a| a.received);
        self.transcript.set_last_assistant(STREAM_ERROR_TEXT);
        self.timer.stop();
        tracing::error!(
            kind = error.kind.as_str(),
            error = %error,
            chunks = received,
            "Response stream failed"
        );
        StreamProgress::Failed(ConversationError::StreamConsume(error))
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
