//! Response sources
//!
//! A source turns the conversation so far into a stream of text chunks.
//! Two implementations exist: a scripted one for running without a token,
//! and the Hugging Face inference client.

mod error;
mod huggingface;
mod scripted;
mod sse;
mod types;

pub use error::StreamError;
pub use huggingface::InferenceClient;
pub use scripted::{ScriptedSource, SIMULATED_RESPONSE};

use crate::config::{ChatConfig, ResponseMode};
use crate::conversation::Message;
use futures::stream::BoxStream;
use std::sync::Arc;

/// One unit of incrementally delivered text. Providers may send chunks
/// that carry no text (role announcements, keep-alives); those have
/// `content: None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chunk {
    pub content: Option<String>,
}

impl Chunk {
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            content: Some(s.into()),
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }
}

pub type ChunkStream = BoxStream<'static, Result<Chunk, StreamError>>;

/// Anything that can answer a conversation with a chunk stream.
///
/// `open` does only local work (building the request); network failures
/// are delivered through the stream.
pub trait ResponseSource: Send + Sync {
    fn open(&self, history: &[Message]) -> Result<ChunkStream, StreamError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Build the source for a session's mode.
pub fn source_for(config: &ChatConfig, mode: ResponseMode) -> Result<Arc<dyn ResponseSource>, StreamError> {
    match mode {
        ResponseMode::Simulated => {
            tracing::info!("No Hugging Face token provided, using simulation mode");
            Ok(Arc::new(ScriptedSource::new(config.reveal_interval)))
        }
        ResponseMode::Live => {
            let client = InferenceClient::new(config)?;
            tracing::info!(model = %client.name(), "Using Hugging Face inference");
            Ok(Arc::new(client))
        }
    }
}
