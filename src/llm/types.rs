//! Wire types for OpenAI-compatible chat completion streaming

use crate::conversation::{Message, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role,
            content: msg.content.clone(),
        }
    }
}

/// A `data:` payload. Providers report mid-stream failures with an `error`
/// field; `"error": null` on an ordinary chunk means no error.
#[derive(Debug, Deserialize)]
pub(super) struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

impl ChatCompletionChunk {
    /// Text of the first choice's delta, if any
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Providers report errors either as a bare string or as an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ErrorDetail {
    Text(String),
    Object {
        message: String,
    },
    Other(serde_json::Value),
}

impl ErrorDetail {
    pub fn message(&self) -> String {
        match self {
            ErrorDetail::Text(s) | ErrorDetail::Object { message: s } => s.clone(),
            ErrorDetail::Other(v) => v.to_string(),
        }
    }
}

/// Error body of a non-2xx response
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    pub error: ErrorDetail,
}
