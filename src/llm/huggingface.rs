//! Hugging Face inference provider
//!
//! Talks to the router's OpenAI-compatible `chat/completions` endpoint with
//! `stream: true`. The provider is selected by suffixing the model id
//! (`openai/gpt-oss-120b:novita`).

use super::sse::{SseDecoder, SseFrame};
use super::types::{ChatCompletionChunk, ChatCompletionRequest, ErrorResponse, WireMessage};
use super::{Chunk, ChunkStream, ResponseSource, StreamError};
use crate::config::ChatConfig;
use crate::conversation::Message;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Client;

/// Provider value meaning "let the router pick"
const AUTO_PROVIDER: &str = "auto";

/// Longest error body echoed into logs
const MAX_ERROR_DETAIL: usize = 500;

pub struct InferenceClient {
    client: Client,
    token: String,
    endpoint: String,
    model: String,
}

impl InferenceClient {
    pub fn new(config: &ChatConfig) -> Result<Self, StreamError> {
        let token = config
            .hf_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StreamError::auth("No Hugging Face token configured"))?
            .to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            token,
            endpoint: config.endpoint.clone(),
            model: routed_model(&config.model, &config.provider),
        })
    }

    fn translate_request(&self, history: &[Message]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: history.iter().map(WireMessage::from).collect(),
            stream: true,
        }
    }
}

impl ResponseSource for InferenceClient {
    fn open(&self, history: &[Message]) -> Result<ChunkStream, StreamError> {
        let body = self.translate_request(history);
        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, "text/event-stream")
            .json(&body)
            .build()?;

        tracing::debug!(
            model = %self.model,
            messages = body.messages.len(),
            "Opening chat completion stream"
        );

        Ok(chunk_stream(self.client.clone(), request))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn routed_model(model: &str, provider: &str) -> String {
    let provider = provider.trim();
    if provider.is_empty() || provider == AUTO_PROVIDER {
        model.to_string()
    } else {
        format!("{model}:{provider}")
    }
}

/// Sends the request on first poll and yields one item per `data:` frame.
/// Ends after `[DONE]`, end of body, or the first error.
fn chunk_stream(client: Client, request: reqwest::Request) -> ChunkStream {
    let stream = async_stream::stream! {
        let response = match client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                yield Err(StreamError::from(e));
                return;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            yield Err(StreamError::from_status(status.as_u16(), &error_detail(&body)));
            return;
        }

        let mut body = Box::pin(response.bytes_stream());
        let mut decoder = SseDecoder::default();
        let mut exhausted = false;

        while !exhausted {
            let frames = match body.next().await {
                Some(Ok(bytes)) => decoder.feed(&bytes),
                Some(Err(e)) => {
                    yield Err(StreamError::from(e));
                    return;
                }
                None => {
                    exhausted = true;
                    decoder.finish().into_iter().collect()
                }
            };

            for frame in frames {
                match frame {
                    SseFrame::Done => return,
                    SseFrame::Data(data) => match parse_payload(&data) {
                        Ok(chunk) => {
                            yield Ok(chunk);
                        }
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    },
                }
            }
        }
    };
    stream.boxed()
}

fn parse_payload(data: &str) -> Result<Chunk, StreamError> {
    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(ChatCompletionChunk {
            error: Some(error), ..
        }) => Err(StreamError::server_error(format!(
            "Provider error: {}",
            error.message()
        ))),
        Ok(chunk) => Ok(Chunk {
            content: chunk.into_content(),
        }),
        Err(e) => Err(StreamError::decode(format!(
            "Failed to parse chunk: {e} - data: {}",
            truncate(data)
        ))),
    }
}

fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| truncate(body.trim()), |resp| resp.error.message())
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_ERROR_DETAIL).collect()
}
