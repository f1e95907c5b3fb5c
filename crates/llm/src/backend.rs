//! Completion client implementations
//!
//! One OpenAI-compatible HTTP client covering both the non-streaming and the
//! SSE-streaming paths. Failures are never retried here; the agent turns them
//! into a user-facing fallback message.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::prompt::Message;
use crate::sse::{SseEvent, SseParser};
use crate::LlmError;

/// Completion service configuration
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// OpenAI-compatible base endpoint, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    /// Bearer credential; optional for local endpoints
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Completion client trait
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// One-shot completion
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// Streaming completion. Deltas go to `tx`; a closed receiver is
    /// tolerated and generation still finishes. Returns the full text.
    async fn complete_stream(
        &self,
        messages: &[Message],
        tx: mpsc::Sender<String>,
    ) -> Result<String, LlmError>;
}

/// OpenAI-compatible HTTP client
pub struct OpenAiClient {
    client: Client,
    config: CompletionConfig,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Result<Self, LlmError> {
        if config.endpoint.trim().is_empty() {
            return Err(LlmError::Configuration("endpoint is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn request(&self, messages: &[Message], stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream,
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, LlmError> {
        let mut builder = self.client.post(self.chat_url()).json(request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = self.request(messages, false);
        let response = self.send(&request).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        tx: mpsc::Sender<String>,
    ) -> Result<String, LlmError> {
        let request = self.request(messages, true);
        let response = self.send(&request).await?;

        let mut stream = response.bytes_stream();
        let mut parser = SseParser::new();
        let mut full_text = String::new();
        let mut receiver_open = true;

        'outer: while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| LlmError::Network(e.to_string()))?;
            for event in parser.push(&chunk) {
                match event {
                    SseEvent::Delta(content) => {
                        full_text.push_str(&content);
                        if receiver_open && tx.send(content).await.is_err() {
                            // Consumer went away; keep accumulating quietly
                            receiver_open = false;
                        }
                    },
                    SseEvent::Done => break 'outer,
                }
            }
        }

        Ok(full_text)
    }
}

/// OpenAI-compatible wire types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: usize,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
