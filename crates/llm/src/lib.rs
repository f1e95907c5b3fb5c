//! Completion client
//!
//! OpenAI-compatible wire shape, non-streaming and SSE streaming. No retries:
//! every failure is terminal for the turn and handled by the caller.

pub mod backend;
pub mod prompt;
pub mod sse;

pub use backend::{CompletionClient, CompletionConfig, OpenAiClient};
pub use prompt::{Message, PromptBuilder, Role};
pub use sse::{SseEvent, SseParser};

use thiserror::Error;

/// Completion service errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
