// src/services/provider.rs
use async_trait::async_trait;
use thiserror::Error;

use crate::message::ChatMessage;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
    #[error("completion contained no text")]
    EmptyCompletion,
}

/// A service that turns an ordered list of turns into generated text.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        temperature: f32,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError>;
}
