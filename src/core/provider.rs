//! Provider abstraction for LLM completion APIs
//!
//! The HTTP layer depends on this trait rather than on a concrete client so
//! that alternative backends (and test doubles) can be swapped in.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("ANTHROPIC_API_KEY is not configured")]
    NotConfigured,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Response contained no text content")]
    EmptyResponse,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Token usage of one completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cache_creation_tokens: u32,
    pub cache_read_tokens: u32,
}

/// Generated text and its usage counters
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// Trait for LLM API providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a single user prompt and return the generated text
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError>;

    /// Whether credentials are present
    fn is_configured(&self) -> bool;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
