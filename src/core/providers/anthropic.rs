//! Anthropic Messages API provider

use crate::core::config::AnthropicConfig;
use crate::core::constants::{anthropic, role};
use crate::core::provider::{Completion, CompletionProvider, ProviderError, TokenUsage};
use crate::models::anthropic::{AnthropicMessage, ErrorEnvelope, MessagesRequest, MessagesResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Provider for Anthropic's Messages API
pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// A missing API key is allowed; every completion then fails with
    /// [`ProviderError::NotConfigured`] without touching the network.
    pub fn new(config: &AnthropicConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Map Anthropic error bodies to actionable messages
    fn classify_error(error_body: &str) -> String {
        let detail = serde_json::from_str::<ErrorEnvelope>(error_body)
            .map(|envelope| {
                if envelope.error.message.is_empty() {
                    envelope.error.error_type
                } else {
                    envelope.error.message
                }
            })
            .unwrap_or_else(|_| error_body.to_string());
        let error_lower = error_body.to_lowercase();

        if error_lower.contains("authentication_error") || error_lower.contains("x-api-key") {
            return "Invalid API key. Please check your ANTHROPIC_API_KEY configuration."
                .to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("overloaded") {
            return "Rate limit exceeded. Please wait and try again.".to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not_found") || error_lower.contains("not found"))
        {
            return "Model not found. Please check your ANTHROPIC_MODEL configuration.".to_string();
        }

        if error_lower.contains("credit balance") || error_lower.contains("billing") {
            return "Billing issue. Please check your Anthropic account credit balance."
                .to_string();
        }

        detail
    }

    fn build_request(&self, prompt: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![AnthropicMessage {
                role: role::USER.to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let request = self.build_request(prompt);

        debug!(
            "Sending completion request: model={}, prompt_chars={}",
            request.model,
            prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", anthropic::API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Unexpected(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let classified_error = Self::classify_error(&error_text);

            return Err(match status.as_u16() {
                401 => ProviderError::Authentication(classified_error),
                429 => ProviderError::RateLimit(classified_error),
                400 => ProviderError::BadRequest(classified_error),
                _ => ProviderError::ApiError {
                    status: status.as_u16(),
                    message: classified_error,
                },
            });
        }

        let message: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unexpected(format!("Failed to parse response: {}", e)))?;

        let text = message
            .first_text()
            .ok_or(ProviderError::EmptyResponse)?
            .to_string();

        debug!(
            "Completion {} finished: stop_reason={:?}, output_tokens={}",
            message.id, message.stop_reason, message.usage.output_tokens
        );

        Ok(Completion {
            text,
            usage: TokenUsage {
                input_tokens: message.usage.input_tokens,
                output_tokens: message.usage.output_tokens,
                cache_creation_tokens: message.usage.cache_creation_input_tokens.unwrap_or(0),
                cache_read_tokens: message.usage.cache_read_input_tokens.unwrap_or(0),
            },
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn provider_name(&self) -> &str {
        "Anthropic"
    }
}
