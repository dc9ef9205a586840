//! Upstream completion API client
//!
//! Encapsulates the single outbound call the chat relay makes.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::ChatCompletionMessage;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::prompt_builder::chat_messages_json;
use crate::core::config::RelayConfig;
use crate::errors::RelayError;

pub const MODEL: &str = "gpt-4o-mini";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;

/// Body of a non-streaming Chat Completions request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Value>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl CompletionRequest {
    /// Wraps a conversation with the fixed model and sampling settings.
    #[must_use]
    pub fn new(prompt: &[ChatCompletionMessage]) -> Self {
        Self {
            model: MODEL.to_string(),
            messages: chat_messages_json(prompt),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        }
    }
}

/// The upstream text-completion service.
///
/// Implementations return the raw JSON body of a successful response; reply
/// extraction is left to the caller.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, RelayError>;
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct HttpCompletionClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl HttpCompletionClient {
    /// # Errors
    ///
    /// Returns [`RelayError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RelayError::Http(format!("Failed to build upstream HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.completions_endpoint(),
            api_key: config.api_key.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionApi for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, RelayError> {
        #[cfg(feature = "debug-logs")]
        debug!("Upstream completion request: {:?}", request);

        info!(
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(RelayError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received completion response");
        serde_json::from_str(&body).map_err(RelayError::from)
    }
}
