//! OpenAI-compatible chat backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use starcrunch_core::{defaults, Error, GenerationBackend, Result};

use super::error::{to_core_error, OpenAIErrorCode};
use super::types::*;

/// Configuration for the chat backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint, e.g. `https://api.groq.com/openai/v1`.
    pub base_url: String,
    /// Bearer token (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model used for generation.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whole-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GROQ_BASE_URL.to_string(),
            api_key: None,
            model: defaults::GROQ_MODEL.to_string(),
            temperature: defaults::AI_TEMPERATURE,
            max_tokens: defaults::AI_MAX_TOKENS,
            timeout_seconds: defaults::AI_TIMEOUT_SECS,
        }
    }
}

/// Chat-completions backend.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            base_url = %config.base_url,
            model = %config.model,
            "Initializing chat backend"
        );

        Ok(Self { client, config })
    }

    /// Same endpoint and HTTP client, different model.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            config: OpenAIConfig {
                model: model.into(),
                ..self.config.clone()
            },
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let start = Instant::now();
        let prompt_len: usize = messages.iter().map(|m| m.content.len()).sum();

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            stream: false,
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response
                .json()
                .await
                .unwrap_or_else(|_| OpenAIErrorResponse::unknown());
            let kind = body.error.code.as_deref().unwrap_or(body.error.error_type.as_str());
            let code = OpenAIErrorCode::from_response(status.as_u16(), kind);
            warn!(
                subsystem = "inference",
                component = "openai",
                model = %self.config.model,
                status = status.as_u16(),
                error_code = ?code,
                retryable = code.is_retryable(),
                "Completion API returned an error"
            );
            return Err(to_core_error(code, &body.error.message));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse completion response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Completion response had no choices".to_string()))?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "chat",
            model = %self.config.model,
            prompt_len,
            response_len = content.len(),
            total_tokens = result.usage.as_ref().map(|u| u.total_tokens),
            duration_ms = start.elapsed().as_millis() as u64,
            "Completion finished"
        );

        Ok(content)
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(vec![ChatMessage::user(prompt)]).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));
        self.chat(messages).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
