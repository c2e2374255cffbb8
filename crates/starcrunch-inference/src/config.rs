//! AI delegate configuration.
//!
//! Loaded from environment variables:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GROQ_API_KEY` | unset (rule-based scheduling only) |
//! | `GROQ_BASE_URL` | `https://api.groq.com/openai/v1` |
//! | `GROQ_MODEL` | `llama-3.3-70b-versatile` |
//! | `GROQ_FALLBACK_MODEL` | `llama-3.1-8b-instant` |
//! | `AI_TIMEOUT_SECS` | 20 |

use std::env;

use starcrunch_core::{defaults, Error, Result};

use crate::openai::OpenAIConfig;

/// Settings for the completion API and the two-model retry.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Without a key the delegate never calls out.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub fallback_model: String,
    /// Per-attempt timeout in seconds.
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::GROQ_BASE_URL.to_string(),
            model: defaults::GROQ_MODEL.to_string(),
            fallback_model: defaults::GROQ_FALLBACK_MODEL.to_string(),
            timeout_seconds: defaults::AI_TIMEOUT_SECS,
            temperature: defaults::AI_TEMPERATURE,
            max_tokens: defaults::AI_MAX_TOKENS,
        }
    }
}

impl AiConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: lookup("GROQ_MODEL").unwrap_or(defaults.model),
            fallback_model: lookup("GROQ_FALLBACK_MODEL").unwrap_or(defaults.fallback_model),
            timeout_seconds: lookup("AI_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }

    /// True when an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "GROQ_BASE_URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.model.is_empty() || self.fallback_model.is_empty() {
            return Err(Error::Config("Model names cannot be empty".to_string()));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config("AI_TIMEOUT_SECS must be positive".to_string()));
        }
        Ok(())
    }

    /// Backend configuration for the primary model.
    pub fn backend_config(&self) -> OpenAIConfig {
        OpenAIConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_seconds: self.timeout_seconds,
        }
    }
}
