//! Mock generation backend for deterministic tests.
//!
//! ```rust,ignore
//! use starcrunch_inference::MockBackend;
//!
//! let backend = MockBackend::new()
//!     .with_model("llama-test")
//!     .with_response(r#"{"tasks": [{"category": "work"}]}"#);
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use starcrunch_core::{Error, GenerationBackend, Result};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// A recorded call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

/// Backend that answers with a canned reply or a canned failure.
///
/// Clones share the call log.
#[derive(Debug, Clone)]
pub struct MockBackend {
    model: String,
    reply: MockReply,
    latency: Duration,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            reply: MockReply::Text("Mock response".to_string()),
            latency: Duration::ZERO,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.reply = MockReply::Text(response.into());
        self
    }

    /// Every call fails with `Error::Inference(message)`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.reply = MockReply::Fail(message.into());
        self
    }

    /// Simulated latency (uses `tokio::time`, so paused clocks apply).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(MockCall {
                system: system.to_string(),
                prompt: prompt.to_string(),
            });

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(Error::Inference(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_call_log() {
        let backend = MockBackend::new().with_response("hello");
        let clone = backend.clone();
        assert_eq!(clone.generate("hi").await.unwrap(), "hello");
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.calls()[0].prompt, "hi");
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MockBackend::new().failing("nope");
        let err = backend.generate("hi").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }
}
