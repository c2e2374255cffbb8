//! OpenAI-compatible chat-completions backend.
//!
//! Works with any endpoint speaking the `/chat/completions` protocol. The
//! defaults point at Groq; OpenAI, OpenRouter, vLLM or a local Ollama in
//! compatibility mode work the same way.
//!
//! # Example
//!
//! ```rust,no_run
//! use starcrunch_core::GenerationBackend;
//! use starcrunch_inference::openai::{OpenAIBackend, OpenAIConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         api_key: Some("gsk_...".to_string()),
//!         ..OpenAIConfig::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!     let reply = backend.generate("Say hi to a space dinosaur").await.unwrap();
//!     println!("{}", reply);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig};
pub use error::{to_core_error, OpenAIErrorCode};
pub use types::*;
