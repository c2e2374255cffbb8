//! # starcrunch-inference
//!
//! Completion API access for Starcrunch.
//!
//! This crate provides:
//! - An OpenAI-compatible chat-completions backend (Groq by default)
//! - [`AiDelegate`], which asks the model to enhance parsed task drafts and
//!   falls back to the rule-based drafts when anything goes wrong
//! - A mock backend for tests (feature `mock`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use starcrunch_inference::{AiConfig, AiDelegate};
//!
//! let delegate = AiDelegate::from_config(&AiConfig::from_env())?;
//! let outcome = delegate.enhance("dentist 2pm tuesday", drafts, &prefs).await;
//! println!("{}", outcome.provenance);
//! ```

pub mod config;
pub mod delegate;
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::AiConfig;
pub use delegate::{extract_json, AiDelegate, DelegateOutcome, Provenance};
pub use openai::{OpenAIBackend, OpenAIConfig};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockBackend;
