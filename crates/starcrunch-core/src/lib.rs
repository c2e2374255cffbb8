//! # starcrunch-core
//!
//! Core types, traits, and task heuristics for Starcrunch.
//!
//! This crate holds everything that does not touch the network or the
//! database: models, the error type, repository and generation traits, the
//! keyword categorizer, the task parser, scheduling assignment and the emote
//! table.

pub mod categorizer;
pub mod defaults;
pub mod emotes;
pub mod error;
pub mod models;
pub mod parser;
pub mod scheduling;
pub mod traits;
pub mod uuid_utils;
pub mod validation;

// Re-export commonly used types at crate root
pub use categorizer::{categorize, Categorization};
pub use emotes::{render_chat, Emote};
pub use error::{Error, Result};
pub use models::*;
pub use parser::{parse_task, parse_tasks, TaskDraft};
pub use scheduling::{assign, assign_all, Exclusion};
pub use traits::*;
pub use uuid_utils::{new_id, new_v7};
