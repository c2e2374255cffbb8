//! Centralized default constants for Starcrunch.
//!
//! Crates reference these instead of defining their own magic numbers.

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default database URL when `DATABASE_URL` is unset.
pub const DATABASE_URL: &str = "postgres://localhost/starcrunch";

/// Default pool size.
pub const DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// INFERENCE
// =============================================================================

/// OpenAI-compatible base URL of the hosted completion API.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Primary completion model.
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Model used for the single retry after the primary fails.
pub const GROQ_FALLBACK_MODEL: &str = "llama-3.1-8b-instant";

/// Upper bound for one completion round-trip.
pub const AI_TIMEOUT_SECS: u64 = 20;

/// Low temperature keeps the JSON output stable.
pub const AI_TEMPERATURE: f32 = 0.3;

/// Token cap for one completion.
pub const AI_MAX_TOKENS: u32 = 2048;

// =============================================================================
// DISCORD
// =============================================================================

/// Discord REST base URL.
pub const DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Timeout for Discord REST calls (follow-up edits, command registration).
pub const DISCORD_TIMEOUT_SECS: u64 = 10;

/// Pending tasks shown by `show_week`.
pub const SHOW_WEEK_PENDING_LIMIT: i64 = 10;

/// Recently completed tasks shown by `show_week`.
pub const SHOW_WEEK_COMPLETED_LIMIT: i64 = 5;

// =============================================================================
// TASKS
// =============================================================================

/// Smallest accepted per-category duration (minutes).
pub const MIN_TASK_DURATION: u32 = 5;

/// Largest accepted per-category duration (minutes).
pub const MAX_TASK_DURATION: u32 = 480;

/// Maximum task text length in characters.
pub const MAX_TASK_TEXT_LEN: usize = 500;

/// Maximum daily note length in characters.
pub const MAX_NOTE_LEN: usize = 10_000;

/// Days checked when picking a day for a flexible task.
pub const SCHEDULING_HORIZON_DAYS: u32 = 7;

/// Default page size for task and note lists.
pub const PAGE_LIMIT: i64 = 100;

/// Default page size for focus session lists.
pub const FOCUS_PAGE_LIMIT: i64 = 20;

/// Longest focus session accepted (minutes).
pub const MAX_FOCUS_MINUTES: u32 = 240;
