//! Core traits for Starcrunch abstractions.
//!
//! Repositories are implemented by `starcrunch-db`; generation backends by
//! `starcrunch-inference`. Every repository method takes the owning user id
//! so no query can cross users.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Repository for users and their preferences.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user, `None` if they never interacted.
    async fn get(&self, user_id: &str) -> Result<Option<User>>;

    /// Fetch a user, creating them with default preferences on first contact.
    async fn ensure(&self, user_id: &str) -> Result<User>;

    /// Replace the user's preferences, creating the user if needed.
    async fn update_preferences(&self, user_id: &str, prefs: &UserPreferences) -> Result<User>;
}

/// Filter for task listings.
#[derive(Debug, Clone, Default)]
pub struct ListTasksFilter {
    /// Only tasks with this completion state.
    pub completed: Option<bool>,
    pub limit: Option<i64>,
}

/// Repository for task CRUD operations.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a planned task.
    async fn insert(&self, user_id: &str, req: CreateTaskRequest) -> Result<Task>;

    /// List tasks newest first.
    async fn list(&self, user_id: &str, filter: ListTasksFilter) -> Result<Vec<Task>>;

    /// Fetch one task.
    async fn fetch(&self, user_id: &str, task_id: &str) -> Result<Task>;

    /// Apply a partial update.
    async fn update(&self, user_id: &str, task_id: &str, req: UpdateTaskRequest) -> Result<Task>;

    /// Set or clear the completion flag together with its timestamp.
    async fn set_completed(&self, user_id: &str, task_id: &str, completed: bool) -> Result<Task>;

    /// Delete a task.
    async fn delete(&self, user_id: &str, task_id: &str) -> Result<()>;

    /// Find the oldest pending task whose id equals `needle` or whose text
    /// matches it case-insensitively.
    async fn find_pending(&self, user_id: &str, needle: &str) -> Result<Option<Task>>;
}

/// Repository for daily notes.
#[async_trait]
pub trait DailyNoteRepository: Send + Sync {
    /// Insert or update the note for `(user, date_key)`.
    async fn upsert(&self, user_id: &str, date_key: &str, notes: &str) -> Result<DailyNote>;

    /// List notes, latest date first.
    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<DailyNote>>;

    async fn fetch(&self, user_id: &str, date_key: &str) -> Result<DailyNote>;

    async fn delete(&self, user_id: &str, date_key: &str) -> Result<()>;
}

/// Repository for stored learning rules.
#[async_trait]
pub trait LearningRuleRepository: Send + Sync {
    async fn insert(&self, user_id: &str, req: CreateLearningRuleRequest) -> Result<LearningRule>;

    async fn list(&self, user_id: &str) -> Result<Vec<LearningRule>>;

    async fn delete(&self, user_id: &str, rule_id: &str) -> Result<()>;
}

/// Repository for focus sessions.
#[async_trait]
pub trait FocusSessionRepository: Send + Sync {
    /// Start a new session now.
    async fn start(&self, user_id: &str, kind: SessionKind, duration: u32) -> Result<FocusSession>;

    /// Most recent sessions first.
    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<FocusSession>>;

    /// Mark a session completed and stamp its end time.
    async fn complete(&self, user_id: &str, session_id: &str) -> Result<FocusSession>;
}

/// Read-only aggregate queries.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn user_stats(&self, user_id: &str) -> Result<UserStats>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
