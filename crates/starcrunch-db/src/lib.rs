//! # starcrunch-db
//!
//! PostgreSQL database layer for Starcrunch.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, tasks, daily notes, learning
//!   rules and focus sessions
//! - Aggregate statistics
//! - Embedded migrations (feature `migrations`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use starcrunch_db::{Database, ListTasksFilter, TaskRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/starcrunch").await?;
//!     let tasks = db.tasks.list("123456789012345678", ListTasksFilter::default()).await?;
//!     println!("{} tasks", tasks.len());
//!     Ok(())
//! }
//! ```
pub mod focus_sessions;
pub mod learning_rules;
pub mod notes;
pub mod pool;
pub mod stats;
pub mod tasks;
pub mod users;

// Test fixtures for integration tests
pub mod test_fixtures;

// Re-export core types
pub use starcrunch_core::*;

// Re-export repository implementations
pub use focus_sessions::PgFocusSessionRepository;
pub use learning_rules::PgLearningRuleRepository;
pub use notes::PgDailyNoteRepository;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use stats::PgStatsRepository;
pub use tasks::PgTaskRepository;
pub use users::PgUserRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub users: PgUserRepository,
    pub tasks: PgTaskRepository,
    pub notes: PgDailyNoteRepository,
    pub learning_rules: PgLearningRuleRepository,
    pub focus_sessions: PgFocusSessionRepository,
    pub stats: PgStatsRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            tasks: PgTaskRepository::new(pool.clone()),
            notes: PgDailyNoteRepository::new(pool.clone()),
            learning_rules: PgLearningRuleRepository::new(pool.clone()),
            focus_sessions: PgFocusSessionRepository::new(pool.clone()),
            stats: PgStatsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Create without connecting; the first query opens the connection.
    pub fn connect_lazy(url: &str) -> Result<Self> {
        let pool = create_lazy_pool(url, PoolConfig::default())?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
