//! Aggregate statistics queries.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use starcrunch_core::{Error, FocusStats, Result, StatsRepository, TaskStats, UserStats};

/// PostgreSQL statistics provider.
#[derive(Clone)]
pub struct PgStatsRepository {
    pool: Pool<Postgres>,
}

impl PgStatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn task_stats(&self, user_id: &str) -> Result<TaskStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total_tasks,
                    COUNT(*) FILTER (WHERE completed) AS completed_tasks,
                    COUNT(*) FILTER (WHERE NOT completed AND priority = 'high') AS high_priority_pending,
                    AVG(duration)::FLOAT8 AS avg_duration
             FROM tasks WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(TaskStats {
            total_tasks: row.get("total_tasks"),
            completed_tasks: row.get("completed_tasks"),
            high_priority_pending: row.get("high_priority_pending"),
            avg_duration: row.get("avg_duration"),
        })
    }

    /// Sessions started since midnight (database time zone).
    async fn focus_stats_today(&self, user_id: &str) -> Result<FocusStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total_sessions,
                    COUNT(*) FILTER (WHERE completed) AS completed_sessions,
                    COALESCE(SUM(duration) FILTER (WHERE completed), 0)::BIGINT AS total_focus_time
             FROM focus_sessions
             WHERE user_id = $1 AND started_at >= date_trunc('day', NOW())",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(FocusStats {
            total_sessions: row.get("total_sessions"),
            completed_sessions: row.get("completed_sessions"),
            total_focus_time: row.get("total_focus_time"),
        })
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        let tasks = self.task_stats(user_id).await?;
        let focus = self.focus_stats_today(user_id).await?;
        Ok(UserStats { tasks, focus })
    }
}
