//! Focus session repository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use starcrunch_core::{
    new_id, Error, FocusSession, FocusSessionRepository, Result, SessionKind,
};

const SESSION_COLUMNS: &str = "id, user_id, kind, duration, completed, started_at, ended_at";

/// PostgreSQL focus session repository.
#[derive(Clone)]
pub struct PgFocusSessionRepository {
    pool: Pool<Postgres>,
}

impl PgFocusSessionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> FocusSession {
        let kind: String = row.get("kind");
        let duration: i32 = row.get("duration");
        FocusSession {
            id: row.get("id"),
            user_id: row.get("user_id"),
            kind: kind.parse().unwrap_or(SessionKind::FocusInterval),
            duration: duration.max(0) as u32,
            completed: row.get("completed"),
            started_at: row.get("started_at"),
            ended_at: row.get("ended_at"),
        }
    }
}

#[async_trait]
impl FocusSessionRepository for PgFocusSessionRepository {
    async fn start(&self, user_id: &str, kind: SessionKind, duration: u32) -> Result<FocusSession> {
        let row = sqlx::query(&format!(
            "INSERT INTO focus_sessions (id, user_id, kind, duration)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(new_id())
        .bind(user_id)
        .bind(kind.as_str())
        .bind(duration as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let session = Self::parse_row(&row);
        debug!(
            subsystem = "db",
            component = "focus_sessions",
            op = "start",
            user_id,
            kind = %kind,
            duration,
            "Focus session started"
        );
        Ok(session)
    }

    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<FocusSession>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM focus_sessions WHERE user_id = $1
             ORDER BY started_at DESC LIMIT $2",
            SESSION_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn complete(&self, user_id: &str, session_id: &str) -> Result<FocusSession> {
        let row = sqlx::query(&format!(
            "UPDATE focus_sessions
             SET completed = TRUE, ended_at = COALESCE(ended_at, NOW())
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Error::NotFound(format!("Focus session {}", session_id)))
    }
}
