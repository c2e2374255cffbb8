//! Daily note repository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use starcrunch_core::{new_id, DailyNote, DailyNoteRepository, Error, Result};

const NOTE_COLUMNS: &str = "id, user_id, date_key, notes, created_at, updated_at";

/// PostgreSQL daily note repository.
#[derive(Clone)]
pub struct PgDailyNoteRepository {
    pool: Pool<Postgres>,
}

impl PgDailyNoteRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> DailyNote {
        DailyNote {
            id: row.get("id"),
            user_id: row.get("user_id"),
            date_key: row.get("date_key"),
            notes: row.get("notes"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn not_found(date_key: &str) -> Error {
        Error::NotFound(format!("No notes for {}", date_key))
    }
}

#[async_trait]
impl DailyNoteRepository for PgDailyNoteRepository {
    async fn upsert(&self, user_id: &str, date_key: &str, notes: &str) -> Result<DailyNote> {
        // The generated id is discarded when the row already exists
        let row = sqlx::query(&format!(
            "INSERT INTO daily_notes (id, user_id, date_key, notes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, date_key)
             DO UPDATE SET notes = EXCLUDED.notes, updated_at = NOW()
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(new_id())
        .bind(user_id)
        .bind(date_key)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Self::parse_row(&row))
    }

    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<DailyNote>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM daily_notes WHERE user_id = $1 ORDER BY date_key DESC LIMIT $2",
            NOTE_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn fetch(&self, user_id: &str, date_key: &str) -> Result<DailyNote> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM daily_notes WHERE user_id = $1 AND date_key = $2",
            NOTE_COLUMNS
        ))
        .bind(user_id)
        .bind(date_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Self::not_found(date_key))
    }

    async fn delete(&self, user_id: &str, date_key: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM daily_notes WHERE user_id = $1 AND date_key = $2")
            .bind(user_id)
            .bind(date_key)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(date_key));
        }
        Ok(())
    }
}
