//! Task repository.
//!
//! The completion timestamp is written in the same statement as the flag in
//! every path, and a table `CHECK` rejects any row where the two disagree.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use starcrunch_core::{
    new_id, CreateTaskRequest, Error, ListTasksFilter, PreferredPeriod, Result, Task,
    TaskCategory, TaskPriority, TaskRepository, UpdateTaskRequest,
};

const TASK_COLUMNS: &str = "id, user_id, text, category, priority, completed, duration, \
     scheduled_time, scheduled_day, preferred_time, is_appointment, ai_enhanced, adhd_tips, \
     scheduling_suggestions, created_at, completed_at, updated_at";

/// PostgreSQL task repository.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: Pool<Postgres>,
}

impl PgTaskRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> Task {
        let category: String = row.get("category");
        let priority: String = row.get("priority");
        let preferred_time: Option<String> = row.get("preferred_time");
        let duration: i32 = row.get("duration");
        let Json(adhd_tips): Json<Vec<String>> = row.get("adhd_tips");
        let Json(scheduling_suggestions): Json<Vec<String>> = row.get("scheduling_suggestions");

        Task {
            id: row.get("id"),
            user_id: row.get("user_id"),
            text: row.get("text"),
            category: str_to_category(&category),
            priority: str_to_priority(&priority),
            completed: row.get("completed"),
            duration: duration.max(0) as u32,
            scheduled_time: row.get("scheduled_time"),
            scheduled_day: row.get("scheduled_day"),
            preferred_time: preferred_time.and_then(|p| p.parse::<PreferredPeriod>().ok()),
            is_appointment: row.get("is_appointment"),
            ai_enhanced: row.get("ai_enhanced"),
            adhd_tips,
            scheduling_suggestions,
            created_at: row.get("created_at"),
            completed_at: row.get("completed_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// Column CHECKs keep these in range; anything else reads as the default.
fn str_to_category(s: &str) -> TaskCategory {
    s.parse().unwrap_or(TaskCategory::Generic)
}

fn str_to_priority(s: &str) -> TaskPriority {
    s.parse().unwrap_or(TaskPriority::Medium)
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn insert(&self, user_id: &str, req: CreateTaskRequest) -> Result<Task> {
        let id = new_id();
        let row = sqlx::query(&format!(
            "INSERT INTO tasks (id, user_id, text, category, priority, duration, scheduled_time,
                                scheduled_day, preferred_time, is_appointment, ai_enhanced,
                                adhd_tips, scheduling_suggestions)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&id)
        .bind(user_id)
        .bind(req.text.trim())
        .bind(req.category.as_str())
        .bind(req.priority.as_str())
        .bind(req.duration as i32)
        .bind(&req.scheduled_time)
        .bind(&req.scheduled_day)
        .bind(req.preferred_time.map(|p| p.as_str()))
        .bind(req.is_appointment)
        .bind(req.ai_enhanced)
        .bind(Json(&req.adhd_tips))
        .bind(Json(&req.scheduling_suggestions))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "tasks",
            op = "insert",
            user_id,
            task_id = %id,
            category = %req.category,
            "Task stored"
        );
        Ok(Self::parse_row(&row))
    }

    async fn list(&self, user_id: &str, filter: ListTasksFilter) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tasks
             WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR completed = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(filter.completed)
        .bind(filter.limit.unwrap_or(starcrunch_core::defaults::PAGE_LIMIT))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn fetch(&self, user_id: &str, task_id: &str) -> Result<Task> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    async fn update(&self, user_id: &str, task_id: &str, req: UpdateTaskRequest) -> Result<Task> {
        let row = sqlx::query(&format!(
            "UPDATE tasks SET
                text = COALESCE($3, text),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority),
                duration = COALESCE($6, duration),
                scheduled_time = CASE WHEN $7 THEN $8 ELSE scheduled_time END,
                scheduled_day = CASE WHEN $9 THEN $10 ELSE scheduled_day END,
                is_appointment = COALESCE($11, is_appointment),
                completed = COALESCE($12, completed),
                completed_at = CASE
                    WHEN $12::BOOLEAN IS NULL THEN completed_at
                    WHEN $12 THEN COALESCE(completed_at, NOW())
                    ELSE NULL
                END,
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(user_id)
        .bind(req.text.as_deref().map(str::trim))
        .bind(req.category.map(|c| c.as_str()))
        .bind(req.priority.map(|p| p.as_str()))
        .bind(req.duration.map(|d| d as i32))
        .bind(req.scheduled_time.is_some())
        .bind(req.scheduled_time.flatten())
        .bind(req.scheduled_day.is_some())
        .bind(req.scheduled_day.flatten())
        .bind(req.is_appointment)
        .bind(req.completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    async fn set_completed(&self, user_id: &str, task_id: &str, completed: bool) -> Result<Task> {
        let row = sqlx::query(&format!(
            "UPDATE tasks SET
                completed = $3,
                completed_at = CASE WHEN $3 THEN NOW() ELSE NULL END,
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(user_id)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let task = row
            .as_ref()
            .map(Self::parse_row)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        let op = if completed { "complete" } else { "reopen" };
        debug!(
            subsystem = "db",
            component = "tasks",
            op,
            user_id,
            task_id,
            "Task completion changed"
        );
        Ok(task)
    }

    async fn delete(&self, user_id: &str, task_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::TaskNotFound(task_id.to_string()));
        }
        Ok(())
    }

    async fn find_pending(&self, user_id: &str, needle: &str) -> Result<Option<Task>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tasks
             WHERE user_id = $1 AND completed = FALSE
               AND (id = $2 OR LOWER(text) = LOWER($2))
             ORDER BY created_at ASC
             LIMIT 1",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(needle.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::parse_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_stored_values_fall_back() {
        assert_eq!(str_to_category("errands"), TaskCategory::Errand);
        assert_eq!(str_to_category("bogus"), TaskCategory::Generic);
        assert_eq!(str_to_priority("HIGH"), TaskPriority::High);
        assert_eq!(str_to_priority(""), TaskPriority::Medium);
    }

    #[test]
    fn test_columns_cover_every_task_field() {
        for col in [
            "preferred_time",
            "adhd_tips",
            "scheduling_suggestions",
            "completed_at",
            "ai_enhanced",
        ] {
            assert!(TASK_COLUMNS.contains(col), "missing column {col}");
        }
    }
}
