//! Learning rule storage. Rules are kept and listed; nothing evaluates them.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use starcrunch_core::{
    new_id, CreateLearningRuleRequest, Error, LearningRule, LearningRuleRepository, Result,
};

/// PostgreSQL learning rule repository.
#[derive(Clone)]
pub struct PgLearningRuleRepository {
    pool: Pool<Postgres>,
}

impl PgLearningRuleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> LearningRule {
        LearningRule {
            id: row.get("id"),
            user_id: row.get("user_id"),
            rule_type: row.get("rule_type"),
            pattern: row.get("pattern"),
            action: row.get("action"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl LearningRuleRepository for PgLearningRuleRepository {
    async fn insert(&self, user_id: &str, req: CreateLearningRuleRequest) -> Result<LearningRule> {
        let row = sqlx::query(
            "INSERT INTO learning_rules (id, user_id, rule_type, pattern, action)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, rule_type, pattern, action, created_at",
        )
        .bind(new_id())
        .bind(user_id)
        .bind(req.rule_type.trim())
        .bind(&req.pattern)
        .bind(&req.action)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Self::parse_row(&row))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<LearningRule>> {
        let rows = sqlx::query(
            "SELECT id, user_id, rule_type, pattern, action, created_at
             FROM learning_rules WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn delete(&self, user_id: &str, rule_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM learning_rules WHERE id = $1 AND user_id = $2")
            .bind(rule_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Learning rule {}", rule_id)));
        }
        Ok(())
    }
}
