//! User repository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use starcrunch_core::{Error, Result, User, UserPreferences, UserRepository};

const USER_COLUMNS: &str = "id, preferences, created_at, updated_at";

/// PostgreSQL user repository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> Result<User> {
        let raw: serde_json::Value = row.get("preferences");
        let preferences: UserPreferences = serde_json::from_value(raw)?;
        Ok(User {
            id: row.get("id"),
            preferences,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(Self::parse_row).transpose()
    }

    async fn ensure(&self, user_id: &str) -> Result<User> {
        let defaults = serde_json::to_value(UserPreferences::default())?;
        // The no-op update makes RETURNING yield the existing row as well
        let row = sqlx::query(&format!(
            "INSERT INTO users (id, preferences) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET id = users.id
             RETURNING {}, (xmax = 0) AS inserted",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(defaults)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let inserted: bool = row.get("inserted");
        if inserted {
            debug!(subsystem = "db", component = "users", op = "create", user_id, "New user");
        }
        Self::parse_row(&row)
    }

    async fn update_preferences(&self, user_id: &str, prefs: &UserPreferences) -> Result<User> {
        let value = serde_json::to_value(prefs)?;
        let row = sqlx::query(&format!(
            "INSERT INTO users (id, preferences) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET preferences = EXCLUDED.preferences, updated_at = NOW()
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "users",
            op = "update_preferences",
            user_id,
            excluded = prefs.excluded_times.len(),
            "Preferences saved"
        );
        Self::parse_row(&row)
    }
}
