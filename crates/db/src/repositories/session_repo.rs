//! Repository for the `sessions` table.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::session::{CreateSession, Session};

const COLUMNS: &str = "id, user_id, expires_at, created_at";

/// Provides create, lookup and revocation for page sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (id, user_id, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(&input.id)
            .bind(input.user_id)
            .bind(input.expires_at)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a session by id. Expired sessions are treated as absent.
    pub async fn find_active(pool: &SqlitePool, id: &str) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = ?1");
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        let now = Utc::now();
        Ok(session.filter(|s| !s.is_expired_at(now)))
    }

    /// Delete a single session. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
