//! Repository for the `api_tokens` table.

use chrono::Utc;
use sqlx::SqlitePool;
use carlot_core::types::DbId;

use crate::models::api_token::ApiToken;

const COLUMNS: &str = "key, user_id, created_at";

/// Provides lookup and get-or-create for API tokens.
pub struct ApiTokenRepo;

impl ApiTokenRepo {
    /// Return the user's token, inserting `candidate_key` if they have none.
    ///
    /// Concurrent callers for the same user converge on whichever insert
    /// landed first; the losing candidate is discarded.
    pub async fn get_or_create(
        pool: &SqlitePool,
        user_id: DbId,
        candidate_key: &str,
    ) -> Result<ApiToken, sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT INTO api_tokens (key, user_id, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(candidate_key)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?
        .rows_affected();
        if inserted > 0 {
            tracing::debug!(user_id, "Issued new API token");
        }

        let query = format!("SELECT {COLUMNS} FROM api_tokens WHERE user_id = ?1");
        sqlx::query_as::<_, ApiToken>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Resolve a presented key to its token row.
    pub async fn find_by_key(pool: &SqlitePool, key: &str) -> Result<Option<ApiToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM api_tokens WHERE key = ?1");
        sqlx::query_as::<_, ApiToken>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }
}
