//! Repository for the `comments` table.
//!
//! Comments are insert-only: there is no update or delete here.

use chrono::Utc;
use sqlx::SqlitePool;
use carlot_core::types::DbId;

use crate::models::comment::Comment;

const SELECT_WITH_AUTHOR: &str = "SELECT c.id, c.content, c.created_at, c.listing_id, \
        c.author_id, u.username AS author_username \
     FROM comments c \
     JOIN users u ON u.id = c.author_id";

/// Sort order for a listing's comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOrder {
    OldestFirst,
    NewestFirst,
}

impl CommentOrder {
    fn sql(self) -> &'static str {
        match self {
            Self::OldestFirst => "ORDER BY c.created_at ASC, c.id ASC",
            Self::NewestFirst => "ORDER BY c.created_at DESC, c.id DESC",
        }
    }
}

/// Provides inserts and per-listing reads for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Attach a comment by `author_id` to `listing_id`.
    pub async fn create(
        pool: &SqlitePool,
        listing_id: DbId,
        author_id: DbId,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO comments (content, listing_id, author_id, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )
        .bind(content)
        .bind(listing_id)
        .bind(author_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        let query = format!("{SELECT_WITH_AUTHOR} WHERE c.id = ?1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// All comments on a listing.
    pub async fn list_for_listing(
        pool: &SqlitePool,
        listing_id: DbId,
        order: CommentOrder,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!("{SELECT_WITH_AUTHOR} WHERE c.listing_id = ?1 {}", order.sql());
        sqlx::query_as::<_, Comment>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }

    /// Number of comments on a listing.
    pub async fn count_for_listing(pool: &SqlitePool, listing_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE listing_id = ?1")
            .bind(listing_id)
            .fetch_one(pool)
            .await
    }
}
