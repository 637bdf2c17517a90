//! Repository for the `listings` table.
//!
//! Reads always join the owner so callers get a complete [`Listing`].
//! The owner id is only ever written by [`ListingRepo::create`]; updates
//! touch the editable fields and `updated_at`, nothing else.

use chrono::Utc;
use sqlx::SqlitePool;
use carlot_core::listing::ListingFields;
use carlot_core::types::DbId;

use crate::models::listing::{Listing, ListingRow};

const SELECT_WITH_OWNER: &str = "SELECT l.id, l.make, l.model, l.year, l.description, \
        l.created_at, l.updated_at, l.owner_id, \
        u.username AS owner_username, u.email AS owner_email \
     FROM listings l \
     JOIN users u ON u.id = l.owner_id";

/// Provides CRUD operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a listing owned by `owner_id`, returning it with owner info.
    pub async fn create(
        pool: &SqlitePool,
        owner_id: DbId,
        fields: &ListingFields,
    ) -> Result<Listing, sqlx::Error> {
        let now = Utc::now();
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO listings (make, model, year, description, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING id",
        )
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(fields.year)
        .bind(&fields.description)
        .bind(owner_id)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a listing by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("{SELECT_WITH_OWNER} WHERE l.id = ?1");
        let row = sqlx::query_as::<_, ListingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Listing::from))
    }

    /// List all listings in creation order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!("{SELECT_WITH_OWNER} ORDER BY l.id ASC");
        let rows = sqlx::query_as::<_, ListingRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    /// Replace the editable fields of a listing and bump `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        fields: &ListingFields,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET
                make = ?2,
                model = ?3,
                year = ?4,
                description = ?5,
                updated_at = ?6
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(fields.year)
        .bind(&fields.description)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete a listing. Its comments cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
