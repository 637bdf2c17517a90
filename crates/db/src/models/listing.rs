//! Listing entity model.

use serde::Serialize;
use sqlx::FromRow;
use carlot_core::types::{DbId, Timestamp};

use crate::models::user::UserSummary;

/// Flat row produced by joining `listings` with its owner in `users`.
#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
    pub id: DbId,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub owner_id: DbId,
    pub owner_username: String,
    pub owner_email: String,
}

/// A listing together with its owner, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub owner: UserSummary,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            make: row.make,
            model: row.model,
            year: row.year,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            owner: UserSummary {
                id: row.owner_id,
                username: row.owner_username,
                email: row.owner_email,
            },
        }
    }
}
