//! Comment entity model.

use serde::Serialize;
use sqlx::FromRow;
use carlot_core::types::{DbId, Timestamp};

/// A comment joined with its author's username.
///
/// Serializes as `{id, content, created_at, car, author}` where `car` is the
/// parent listing id and `author` the username.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    #[serde(rename = "car")]
    pub listing_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    #[serde(rename = "author")]
    pub author_username: String,
}
