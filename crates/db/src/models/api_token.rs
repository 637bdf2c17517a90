//! API token model.

use sqlx::FromRow;
use carlot_core::types::{DbId, Timestamp};

/// Opaque bearer credential, one per user.
#[derive(Debug, Clone, FromRow)]
pub struct ApiToken {
    pub key: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
}
