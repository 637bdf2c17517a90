//! Page session model and DTO.

use sqlx::FromRow;
use carlot_core::types::{DbId, Timestamp};

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    /// The `jti` claim of the session cookie.
    pub id: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl Session {
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// DTO for recording a newly issued session.
#[derive(Debug)]
pub struct CreateSession {
    pub id: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}
