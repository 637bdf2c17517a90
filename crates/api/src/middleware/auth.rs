//! Token-based authentication extractor for the JSON API.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use carlot_core::error::CoreError;
use carlot_core::ownership::Caller;
use carlot_core::types::DbId;
use carlot_db::repositories::ApiTokenRepo;

use crate::auth::token::extract_token_key;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
}

impl AuthUser {
    pub fn caller(self) -> Caller {
        Caller::User(self.user_id)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = extract_token_key(&parts.headers)
            .map_err(|msg| AppError::Core(CoreError::Unauthorized(msg.into())))?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Authentication credentials were not provided.".into(),
                ))
            })?;

        let token = ApiTokenRepo::find_by_key(&state.pool, &key)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid token.".into())))?;

        Ok(AuthUser {
            user_id: token.user_id,
        })
    }
}
