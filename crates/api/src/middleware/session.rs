//! Session-cookie extractor for the page surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use carlot_core::ownership::Caller;
use carlot_db::models::user::UserSummary;
use carlot_db::repositories::{SessionRepo, UserRepo};

use crate::auth::session::{extract_session_token, validate_session_token};
use crate::error::PageError;
use crate::state::AppState;

/// The visitor behind a page request.
///
/// A missing, expired, forged, revoked or orphaned session cookie all
/// resolve to an anonymous visitor rather than an error; pages that need a user turn that
/// into a redirect through [`SessionUser::require`].
#[derive(Debug, Clone, Default)]
pub struct SessionUser(pub Option<UserSummary>);

impl SessionUser {
    pub fn caller(&self) -> Caller {
        Caller::from_user_id(self.0.as_ref().map(|u| u.id))
    }

    /// The signed-in user, or a redirect to the login page.
    pub fn require(&self) -> Result<&UserSummary, PageError> {
        self.0.as_ref().ok_or(PageError::LoginRequired)
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_session_token(&parts.headers) else {
            return Ok(Self(None));
        };

        let claims = match validate_session_token(&token, &state.config.session) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
                return Ok(Self(None));
            }
        };

        let session = SessionRepo::find_active(&state.pool, &claims.jti).await?;
        if !session.is_some_and(|s| s.user_id == claims.sub) {
            tracing::debug!(jti = %claims.jti, "Ignoring session cookie with no active session");
            return Ok(Self(None));
        }

        let user = UserRepo::find_by_id(&state.pool, claims.sub).await?;
        Ok(Self(user.as_ref().map(UserSummary::from)))
    }
}
