//! Route definitions for the `/auth` API resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Registration and login routes.
///
/// ```text
/// POST /auth/register/  -> register
/// POST /auth/login/     -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register/", post(auth::register))
        .route("/auth/login/", post(auth::login))
}
