pub mod auth;
pub mod health;
pub mod listings;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the JSON API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register/                 register (public)
/// /auth/login/                    login (public)
///
/// /api/cars/                      list, create
/// /api/cars/{id}/                 get, update, delete
/// /api/cars/{id}/comments/        list, create
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(listings::router())
}
