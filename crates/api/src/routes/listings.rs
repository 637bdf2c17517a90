//! Route definitions for the `/api/cars` resource and its comments.
//!
//! Paths are absolute and keep their trailing slashes.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, listings};
use crate::state::AppState;

/// Listing and comment routes.
///
/// ```text
/// GET    /api/cars/                 -> list
/// POST   /api/cars/                 -> create (requires token)
/// GET    /api/cars/{id}/            -> get_by_id
/// PUT    /api/cars/{id}/            -> update (owner only)
/// DELETE /api/cars/{id}/            -> delete (owner only)
/// GET    /api/cars/{id}/comments/   -> comments::list
/// POST   /api/cars/{id}/comments/   -> comments::create (requires token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cars/", get(listings::list).post(listings::create))
        .route(
            "/api/cars/{id}/",
            get(listings::get_by_id)
                .put(listings::update)
                .delete(listings::delete),
        )
        .route(
            "/api/cars/{id}/comments/",
            get(comments::list).post(comments::create),
        )
}
