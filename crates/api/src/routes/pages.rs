//! Route definitions for the server-rendered pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Page routes, mounted at the root.
///
/// ```text
/// GET       /                    -> home
/// GET       /car/{id}            -> detail
/// POST      /car/{id}            -> add_comment (signed in)
/// GET|POST  /car/create/         -> create form (signed in)
/// GET|POST  /car/update/{id}     -> update or delete form (owner only)
/// GET|POST  /auth/               -> login / register
/// GET|POST  /logout/             -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/car/{id}", get(pages::detail).post(pages::add_comment))
        .route(
            "/car/create/",
            get(pages::create_form).post(pages::create_submit),
        )
        .route(
            "/car/update/{id}",
            get(pages::update_form).post(pages::update_submit),
        )
        .route("/auth/", get(pages::auth_form).post(pages::auth_submit))
        .route("/logout/", get(pages::logout).post(pages::logout))
}
