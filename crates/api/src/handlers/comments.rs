//! Handlers for `/api/cars/{id}/comments`.
//!
//! The parent listing always comes from the path and the author from the
//! token. There is no update or delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use carlot_core::comment::validate_content;
use carlot_core::ownership::require_user;
use carlot_core::types::DbId;
use carlot_db::models::comment::Comment;
use carlot_db::repositories::comment_repo::CommentOrder;
use carlot_db::repositories::CommentRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::handlers::listings::find_listing;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/cars/{id}/comments/`.
#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub content: Option<String>,
}

/// GET /api/cars/{id}/comments/
///
/// Oldest first.
pub async fn list(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<Vec<Comment>>> {
    find_listing(&state, listing_id).await?;
    let comments =
        CommentRepo::list_for_listing(&state.pool, listing_id, CommentOrder::OldestFirst).await?;
    Ok(Json(comments))
}

/// POST /api/cars/{id}/comments/
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    ApiJson(input): ApiJson<CommentPayload>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let author_id = require_user(user.caller())?;
    find_listing(&state, listing_id).await?;
    let content = validate_content(input.content.as_deref())?;

    let comment = CommentRepo::create(&state.pool, listing_id, author_id, &content).await?;
    tracing::info!(
        comment_id = comment.id,
        listing_id,
        user_id = author_id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(comment)))
}
