//! Handlers for the `/api/cars` resource.
//!
//! Reads are public. Creation needs a token; update and delete additionally
//! need the caller to own the listing. The listing is looked up before the
//! ownership check, so a missing id is 404 for everyone.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use carlot_core::error::CoreError;
use carlot_core::fields::IntegerInput;
use carlot_core::listing::{validate_listing, ListingFields};
use carlot_core::ownership::{authorize_listing_mutation, require_user, ListingAction};
use carlot_core::types::DbId;
use carlot_db::models::listing::Listing;
use carlot_db::repositories::ListingRepo;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for create and update.
///
/// There is no owner field; any `owner` key in the body is ignored. `year`
/// is kept as raw JSON so a wrongly typed value becomes a field error.
#[derive(Debug, Deserialize)]
pub struct ListingPayload {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<Value>,
    pub description: Option<String>,
}

impl ListingPayload {
    fn validate(&self) -> Result<ListingFields, CoreError> {
        validate_listing(
            self.make.as_deref(),
            self.model.as_deref(),
            year_input(self.year.as_ref()),
            self.description.as_deref(),
        )
    }
}

fn year_input(value: Option<&Value>) -> IntegerInput<'_> {
    match value {
        None | Some(Value::Null) => IntegerInput::Missing,
        Some(Value::Number(n)) => n.as_i64().map_or(IntegerInput::Invalid, IntegerInput::Number),
        Some(Value::String(s)) => IntegerInput::Text(s),
        Some(_) => IntegerInput::Invalid,
    }
}

/// GET /api/cars/
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Listing>>> {
    let listings = ListingRepo::list(&state.pool).await?;
    Ok(Json(listings))
}

/// GET /api/cars/{id}/
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Listing>> {
    let listing = find_listing(&state, id).await?;
    Ok(Json(listing))
}

/// POST /api/cars/
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ListingPayload>,
) -> AppResult<(StatusCode, Json<Listing>)> {
    let owner_id = require_user(user.caller())?;
    let fields = input.validate()?;

    let listing = ListingRepo::create(&state.pool, owner_id, &fields).await?;
    tracing::info!(listing_id = listing.id, user_id = owner_id, "Listing created");

    Ok((StatusCode::CREATED, Json(listing)))
}

/// PUT /api/cars/{id}/
///
/// Replaces make, model, year and description. The owner never changes.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<ListingPayload>,
) -> AppResult<Json<Listing>> {
    let existing = find_listing(&state, id).await?;
    authorize(user, &existing, ListingAction::Update)?;
    let fields = input.validate()?;

    let listing = ListingRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;
    tracing::info!(listing_id = id, user_id = user.user_id, "Listing updated");

    Ok(Json(listing))
}

/// DELETE /api/cars/{id}/
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_listing(&state, id).await?;
    authorize(user, &existing, ListingAction::Delete)?;

    if !ListingRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Listing",
            id,
        }
        .into());
    }
    tracing::info!(listing_id = id, user_id = user.user_id, "Listing deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn find_listing(state: &AppState, id: DbId) -> AppResult<Listing> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;
    Ok(listing)
}

fn authorize(user: AuthUser, listing: &Listing, action: ListingAction) -> Result<DbId, CoreError> {
    authorize_listing_mutation(user.caller(), listing.owner.id, action).inspect_err(|_| {
        tracing::warn!(
            listing_id = listing.id,
            owner_id = listing.owner.id,
            user_id = user.user_id,
            ?action,
            "Listing mutation rejected: not the owner"
        );
    })
}
