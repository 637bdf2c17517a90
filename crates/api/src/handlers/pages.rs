//! Server-rendered page handlers.
//!
//! The visitor comes from the session cookie via [`SessionUser`]. Pages that
//! mutate data redirect anonymous visitors to `/auth/` and answer non-owners
//! with a 403 page. Invalid form input re-renders the form with messages.

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use carlot_core::account;
use carlot_core::comment::validate_content;
use carlot_core::error::CoreError;
use carlot_core::fields::FieldErrors;
use carlot_core::listing::{validate_listing_form, ListingFields};
use carlot_core::ownership::{authorize_listing_mutation, require_user, Caller, ListingAction};
use carlot_core::types::DbId;
use carlot_db::models::listing::Listing;
use carlot_db::models::session::CreateSession;
use carlot_db::models::user::{User, UserSummary};
use carlot_db::repositories::comment_repo::CommentOrder;
use carlot_db::repositories::{CommentRepo, ListingRepo, SessionRepo};
use serde::Deserialize;

use crate::auth::session::{
    clear_session_cookie, extract_session_token, issue_session_token, session_cookie,
    validate_session_token,
};
use crate::error::{AppError, PageError};
use crate::handlers::auth::{authenticate, create_account};
use crate::handlers::listings::find_listing;
use crate::middleware::session::SessionUser;
use crate::state::AppState;
use crate::views::{self, ListingFormMode, ListingFormValues};

type PageResult<T> = Result<T, PageError>;

// ---------------------------------------------------------------------------
// Form types
// ---------------------------------------------------------------------------

/// Create / update form. `year` stays text until validation.
#[derive(Debug, Default, Deserialize)]
pub struct ListingForm {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
    /// Present when the delete button was pressed on the update form.
    pub delete: Option<String>,
}

impl ListingForm {
    fn values(&self) -> ListingFormValues {
        ListingFormValues {
            make: self.make.clone().unwrap_or_default(),
            model: self.model.clone().unwrap_or_default(),
            year: self.year.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub content: Option<String>,
}

/// The combined `/auth/` form; `register` is set by the register button.
#[derive(Debug, Deserialize)]
pub struct AuthForm {
    pub login: Option<String>,
    pub register: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /
pub async fn home(session: SessionUser, State(state): State<AppState>) -> PageResult<Html<String>> {
    let listings = ListingRepo::list(&state.pool).await?;
    Ok(Html(views::home(session.0.as_ref(), &listings)))
}

/// GET /car/{id}
pub async fn detail(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let listing = find_listing(&state, id).await?;
    render_detail(&state, session.0.as_ref(), &listing, None).await
}

/// POST /car/{id}
///
/// Add a comment as the signed-in visitor.
pub async fn add_comment(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(form): Form<CommentForm>,
) -> PageResult<Response> {
    let author_id = require_user(session.caller())?;
    let listing = find_listing(&state, id).await?;

    let content = match validate_content(form.content.as_deref()) {
        Ok(content) => content,
        Err(CoreError::InvalidFields(errors)) => {
            let message = errors.get("content").join(" ");
            let page = render_detail(&state, session.0.as_ref(), &listing, Some(message.as_str())).await?;
            return Ok(page.into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let comment = CommentRepo::create(&state.pool, id, author_id, &content).await?;
    tracing::info!(comment_id = comment.id, listing_id = id, user_id = author_id, "Comment created");

    Ok(Redirect::to(&format!("/car/{id}")).into_response())
}

/// GET /car/create/
pub async fn create_form(session: SessionUser) -> PageResult<Html<String>> {
    let user = session.require()?;
    Ok(Html(views::listing_form(
        Some(user),
        ListingFormMode::Create,
        &ListingFormValues::default(),
        &FieldErrors::new(),
    )))
}

/// POST /car/create/
pub async fn create_submit(
    session: SessionUser,
    State(state): State<AppState>,
    Form(form): Form<ListingForm>,
) -> PageResult<Response> {
    let user = session.require()?;

    let fields = match validate_form(&form) {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(rerender_form(user, ListingFormMode::Create, &form, &errors));
        }
    };

    let listing = ListingRepo::create(&state.pool, user.id, &fields).await?;
    tracing::info!(listing_id = listing.id, user_id = user.id, "Listing created");

    Ok(Redirect::to(&format!("/car/{}", listing.id)).into_response())
}

/// GET /car/update/{id}
pub async fn update_form(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> PageResult<Html<String>> {
    let user = session.require()?;
    let listing = find_listing(&state, id).await?;
    authorize_page(user, &listing, ListingAction::Update)?;

    Ok(Html(views::listing_form(
        Some(user),
        ListingFormMode::Update(id),
        &ListingFormValues::from(&listing),
        &FieldErrors::new(),
    )))
}

/// POST /car/update/{id}
///
/// Saves the form, or deletes the listing when the delete button was used.
pub async fn update_submit(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(form): Form<ListingForm>,
) -> PageResult<Response> {
    let user = session.require()?;
    let listing = find_listing(&state, id).await?;

    if form.delete.is_some() {
        authorize_page(user, &listing, ListingAction::Delete)?;
        ListingRepo::delete(&state.pool, id).await?;
        tracing::info!(listing_id = id, user_id = user.id, "Listing deleted");
        return Ok(Redirect::to("/").into_response());
    }

    authorize_page(user, &listing, ListingAction::Update)?;
    let fields = match validate_form(&form) {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(rerender_form(user, ListingFormMode::Update(id), &form, &errors));
        }
    };

    ListingRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;
    tracing::info!(listing_id = id, user_id = user.id, "Listing updated");

    Ok(Redirect::to(&format!("/car/{id}")).into_response())
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// GET /auth/
pub async fn auth_form(session: SessionUser) -> Html<String> {
    Html(views::auth_page(session.0.as_ref(), None))
}

/// POST /auth/
///
/// Log in, or register when the register button was used. Success sets the
/// session cookie and redirects home.
pub async fn auth_submit(
    session: SessionUser,
    State(state): State<AppState>,
    Form(form): Form<AuthForm>,
) -> PageResult<Response> {
    let username = form.username.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    let outcome = if form.register.is_some() {
        register_from_form(&state, &form).await
    } else {
        if form.login.is_none() {
            tracing::debug!("Auth form submitted without a button, treating as login");
        }
        authenticate(&state, username, password).await
    };

    let user = match outcome {
        Ok(user) => user,
        Err(err) => {
            let message = form_error_message(err)?;
            return Ok(Html(views::auth_page(session.0.as_ref(), Some(message.as_str()))).into_response());
        }
    };

    let issued = issue_session_token(user.id, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Session token error: {e}")))?;
    let cookie = session_cookie(&issued.token, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Session cookie error: {e}")))?;
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            id: issued.jti.clone(),
            user_id: user.id,
            expires_at: issued.expires_at,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, jti = %issued.jti, "Session started");

    Ok(with_cookie(cookie, Redirect::to("/")))
}

/// GET|POST /logout/
///
/// Revokes the presented session and clears the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> PageResult<Response> {
    let claims = extract_session_token(&headers)
        .and_then(|token| validate_session_token(&token, &state.config.session).ok());
    if let Some(claims) = claims {
        if SessionRepo::delete(&state.pool, &claims.jti).await? {
            tracing::info!(user_id = claims.sub, jti = %claims.jti, "Session ended");
        }
    }

    Ok(with_cookie(clear_session_cookie(&state.config.session), Redirect::to("/")))
}

async fn register_from_form(
    state: &AppState,
    form: &AuthForm,
) -> Result<User, AppError> {
    let password = form.password.as_deref().unwrap_or_default();
    account::confirm_password(password, form.password_confirm.as_deref().unwrap_or_default())?;
    let registration =
        account::validate_registration(form.username.as_deref(), None, form.password.as_deref())?;
    create_account(state, registration).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn render_detail(
    state: &AppState,
    user: Option<&UserSummary>,
    listing: &Listing,
    comment_error: Option<&str>,
) -> PageResult<Html<String>> {
    let comments =
        CommentRepo::list_for_listing(&state.pool, listing.id, CommentOrder::NewestFirst).await?;
    Ok(Html(views::listing_detail(user, listing, &comments, comment_error)))
}

fn validate_form(form: &ListingForm) -> Result<ListingFields, FieldErrors> {
    match validate_listing_form(
        form.make.as_deref(),
        form.model.as_deref(),
        form.year.as_deref(),
        form.description.as_deref(),
    ) {
        Ok(fields) => Ok(fields),
        Err(CoreError::InvalidFields(errors)) => Err(errors),
        Err(other) => {
            let mut errors = FieldErrors::new();
            errors.add("form", other.to_string());
            Err(errors)
        }
    }
}

fn rerender_form(
    user: &UserSummary,
    mode: ListingFormMode,
    form: &ListingForm,
    errors: &FieldErrors,
) -> Response {
    Html(views::listing_form(Some(user), mode, &form.values(), errors)).into_response()
}

fn authorize_page(user: &UserSummary, listing: &Listing, action: ListingAction) -> PageResult<()> {
    authorize_listing_mutation(Caller::User(user.id), listing.owner.id, action).map_err(
        |e| {
            tracing::warn!(
                listing_id = listing.id,
                owner_id = listing.owner.id,
                user_id = user.id,
                ?action,
                "Page listing mutation rejected: not the owner"
            );
            PageError::from(e)
        },
    )?;
    Ok(())
}

/// Turn a rejected login / registration into the message shown on the form.
/// Anything other than a validation failure is a real error.
fn form_error_message(err: AppError) -> PageResult<String> {
    match err {
        AppError::Core(CoreError::Validation(message)) => Ok(message),
        AppError::Core(CoreError::InvalidFields(errors)) => Ok(errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join(" ")),
        other => Err(other.into()),
    }
}

fn with_cookie(cookie: HeaderValue, redirect: Redirect) -> Response {
    ([(SET_COOKIE, cookie)], redirect).into_response()
}
