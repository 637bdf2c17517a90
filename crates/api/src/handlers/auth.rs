//! Handlers for the `/auth` API resource (register, login).
//!
//! The account helpers here are shared with the `/auth/` page.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use carlot_core::account::{self, Registration};
use carlot_core::types::DbId;
use carlot_db::models::user::{CreateUser, User};
use carlot_db::repositories::{ApiTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{check_credentials, hash_password};
use crate::auth::token::generate_token_key;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register/`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/login/`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Returned by both register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register/
///
/// Create an account and return its API token.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let registration = account::validate_registration(
        input.username.as_deref(),
        input.email.as_deref(),
        input.password.as_deref(),
    )?;

    let user = create_account(&state, registration).await?;
    let token = token_for(&state, user.id).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// POST /auth/login/
///
/// Exchange credentials for the user's API token, reusing an existing one.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = authenticate(
        &state,
        input.username.as_deref().unwrap_or_default(),
        input.password.as_deref().unwrap_or_default(),
    )
    .await?;
    let token = token_for(&state, user.id).await?;

    Ok(Json(TokenResponse { token }))
}

// ---------------------------------------------------------------------------
// Shared account helpers
// ---------------------------------------------------------------------------

/// Persist a validated registration.
///
/// An existing username is reported as a field error on `username`, including
/// when a concurrent registration wins the insert.
pub(crate) async fn create_account(
    state: &AppState,
    registration: Registration,
) -> AppResult<User> {
    if UserRepo::username_exists(&state.pool, &registration.username).await? {
        return Err(account::username_taken().into());
    }

    let password_hash = hash_password(&registration.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: registration.username,
        email: registration.email,
        password_hash,
    };
    let user = match UserRepo::create(&state.pool, &input).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(account::username_taken().into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Check a username / password pair.
///
/// Unknown users and wrong passwords produce the same error.
pub(crate) async fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> AppResult<User> {
    let user = UserRepo::find_by_username(&state.pool, username.trim()).await?;

    let password_valid = check_credentials(password, user.as_ref().map(|u| u.password_hash.as_str()))
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    match user {
        Some(user) if password_valid => {
            tracing::info!(user_id = user.id, "User logged in");
            Ok(user)
        }
        Some(user) => {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            Err(account::invalid_credentials().into())
        }
        None => {
            tracing::info!("Login rejected: unknown username");
            Err(account::invalid_credentials().into())
        }
    }
}

async fn token_for(state: &AppState, user_id: DbId) -> AppResult<String> {
    let token = ApiTokenRepo::get_or_create(&state.pool, user_id, &generate_token_key()).await?;
    Ok(token.key)
}
