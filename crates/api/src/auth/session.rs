//! Signed session cookies for the page surface.
//!
//! A session is an HS256-signed JWT carried in the `carlot_session` cookie.
//! Each token's `jti` also names a row in the `sessions` table; the cookie
//! only authenticates while that row exists, so logging out deletes it.

use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use carlot_core::types::{DbId, Timestamp};

use crate::config::{parse_env, ConfigError};

/// Name of the page-surface session cookie.
pub const SESSION_COOKIE_NAME: &str = "carlot_session";

/// Default session lifetime: two weeks.
const DEFAULT_SESSION_TTL_HOURS: i64 = 14 * 24;

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 366 * 24;

/// JWT claims embedded in every session cookie.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique session identifier (UUID v4); the `sessions` row id.
    pub jti: String,
}

/// Configuration for signing and validating session cookies.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify session tokens.
    pub secret: String,
    /// Session lifetime in hours.
    pub ttl_hours: i64,
    /// Whether to mark the cookie `Secure` (HTTPS only).
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `SESSION_SECRET`        | **yes**  | --      |
    /// | `SESSION_TTL_HOURS`     | no       | `336`   |
    /// | `SESSION_COOKIE_SECURE` | no       | `false` |
    ///
    /// `SESSION_TTL_HOURS` must lie between 1 and [`MAX_SESSION_TTL_HOURS`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret =
            std::env::var("SESSION_SECRET").map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;
        if secret.is_empty() {
            return Err(ConfigError::Empty {
                var: "SESSION_SECRET",
            });
        }

        let ttl_hours = check_ttl_hours(parse_env(
            "SESSION_TTL_HOURS",
            DEFAULT_SESSION_TTL_HOURS,
            TTL_EXPECTED,
        )?)?;
        let cookie_secure = parse_env("SESSION_COOKIE_SECURE", false, "true or false")?;

        Ok(Self {
            secret,
            ttl_hours,
            cookie_secure,
        })
    }

    fn max_age_secs(&self) -> i64 {
        self.ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS) * 3600
    }
}

const TTL_EXPECTED: &str = "a whole number of hours between 1 and 8784";

/// Reject lifetimes that would produce already-expired or overflowing cookies.
pub(crate) fn check_ttl_hours(hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::Invalid {
            var: "SESSION_TTL_HOURS",
            value: hours.to_string(),
            expected: TTL_EXPECTED,
        })
    }
}

/// A freshly signed session, ready to be recorded and sent as a cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub jti: String,
    pub expires_at: Timestamp,
}

/// Sign a session token for `user_id`.
pub fn issue_session_token(
    user_id: DbId,
    config: &SessionConfig,
) -> Result<IssuedSession, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.max_age_secs());
    let claims = SessionClaims {
        sub: user_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedSession {
        token,
        jti: claims.jti,
        expires_at,
    })
}

/// Validate and decode a session token, returning the embedded claims.
///
/// Validates the signature and expiration.
pub fn validate_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, config: &SessionConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.max_age_secs()
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> HeaderValue {
    if config.cookie_secure {
        HeaderValue::from_static(
            "carlot_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure",
        )
    } else {
        HeaderValue::from_static("carlot_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// Pull the raw session token out of the `Cookie` header(s), if present.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
