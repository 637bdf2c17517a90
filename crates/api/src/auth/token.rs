//! Opaque API token keys.
//!
//! A key is 32 lowercase hex characters from a random UUID v4. Keys carry no
//! claims: the server resolves them through the `api_tokens` table and they
//! never expire.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use uuid::Uuid;

/// Generate a fresh candidate key.
pub fn generate_token_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Pull the key out of `Authorization: Token <key>` or `Authorization: Bearer <key>`.
///
/// Returns `Err` with a client-facing message when the header is present but
/// malformed, `Ok(None)` when it is absent.
pub fn extract_token_key(headers: &HeaderMap) -> Result<Option<String>, &'static str> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| "Invalid Authorization header encoding")?
        .trim();

    let (scheme, key) = value
        .split_once(' ')
        .ok_or("Invalid Authorization format. Expected: Token <key>")?;
    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Invalid Authorization format. Expected: Token <key>");
    }

    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return Err("Invalid token header. Token string should not contain spaces.");
    }
    Ok(Some(key.to_string()))
}
