//! Caller-identity extractors.
//!
//! - [`auth::AuthUser`] -- API caller resolved from an opaque token; rejects with 401.
//! - [`session::SessionUser`] -- page caller resolved from the session cookie;
//!   never rejects, anonymous visitors get `None`.

pub mod auth;
pub mod session;
