//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`token`] -- opaque API token keys for the JSON surface.
//! - [`session`] -- signed session cookies for the page surface.

pub mod password;
pub mod session;
pub mod token;
