//! Row structs and DTOs.
//!
//! Row structs derive `FromRow` and, where they are returned to clients,
//! `Serialize`. Secrets (password hashes) live only on rows that never
//! reach a response body.

pub mod api_token;
pub mod comment;
pub mod listing;
pub mod session;
pub mod user;
