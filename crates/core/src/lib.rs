//! Domain rules for the carlot listing service.
//!
//! Everything here is pure logic with no database or HTTP dependencies so the
//! same checks run behind both the JSON API and the server-rendered pages.

pub mod account;
pub mod comment;
pub mod error;
pub mod fields;
pub mod listing;
pub mod ownership;
pub mod types;
