//! Request handlers.
//!
//! `auth`, `listings` and `comments` serve the JSON API and map errors via
//! [`AppError`](crate::error::AppError). `pages` serves the HTML surface and
//! maps errors via [`PageError`](crate::error::PageError).

pub mod auth;
pub mod comments;
pub mod listings;
pub mod pages;
