//! Authorization and ownership guard for listings and comments.
//!
//! Both front ends (JSON API and server-rendered pages) resolve the caller
//! themselves (bearer token or session cookie) and then call into this
//! module before any mutation. Nothing here reads ambient request state:
//! the caller is always passed in explicitly.
//!
//! Rules:
//! - reads never require a caller;
//! - creating a listing or a comment requires an authenticated caller, who
//!   becomes the owner / author;
//! - updating or deleting a listing requires the caller to be its owner;
//! - comments have no update or delete path at all.

use crate::error::CoreError;
use crate::types::DbId;

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(DbId),
}

impl Caller {
    pub fn from_user_id(user_id: Option<DbId>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }

    pub fn user_id(self) -> Option<DbId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Mutations gated on listing ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingAction {
    Update,
    Delete,
}

impl ListingAction {
    fn denied_message(self) -> &'static str {
        match self {
            Self::Update => "You cannot edit this listing.",
            Self::Delete => "You cannot delete this listing.",
        }
    }
}

pub const MSG_AUTH_REQUIRED: &str = "Authentication required.";

/// Resolve the caller to a user id, rejecting anonymous callers.
///
/// Used for listing and comment creation: the returned id is what gets
/// stored as owner / author.
pub fn require_user(caller: Caller) -> Result<DbId, CoreError> {
    caller
        .user_id()
        .ok_or_else(|| CoreError::Unauthorized(MSG_AUTH_REQUIRED.into()))
}

/// Reject unless `caller_id` owns the listing.
pub fn ensure_owner(caller_id: DbId, owner_id: DbId, action: ListingAction) -> Result<(), CoreError> {
    if caller_id == owner_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(action.denied_message().into()))
    }
}

/// Full check for updating or deleting a listing owned by `owner_id`.
///
/// Anonymous callers get `Unauthorized`, non-owners get `Forbidden`.
/// Returns the caller's id on success.
pub fn authorize_listing_mutation(
    caller: Caller,
    owner_id: DbId,
    action: ListingAction,
) -> Result<DbId, CoreError> {
    let caller_id = require_user(caller)?;
    ensure_owner(caller_id, owner_id, action)?;
    Ok(caller_id)
}
