//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod api_token_repo;
pub mod comment_repo;
pub mod listing_repo;
pub mod session_repo;
pub mod user_repo;

pub use api_token_repo::ApiTokenRepo;
pub use comment_repo::CommentRepo;
pub use listing_repo::ListingRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
