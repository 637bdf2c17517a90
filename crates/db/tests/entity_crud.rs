//! Integration tests for the repository layer.
//!
//! Exercises users, listings, comments and API tokens against a fresh
//! migrated database per test:
//! - listing owner is fixed at creation
//! - cascade delete behaviour (listing -> comments, user -> everything)
//! - unique constraint violations
//! - token get-or-create reuse
//! - session lookup, expiry and revocation

use carlot_core::listing::ListingFields;
use carlot_db::models::session::CreateSession;
use carlot_db::models::user::{CreateUser, User};
use carlot_db::repositories::comment_repo::CommentOrder;
use carlot_db::repositories::{ApiTokenRepo, CommentRepo, ListingRepo, SessionRepo, UserRepo};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &SqlitePool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

fn fields(make: &str, model: &str, year: i64) -> ListingFields {
    ListingFields {
        make: make.to_string(),
        model: model.to_string(),
        year,
        description: format!("{make} {model} in good condition"),
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: SqlitePool) {
    carlot_db::health_check(&pool).await.unwrap();
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_is_rejected(pool: SqlitePool) {
    new_user(&pool, "alice").await;
    assert!(UserRepo::username_exists(&pool, "alice").await.unwrap());
    assert!(!UserRepo::username_exists(&pool, "Alice").await.unwrap());

    let dup = CreateUser {
        username: "alice".to_string(),
        email: String::new(),
        password_hash: "x".to_string(),
    };
    let err = UserRepo::create(&pool, &dup).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_listing_crud(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;

    let created = ListingRepo::create(&pool, alice.id, &fields("Volvo", "240", 1988))
        .await
        .unwrap();
    assert_eq!(created.owner.id, alice.id);
    assert_eq!(created.owner.username, "alice");
    assert_eq!(created.created_at, created.updated_at);

    let updated = ListingRepo::update(&pool, created.id, &fields("Volvo", "740", 1990))
        .await
        .unwrap()
        .expect("listing exists");
    assert_eq!(updated.model, "740");
    assert_eq!(updated.year, 1990);
    assert_eq!(updated.owner.id, alice.id, "owner must not change on update");
    assert!(updated.updated_at >= created.updated_at);

    let all = ListingRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 1);

    assert!(ListingRepo::delete(&pool, created.id).await.unwrap());
    assert!(!ListingRepo::delete(&pool, created.id).await.unwrap());
    assert!(ListingRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_listing_returns_none(pool: SqlitePool) {
    let result = ListingRepo::update(&pool, 4242, &fields("Saab", "900", 1985))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_listings_are_listed_in_creation_order(pool: SqlitePool) {
    let bob = new_user(&pool, "bob").await;
    for model in ["A", "B", "C"] {
        ListingRepo::create(&pool, bob.id, &fields("Ford", model, 1930))
            .await
            .unwrap();
    }
    let models: Vec<String> = ListingRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.model)
        .collect();
    assert_eq!(models, ["A", "B", "C"]);
}

// ---------------------------------------------------------------------------
// Comments and cascades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_comments_ordering(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let listing = ListingRepo::create(&pool, alice.id, &fields("Lada", "Niva", 1977))
        .await
        .unwrap();

    let first = CommentRepo::create(&pool, listing.id, bob.id, "first")
        .await
        .unwrap();
    assert_eq!(first.author_username, "bob");
    assert_eq!(first.listing_id, listing.id);
    CommentRepo::create(&pool, listing.id, alice.id, "second")
        .await
        .unwrap();

    let oldest: Vec<String> = CommentRepo::list_for_listing(&pool, listing.id, CommentOrder::OldestFirst)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.content)
        .collect();
    assert_eq!(oldest, ["first", "second"]);

    let newest: Vec<String> = CommentRepo::list_for_listing(&pool, listing.id, CommentOrder::NewestFirst)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.content)
        .collect();
    assert_eq!(newest, ["second", "first"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_listing_cascades_to_comments(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;
    let listing = ListingRepo::create(&pool, alice.id, &fields("Lada", "Niva", 1977))
        .await
        .unwrap();
    for text in ["one", "two", "three"] {
        CommentRepo::create(&pool, listing.id, alice.id, text)
            .await
            .unwrap();
    }
    assert_eq!(CommentRepo::count_for_listing(&pool, listing.id).await.unwrap(), 3);

    ListingRepo::delete(&pool, listing.id).await.unwrap();

    assert_eq!(CommentRepo::count_for_listing(&pool, listing.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_user_cascades_to_listings_comments_and_token(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let alices = ListingRepo::create(&pool, alice.id, &fields("Fiat", "500", 1957))
        .await
        .unwrap();
    let bobs = ListingRepo::create(&pool, bob.id, &fields("Mini", "Cooper", 1961))
        .await
        .unwrap();
    CommentRepo::create(&pool, bobs.id, alice.id, "by alice").await.unwrap();
    CommentRepo::create(&pool, bobs.id, bob.id, "by bob").await.unwrap();
    ApiTokenRepo::get_or_create(&pool, alice.id, "alice-key").await.unwrap();

    assert!(UserRepo::delete(&pool, alice.id).await.unwrap());

    assert!(ListingRepo::find_by_id(&pool, alices.id).await.unwrap().is_none());
    let remaining = CommentRepo::list_for_listing(&pool, bobs.id, CommentOrder::OldestFirst)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].author_username, "bob");
    assert!(ApiTokenRepo::find_by_key(&pool, "alice-key").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comment_on_missing_listing_violates_foreign_key(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;
    let result = CommentRepo::create(&pool, 999, alice.id, "orphan").await;
    assert!(result.is_err(), "foreign keys must be enforced");
}

// ---------------------------------------------------------------------------
// API tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_token_get_or_create_reuses_existing_key(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;

    let first = ApiTokenRepo::get_or_create(&pool, alice.id, "key-one").await.unwrap();
    let second = ApiTokenRepo::get_or_create(&pool, alice.id, "key-two").await.unwrap();
    assert_eq!(first.key, "key-one");
    assert_eq!(second.key, "key-one", "existing token must be reused");

    let found = ApiTokenRepo::find_by_key(&pool, "key-one")
        .await
        .unwrap()
        .expect("token exists");
    assert_eq!(found.user_id, alice.id);
    assert!(ApiTokenRepo::find_by_key(&pool, "key-two").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_session_lookup_and_delete(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateSession {
        id: "jti-1".to_string(),
        user_id: alice.id,
        expires_at: Utc::now() + Duration::hours(1),
    };
    SessionRepo::create(&pool, &input).await.unwrap();

    let found = SessionRepo::find_active(&pool, "jti-1")
        .await
        .unwrap()
        .expect("session exists");
    assert_eq!(found.user_id, alice.id);

    assert!(SessionRepo::delete(&pool, "jti-1").await.unwrap());
    assert!(!SessionRepo::delete(&pool, "jti-1").await.unwrap());
    assert!(SessionRepo::find_active(&pool, "jti-1").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_session_is_not_active(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateSession {
        id: "jti-old".to_string(),
        user_id: alice.id,
        expires_at: Utc::now() - Duration::minutes(5),
    };
    SessionRepo::create(&pool, &input).await.unwrap();

    assert!(SessionRepo::find_active(&pool, "jti-old").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_user_removes_sessions(pool: SqlitePool) {
    let alice = new_user(&pool, "alice").await;
    let input = CreateSession {
        id: "jti-2".to_string(),
        user_id: alice.id,
        expires_at: Utc::now() + Duration::hours(1),
    };
    SessionRepo::create(&pool, &input).await.unwrap();

    assert!(UserRepo::delete(&pool, alice.id).await.unwrap());
    assert!(SessionRepo::find_active(&pool, "jti-2").await.unwrap().is_none());
}
