/// User service tests
///
/// Covers registration uniqueness, profile updates, login stamping, and
/// soft deactivation.

mod common;

use common::TestContext;
use kanflow_shared::models::user::{CreateUser, UpdateUser};

#[tokio::test]
async fn registration_assigns_identity_and_defaults() {
    let ctx = TestContext::new();
    let user = ctx.register("alice").await;

    assert!(user.is_active);
    assert!(user.last_login_at.is_none());
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
}

#[tokio::test]
async fn duplicate_username_and_email_conflict() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let err = ctx
        .users
        .register(CreateUser {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("username"));

    // Email comparison is case-insensitive
    let err = ctx
        .users
        .register(CreateUser {
            username: "alice2".to_string(),
            email: "ALICE@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("email"));
}

#[tokio::test]
async fn empty_identifiers_are_rejected() {
    let ctx = TestContext::new();

    let err = ctx
        .users
        .register(CreateUser {
            username: " ".to_string(),
            email: "x@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn profile_update_keeps_untouched_fields() {
    let ctx = TestContext::new();
    let user = ctx.register("alice").await;

    let updated = ctx
        .users
        .update_profile(
            user.id,
            UpdateUser {
                full_name: Some(Some("Alice Doe".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name.as_deref(), Some("Alice Doe"));
    assert_eq!(updated.email, user.email);
    assert_eq!(updated.username, user.username);
}

#[tokio::test]
async fn email_change_to_a_taken_address_conflicts() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    ctx.register("bob").await;

    let err = ctx
        .users
        .update_profile(
            alice.id,
            UpdateUser {
                email: Some("bob@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn login_recording_sets_the_timestamp() {
    let ctx = TestContext::new();
    let user = ctx.register("alice").await;

    let stamped = ctx.users.record_login(user.id).await.unwrap();
    assert!(stamped.last_login_at.is_some());
}

#[tokio::test]
async fn find_by_login_matches_username_or_email() {
    let ctx = TestContext::new();
    let user = ctx.register("alice").await;

    let by_username = ctx.users.find_by_login("alice").await.unwrap().unwrap();
    assert_eq!(by_username.id, user.id);

    let by_email = ctx
        .users
        .find_by_login("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);

    assert!(ctx.users.find_by_login("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn deactivation_is_soft_and_reversible() {
    let ctx = TestContext::new();
    let user = ctx.register("alice").await;

    let deactivated = ctx.users.deactivate(user.id).await.unwrap();
    assert!(!deactivated.is_active);

    // The account record still exists
    let fetched = ctx.users.get(user.id).await.unwrap();
    assert!(!fetched.is_active);

    let inactive = ctx.users.list_by_active(false).await.unwrap();
    assert_eq!(inactive.len(), 1);

    let reactivated = ctx.users.activate(user.id).await.unwrap();
    assert!(reactivated.is_active);
}

#[tokio::test]
async fn search_matches_name_fields() {
    let ctx = TestContext::new();
    ctx.register("alice").await;
    let bob = ctx.register("bob").await;
    ctx.users
        .update_profile(
            bob.id,
            UpdateUser {
                full_name: Some(Some("Robert Alison".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Matches alice's username and bob's full name
    let hits = ctx.users.search("ali").await.unwrap();
    assert_eq!(hits.len(), 2);

    let hits = ctx.users.search("robert").await.unwrap();
    assert_eq!(hits.len(), 1);
}
