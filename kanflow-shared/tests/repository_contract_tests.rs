/// Repository contract tests
///
/// Exercises the port guarantees every implementation must honor, against
/// the in-memory stores: explicit absence instead of errors, idempotent
/// deletes, id/timestamp assignment on create, and `created_at` preservation
/// with `updated_at` refresh on update.

mod common;

use common::TestContext;
use kanflow_shared::models::task::{TaskStatus, UpdateTask};
use kanflow_shared::models::user::CreateUser;
use kanflow_shared::repo::{BoardRepository, TaskRepository, UserRepository};
use uuid::Uuid;

#[tokio::test]
async fn missing_ids_read_as_explicit_absence() {
    let ctx = TestContext::new();
    let ghost = Uuid::new_v4();

    assert!(ctx.user_repo.get_by_id(ghost).await.unwrap().is_none());
    assert!(ctx.board_repo.get_by_id(ghost).await.unwrap().is_none());
    assert!(ctx.task_repo.get_by_id(ghost).await.unwrap().is_none());

    assert!(!ctx.user_repo.exists(ghost).await.unwrap());
    assert!(!ctx.board_repo.exists(ghost).await.unwrap());
    assert!(!ctx.task_repo.exists(ghost).await.unwrap());

    assert!(ctx.user_repo.get_all().await.unwrap().is_empty());
    assert!(ctx.board_repo.get_all().await.unwrap().is_empty());
    assert!(ctx.task_repo.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_is_idempotent_never_erroring() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    let task = ctx.task(board.id, u1.id, "a").await;

    // First delete removes, second reports false, no error either time
    assert!(ctx.task_repo.delete(task.id).await.unwrap());
    assert!(!ctx.task_repo.delete(task.id).await.unwrap());

    assert!(ctx.board_repo.delete(board.id).await.unwrap());
    assert!(!ctx.board_repo.delete(board.id).await.unwrap());

    assert!(ctx.user_repo.delete(u1.id).await.unwrap());
    assert!(!ctx.user_repo.delete(u1.id).await.unwrap());
}

#[tokio::test]
async fn create_assigns_id_and_timestamps() {
    let ctx = TestContext::new();

    let user = ctx
        .user_repo
        .create(CreateUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: None,
        })
        .await
        .unwrap();

    assert!(!user.id.is_nil());
    assert_eq!(user.created_at, user.updated_at);
}

#[tokio::test]
async fn update_preserves_created_at_and_refreshes_updated_at() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    let task = ctx.task(board.id, u1.id, "a").await;

    let created_at = task.created_at;
    let prior_updated_at = task.updated_at;

    let updated = ctx
        .tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                title: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, task.id);
    assert_eq!(updated.created_at, created_at);
    assert!(updated.updated_at >= prior_updated_at);
}

#[tokio::test]
async fn update_of_a_missing_entity_is_not_found() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    let task = ctx.task(board.id, u1.id, "a").await;

    ctx.task_repo.delete(task.id).await.unwrap();

    let err = ctx.task_repo.update(task).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn bucket_listing_is_position_ordered() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    ctx.task(board.id, u1.id, "a").await;
    ctx.task(board.id, u1.id, "b").await;
    ctx.task(board.id, u1.id, "c").await;

    let bucket = ctx
        .task_repo
        .list_bucket(board.id, TaskStatus::Todo)
        .await
        .unwrap();
    let positions: Vec<i32> = bucket.iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    // Other buckets are empty sequences, never errors
    let empty = ctx
        .task_repo
        .list_bucket(board.id, TaskStatus::Blocked)
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn board_listing_groups_columns_in_display_order() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    let a = ctx.task(board.id, u1.id, "a").await;
    ctx.task(board.id, u1.id, "b").await;
    let c = ctx.task(board.id, u1.id, "c").await;

    ctx.tasks
        .change_status(u1.id, c.id, TaskStatus::InProgress)
        .await
        .unwrap();
    ctx.tasks
        .change_status(u1.id, a.id, TaskStatus::Done)
        .await
        .unwrap();

    let all = ctx.task_repo.list_by_board(board.id).await.unwrap();
    let statuses: Vec<TaskStatus> = all.iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        vec![TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    );
}

#[tokio::test]
async fn update_positions_skips_missing_ids() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    let task = ctx.task(board.id, u1.id, "a").await;

    ctx.task_repo
        .update_positions(&[(task.id, 7), (Uuid::new_v4(), 3)])
        .await
        .unwrap();

    let reloaded = ctx.task_repo.get_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(reloaded.position, 7);
}

#[tokio::test]
async fn delete_by_board_reports_the_removed_count() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    let other = ctx.board_with_members("Sprint 2", u1.id, &[]).await;

    ctx.task(board.id, u1.id, "a").await;
    ctx.task(board.id, u1.id, "b").await;
    let survivor = ctx.task(other.id, u1.id, "c").await;

    let removed = ctx.task_repo.delete_by_board(board.id).await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(ctx.task_repo.delete_by_board(board.id).await.unwrap(), 0);

    // Tasks on other boards are untouched
    assert!(ctx.task_repo.exists(survivor.id).await.unwrap());
}
