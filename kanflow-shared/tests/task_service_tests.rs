/// Task service tests
///
/// Covers task lifecycle against the domain rules: creation gates, the
/// completion stamp, the Done-lock, editor/creator authorization, and
/// assignee membership.

mod common;

use common::TestContext;
use kanflow_shared::models::task::{CreateTask, TaskPriority, TaskStatus, UpdateTask};
use kanflow_shared::services::TaskFilter;

#[tokio::test]
async fn tasks_start_in_todo_with_sequential_positions() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    let fix_bug = ctx.task(board.id, u1.id, "Fix bug").await;
    let write_docs = ctx.task(board.id, u1.id, "Write docs").await;

    assert_eq!(fix_bug.status, TaskStatus::Todo);
    assert_eq!(fix_bug.position, 0);
    assert!(fix_bug.completed_at.is_none());
    assert_eq!(write_docs.position, 1);
}

#[tokio::test]
async fn create_requires_board_membership() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let outsider = ctx.register("outsider").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    let err = ctx
        .tasks
        .create(CreateTask {
            board_id: board.id,
            title: "Sneaky".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            created_by: outsider.id,
            assigned_to: None,
            due_date: None,
            tags: vec![],
        })
        .await
        .unwrap_err();
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn create_rejects_missing_board_and_empty_title() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    let err = ctx
        .tasks
        .create(CreateTask {
            board_id: uuid::Uuid::new_v4(),
            title: "Orphan".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            created_by: u1.id,
            assigned_to: None,
            due_date: None,
            tags: vec![],
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = ctx
        .tasks
        .create(CreateTask {
            board_id: board.id,
            title: "  ".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            created_by: u1.id,
            assigned_to: None,
            due_date: None,
            tags: vec![],
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn assignee_must_be_a_board_member() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let u3 = ctx.register("u3").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    // At creation
    let err = ctx
        .tasks
        .create(CreateTask {
            board_id: board.id,
            title: "Write docs".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            created_by: u1.id,
            assigned_to: Some(u3.id),
            due_date: None,
            tags: vec![],
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("member"));

    // And on update
    let task = ctx.task(board.id, u1.id, "Write docs").await;
    let err = ctx
        .tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                assigned_to: Some(Some(u3.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn done_sets_completed_at_and_locks_the_task() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    let task = ctx.task(board.id, u1.id, "Fix bug").await;

    let task = ctx
        .tasks
        .change_status(u1.id, task.id, TaskStatus::Done)
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Done);
    assert!(task.completed_at.is_some());

    // Edits are rejected with the done-lock rule
    let err = ctx
        .tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // So is deletion
    let err = ctx.tasks.delete(u1.id, task.id).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("completed"));

    // Leaving done clears the stamp and unlocks
    let task = ctx
        .tasks
        .change_status(u1.id, task.id, TaskStatus::InProgress)
        .await
        .unwrap();
    assert!(task.completed_at.is_none());

    ctx.tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ctx.tasks.delete(u1.id, task.id).await.unwrap();
}

#[tokio::test]
async fn completed_at_tracks_done_through_every_transition() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    let task = ctx.task(board.id, u1.id, "Fix bug").await;

    // Walk the task through every status; the invariant must hold at each
    let path = [
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Done,
        TaskStatus::InReview,
        TaskStatus::Done,
        TaskStatus::Todo,
    ];

    let mut current = task;
    for status in path {
        current = ctx
            .tasks
            .change_status(u1.id, current.id, status)
            .await
            .unwrap();
        assert_eq!(
            current.completed_at.is_some(),
            current.status == TaskStatus::Done,
            "completed_at must be set iff status is done (at {:?})",
            current.status
        );
    }
}

#[tokio::test]
async fn only_creator_or_assignee_edit_and_change_status() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let u2 = ctx.register("u2").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[u2.id]).await;

    let task = ctx.task(board.id, u1.id, "Write docs").await;

    // A member who is neither creator nor assignee cannot edit
    let err = ctx
        .tasks
        .update(
            u2.id,
            task.id,
            UpdateTask {
                title: Some("Hijack".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let err = ctx
        .tasks
        .change_status(u2.id, task.id, TaskStatus::Done)
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    // Once assigned, the assignee gains both rights
    let task = ctx
        .tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                assigned_to: Some(Some(u2.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    ctx.tasks
        .update(
            u2.id,
            task.id,
            UpdateTask {
                priority: Some(TaskPriority::High),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ctx.tasks
        .change_status(u2.id, task.id, TaskStatus::InProgress)
        .await
        .unwrap();
}

#[tokio::test]
async fn deletion_is_creator_only() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let u2 = ctx.register("u2").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[u2.id]).await;

    let task = ctx.task(board.id, u1.id, "Write docs").await;

    // Even the assignee may not delete
    ctx.tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                assigned_to: Some(Some(u2.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = ctx.tasks.delete(u2.id, task.id).await.unwrap_err();
    assert!(err.is_forbidden());

    ctx.tasks.delete(u1.id, task.id).await.unwrap();
}

#[tokio::test]
async fn tags_are_normalized_on_create_and_update() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    let task = ctx
        .tasks
        .create(CreateTask {
            board_id: board.id,
            title: "Tagged".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            created_by: u1.id,
            assigned_to: None,
            due_date: None,
            tags: vec!["Bug".to_string(), "bug".to_string(), " UI ".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(task.tags, vec!["bug", "ui"]);

    let task = ctx
        .tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                tags: Some(vec!["Backend".to_string(), "BACKEND".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(task.tags, vec!["backend"]);
}

#[tokio::test]
async fn filtered_listing_dispatches_on_the_first_criterion() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;

    let bug = ctx
        .tasks
        .create(CreateTask {
            board_id: board.id,
            title: "Fix login bug".to_string(),
            description: Some("crash on empty password".to_string()),
            priority: TaskPriority::Critical,
            created_by: u1.id,
            assigned_to: None,
            due_date: Some(chrono::Utc::now() + chrono::Duration::days(1)),
            tags: vec!["bug".to_string()],
        })
        .await
        .unwrap();
    ctx.task(board.id, u1.id, "Write docs").await;

    let by_text = ctx
        .tasks
        .list_by_board_filtered(
            u1.id,
            board.id,
            TaskFilter {
                text: Some("crash".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].id, bug.id);

    let by_priority = ctx
        .tasks
        .list_by_board_filtered(
            u1.id,
            board.id,
            TaskFilter {
                priority: Some(TaskPriority::Critical),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_priority.len(), 1);

    let by_tag = ctx
        .tasks
        .list_by_board_filtered(
            u1.id,
            board.id,
            TaskFilter {
                tag: Some("bug".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_tag.len(), 1);

    let due_soon = ctx
        .tasks
        .list_by_board_filtered(
            u1.id,
            board.id,
            TaskFilter {
                due_from: Some(chrono::Utc::now()),
                due_until: Some(chrono::Utc::now() + chrono::Duration::days(7)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(due_soon.len(), 1);

    let by_status = ctx
        .tasks
        .list_by_board_filtered(
            u1.id,
            board.id,
            TaskFilter {
                status: Some(TaskStatus::Todo),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_status.len(), 2);
}

#[tokio::test]
async fn listing_a_board_requires_membership() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let outsider = ctx.register("outsider").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[]).await;
    ctx.task(board.id, u1.id, "Fix bug").await;

    let err = ctx
        .tasks
        .list_by_board(outsider.id, board.id)
        .await
        .unwrap_err();
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn my_task_listings_follow_assignment_and_creatorship() {
    let ctx = TestContext::new();
    let u1 = ctx.register("u1").await;
    let u2 = ctx.register("u2").await;
    let board = ctx.board_with_members("Sprint 1", u1.id, &[u2.id]).await;

    let task = ctx.task(board.id, u1.id, "Write docs").await;
    ctx.tasks
        .update(
            u1.id,
            task.id,
            UpdateTask {
                assigned_to: Some(Some(u2.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let assigned = ctx.tasks.list_assigned(u2.id).await.unwrap();
    assert_eq!(assigned.len(), 1);

    let created = ctx.tasks.list_created(u1.id).await.unwrap();
    assert_eq!(created.len(), 1);

    assert!(ctx.tasks.list_assigned(u1.id).await.unwrap().is_empty());
}
