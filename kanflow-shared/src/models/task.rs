/// Task model
///
/// This module provides the Task entity: a unit of work belonging to exactly
/// one board, tracked through a status lifecycle and ordered within its
/// status column by an integer position.
///
/// # Status machine
///
/// ```text
/// todo ⇄ in_progress ⇄ in_review ⇄ done
///   ⇅        ⇅             ⇅        ⇅
///              blocked
/// ```
///
/// Any two distinct statuses are connected; `done` is a locked state, not a
/// terminal one. Entering `done` stamps `completed_at`, leaving it clears the
/// stamp, and while a task is `done` every non-status edit and deletion is
/// rejected.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM (
///     'todo', 'in_progress', 'in_review', 'done', 'blocked'
/// );
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'critical');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     created_by UUID NOT NULL REFERENCES users(id),
///     assigned_to UUID REFERENCES users(id),
///     due_date TIMESTAMPTZ,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     position INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Task status column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Awaiting review
    InReview,

    /// Finished; edits and deletion are locked while here
    Done,

    /// Blocked on something external
    Blocked,
}

impl TaskStatus {
    /// All statuses in display (column) order
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Done,
        TaskStatus::Blocked,
    ];

    /// Converts status to string for display and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::InReview => "in_review",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
        }
    }

    /// True if the status is the locked `done` column
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait
    Low,

    /// Default priority
    Medium,

    /// Should be picked up soon
    High,

    /// Drop everything
    Critical,
}

impl TaskPriority {
    /// Converts priority to string for display and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Board this task belongs to
    pub board_id: Uuid,

    /// Short title
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Current status column
    pub status: TaskStatus,

    /// Priority level
    pub priority: TaskPriority,

    /// User who created the task
    pub created_by: Uuid,

    /// Assigned board member (None if unassigned)
    pub assigned_to: Option<Uuid>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Lowercased, deduplicated labels
    pub tags: Vec<String>,

    /// Ordering key within the (board, status) column; dense from 0
    pub position: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Set exactly while status == done
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for creating a new task
///
/// New tasks always start in `todo`; the service appends them to the end of
/// the column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Board to create the task on
    pub board_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (defaults to medium)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Creating user
    pub created_by: Uuid,

    /// Optional assignee; must be a board member
    pub assigned_to: Option<Uuid>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Labels; normalized before storage
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating task fields
///
/// Status changes go through [`Task::transition_to`], not this struct.
/// All fields are optional; `Some(None)` clears a clearable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New assignee (use Some(None) to unassign)
    pub assigned_to: Option<Option<Uuid>>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// Replacement tag list; normalized before storage
    pub tags: Option<Vec<String>>,
}

impl UpdateTask {
    /// True if no field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }
}

/// Normalizes a tag list: trims, lowercases, drops empties, dedups
///
/// Insertion order of the first occurrence is preserved so tag chips render
/// stably.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

impl Task {
    /// Transitions the task to a new status, applying the completion rule
    ///
    /// - entering `done` from any other status stamps `completed_at`
    /// - leaving `done` clears `completed_at`
    /// - any other transition (including same-status) leaves it untouched
    pub fn transition_to(&mut self, new_status: TaskStatus, now: DateTime<Utc>) {
        let old_status = self.status;
        self.status = new_status;

        if new_status.is_done() && !old_status.is_done() {
            self.completed_at = Some(now);
        } else if old_status.is_done() && !new_status.is_done() {
            self.completed_at = None;
        }
    }

    /// Rejects field edits while the task is in the locked `done` status
    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status.is_done() {
            return Err(DomainError::validation(
                "a completed task cannot be edited; move it out of done first",
            ));
        }
        Ok(())
    }

    /// Rejects deletion while the task is in the locked `done` status
    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        if self.status.is_done() {
            return Err(DomainError::validation("cannot delete a completed task"));
        }
        Ok(())
    }

    /// Applies a field update to the in-memory entity
    ///
    /// Fails with the done-lock rule if the task is `done`. Assignee
    /// membership is the service's concern; tags are normalized here.
    pub fn apply_update(&mut self, data: UpdateTask) -> Result<(), DomainError> {
        self.ensure_editable()?;

        if let Some(title) = data.title {
            self.title = title;
        }
        if let Some(description) = data.description {
            self.description = description;
        }
        if let Some(priority) = data.priority {
            self.priority = priority;
        }
        if let Some(assigned_to) = data.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(due_date) = data.due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = data.tags {
            self.tags = normalize_tags(tags);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            board_id: Uuid::new_v4(),
            title: "Fix bug".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            created_by: Uuid::new_v4(),
            assigned_to: None,
            due_date: None,
            tags: vec![],
            position: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_at: if status.is_done() {
                Some(Utc::now())
            } else {
                None
            },
        }
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::InReview.as_str(), "in_review");
        assert_eq!(TaskStatus::Done.as_str(), "done");
        assert_eq!(TaskStatus::Blocked.as_str(), "blocked");
    }

    #[test]
    fn test_priority_ordering() {
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::Medium < TaskPriority::High);
        assert!(TaskPriority::High < TaskPriority::Critical);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_entering_done_stamps_completed_at() {
        let mut task = sample_task(TaskStatus::InReview);
        assert!(task.completed_at.is_none());

        let now = Utc::now();
        task.transition_to(TaskStatus::Done, now);

        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.completed_at, Some(now));
    }

    #[test]
    fn test_leaving_done_clears_completed_at() {
        let mut task = sample_task(TaskStatus::Done);
        assert!(task.completed_at.is_some());

        task.transition_to(TaskStatus::InProgress, Utc::now());

        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_other_transitions_leave_completed_at_alone() {
        let mut task = sample_task(TaskStatus::Todo);
        task.transition_to(TaskStatus::Blocked, Utc::now());
        assert!(task.completed_at.is_none());

        // Re-entering done from done keeps the original stamp
        let mut task = sample_task(TaskStatus::Done);
        let original = task.completed_at;
        task.transition_to(TaskStatus::Done, Utc::now() + chrono::Duration::hours(1));
        assert_eq!(task.completed_at, original);
    }

    #[test]
    fn test_done_is_reenterable() {
        let mut task = sample_task(TaskStatus::Done);
        task.transition_to(TaskStatus::Todo, Utc::now());
        assert!(task.completed_at.is_none());

        let later = Utc::now();
        task.transition_to(TaskStatus::Done, later);
        assert_eq!(task.completed_at, Some(later));
    }

    #[test]
    fn test_done_lock_rejects_edits() {
        let mut task = sample_task(TaskStatus::Done);

        let err = task
            .apply_update(UpdateTask {
                title: Some("New title".to_string()),
                ..Default::default()
            })
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(task.title, "Fix bug");
        assert!(task.ensure_deletable().is_err());
    }

    #[test]
    fn test_apply_update_clears_and_sets() {
        let mut task = sample_task(TaskStatus::Todo);
        let assignee = Uuid::new_v4();

        task.apply_update(UpdateTask {
            description: Some(Some("details".to_string())),
            assigned_to: Some(Some(assignee)),
            priority: Some(TaskPriority::High),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(task.description.as_deref(), Some("details"));
        assert_eq!(task.assigned_to, Some(assignee));
        assert_eq!(task.priority, TaskPriority::High);

        task.apply_update(UpdateTask {
            assigned_to: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert!(task.assigned_to.is_none());
    }

    #[test]
    fn test_normalize_tags_dedups_case_insensitively() {
        let tags = vec![
            "Bug".to_string(),
            "bug".to_string(),
            " BUG ".to_string(),
            "ui".to_string(),
            "".to_string(),
            "  ".to_string(),
        ];

        assert_eq!(normalize_tags(tags), vec!["bug", "ui"]);
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());
        assert!(!UpdateTask {
            title: Some("t".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
