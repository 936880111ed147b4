/// Task application operations
///
/// The orchestration point for the domain: every operation resolves the
/// acting user → checks the authorization policy → applies the status state
/// machine → recomputes positions → persists through the Task port.
///
/// # Ordering
///
/// Tasks live in (board, status) columns with dense positions. Creation
/// appends to the `todo` column; a bare status change appends to the end of
/// the target column; `move_task` inserts at an explicit index. Source and
/// target columns are renumbered on every move so positions stay contiguous
/// from 0.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::policy;
use crate::error::{DomainError, DomainResult};
use crate::models::board::Board;
use crate::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};
use crate::ordering;
use crate::repo::{BoardRepository, TaskRepository};

/// Single-criterion filter for board task listings
///
/// Filters are applied singly; the first present field wins, in declaration
/// order. An empty filter lists the whole board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Free-text match over title/description
    pub text: Option<String>,

    /// One status column
    pub status: Option<TaskStatus>,

    /// One priority level
    pub priority: Option<TaskPriority>,

    /// One (normalized) tag
    pub tag: Option<String>,

    /// Due-window start (defaults to the beginning of time)
    pub due_from: Option<DateTime<Utc>>,

    /// Due-window end (defaults to the end of time)
    pub due_until: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// True if no criterion is present
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.tag.is_none()
            && self.due_from.is_none()
            && self.due_until.is_none()
    }
}

/// Orchestrates task lifecycle operations against the ports
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    boards: Arc<dyn BoardRepository>,
}

impl TaskService {
    /// Creates a service over the given repositories
    pub fn new(tasks: Arc<dyn TaskRepository>, boards: Arc<dyn BoardRepository>) -> Self {
        Self { tasks, boards }
    }

    /// Creates a task on a board
    ///
    /// `data.created_by` is the acting user. The task starts in `todo` at
    /// the end of the column.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the board does not exist (or is deactivated)
    /// - `Forbidden` if the creator is not a board member
    /// - `Validation` for an empty title or a non-member assignee
    pub async fn create(&self, data: CreateTask) -> DomainResult<Task> {
        let board = self.load_board(data.board_id).await?;

        if !policy::can_create_task(data.created_by, &board) {
            return Err(DomainError::forbidden(
                "only board members can create tasks on this board",
            ));
        }

        if data.title.trim().is_empty() {
            return Err(DomainError::validation("task title must not be empty"));
        }

        if let Some(assignee) = data.assigned_to {
            if !board.is_member(assignee) {
                return Err(DomainError::validation(
                    "assignee is not a member of the board",
                ));
            }
        }

        let position = self
            .tasks
            .list_bucket(board.id, TaskStatus::Todo)
            .await?
            .len() as i32;

        let task = self.tasks.create(data, position).await?;
        tracing::info!(task_id = %task.id, board_id = %task.board_id, "created task");
        Ok(task)
    }

    /// Fetches a task the acting user can see (any board member)
    pub async fn get(&self, acting_user: Uuid, id: Uuid) -> DomainResult<Task> {
        let task = self.load_task(id).await?;
        let board = self.load_board(task.board_id).await?;
        policy::require_board_access(acting_user, &board)?;
        Ok(task)
    }

    /// Updates task fields (creator or assignee only, Done-locked)
    pub async fn update(
        &self,
        acting_user: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> DomainResult<Task> {
        let mut task = self.load_task(id).await?;
        policy::require_task_editor(acting_user, &task)?;

        if let Some(ref title) = data.title {
            if title.trim().is_empty() {
                return Err(DomainError::validation("task title must not be empty"));
            }
        }

        if let Some(Some(assignee)) = data.assigned_to {
            let board = self.load_board(task.board_id).await?;
            if !board.is_member(assignee) {
                return Err(DomainError::validation(
                    "assignee is not a member of the board",
                ));
            }
        }

        // Rejects the edit entirely while the task is done
        task.apply_update(data)?;
        self.tasks.update(task).await
    }

    /// Changes a task's status (creator or assignee only)
    ///
    /// The task is appended at the end of the target column; the source
    /// column is renumbered. A same-status change is a no-op.
    pub async fn change_status(
        &self,
        acting_user: Uuid,
        id: Uuid,
        new_status: TaskStatus,
    ) -> DomainResult<Task> {
        let task = self.load_task(id).await?;
        if !policy::can_change_task_status(acting_user, &task) {
            return Err(DomainError::forbidden(
                "only the task's creator or assignee can change its status",
            ));
        }

        if task.status == new_status {
            return Ok(task);
        }

        self.relocate(task, new_status, None).await
    }

    /// Moves a task to a status column at an explicit index (drag-and-drop)
    ///
    /// Same-status moves reorder within the column; cross-status moves apply
    /// the state machine and renumber both columns. An index beyond the end
    /// appends.
    pub async fn move_task(
        &self,
        acting_user: Uuid,
        id: Uuid,
        target_status: TaskStatus,
        target_index: usize,
    ) -> DomainResult<Task> {
        let task = self.load_task(id).await?;
        if !policy::can_change_task_status(acting_user, &task) {
            return Err(DomainError::forbidden(
                "only the task's creator or assignee can move this task",
            ));
        }

        self.relocate(task, target_status, Some(target_index)).await
    }

    /// Deletes a task (creator only, Done-locked)
    ///
    /// The remaining column is renumbered. Repository deletion itself is
    /// idempotent, but a missing id surfaces as `NotFound` here because the
    /// rule checks need the entity.
    pub async fn delete(&self, acting_user: Uuid, id: Uuid) -> DomainResult<()> {
        let task = self.load_task(id).await?;
        policy::require_task_creator(acting_user, &task)?;
        task.ensure_deletable()?;

        self.tasks.delete(id).await?;

        let mut column = self.tasks.list_bucket(task.board_id, task.status).await?;
        ordering::normalize(&mut column);
        self.persist_positions(&column).await?;

        tracing::info!(task_id = %id, board_id = %task.board_id, "deleted task");
        Ok(())
    }

    /// Lists a board's tasks ordered by column and position (members only)
    pub async fn list_by_board(&self, acting_user: Uuid, board_id: Uuid) -> DomainResult<Vec<Task>> {
        let board = self.load_board(board_id).await?;
        policy::require_board_access(acting_user, &board)?;
        self.tasks.list_by_board(board_id).await
    }

    /// Lists a board's tasks matching a filter (members only)
    pub async fn list_by_board_filtered(
        &self,
        acting_user: Uuid,
        board_id: Uuid,
        filter: TaskFilter,
    ) -> DomainResult<Vec<Task>> {
        let board = self.load_board(board_id).await?;
        policy::require_board_access(acting_user, &board)?;

        if let Some(text) = filter.text {
            return self.tasks.search(board_id, &text).await;
        }
        if let Some(status) = filter.status {
            return self.tasks.list_bucket(board_id, status).await;
        }
        if let Some(priority) = filter.priority {
            return self.tasks.list_by_priority(board_id, priority).await;
        }
        if let Some(tag) = filter.tag {
            return self.tasks.list_by_tag(board_id, &tag).await;
        }
        if filter.due_from.is_some() || filter.due_until.is_some() {
            let from = filter.due_from.unwrap_or(DateTime::<Utc>::MIN_UTC);
            let until = filter.due_until.unwrap_or(DateTime::<Utc>::MAX_UTC);
            return self.tasks.list_due_between(board_id, from, until).await;
        }

        self.tasks.list_by_board(board_id).await
    }

    /// Lists tasks assigned to the user across all boards
    pub async fn list_assigned(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        self.tasks.list_by_assignee(user_id).await
    }

    /// Lists tasks created by the user across all boards
    pub async fn list_created(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        self.tasks.list_by_creator(user_id).await
    }

    /// Applies a move: state machine transition plus column renumbering
    ///
    /// `target_index: None` appends to the target column.
    async fn relocate(
        &self,
        mut task: Task,
        target_status: TaskStatus,
        target_index: Option<usize>,
    ) -> DomainResult<Task> {
        if task.status == target_status {
            // Reorder within one column
            let mut column = self.tasks.list_bucket(task.board_id, task.status).await?;
            ordering::normalize(&mut column);

            let from = column
                .iter()
                .position(|t| t.id == task.id)
                .ok_or_else(|| DomainError::not_found("task", task.id))?;
            let to = target_index.unwrap_or(column.len().saturating_sub(1));

            ordering::reorder_within_column(&mut column, from, to)?;
            let moved = self.take_from(&column, task.id)?;
            let moved = self.tasks.update(moved).await?;
            self.persist_positions(&column).await?;
            return Ok(moved);
        }

        // Remove from the source column and renumber the remainder
        let mut source = self.tasks.list_bucket(task.board_id, task.status).await?;
        ordering::normalize(&mut source);
        let _ = ordering::remove(&mut source, task.id);

        // Apply the state machine, then insert into the target column
        task.transition_to(target_status, Utc::now());

        let mut target = self.tasks.list_bucket(task.board_id, target_status).await?;
        ordering::normalize(&mut target);
        let index = target_index.unwrap_or(target.len());
        ordering::insert_at(&mut target, task.clone(), index);

        let moved = self.take_from(&target, task.id)?;
        let moved = self.tasks.update(moved).await?;
        self.persist_positions(&target).await?;
        self.persist_positions(&source).await?;
        Ok(moved)
    }

    /// Writes a renumbered column's positions back through the port
    async fn persist_positions(&self, column: &[Task]) -> DomainResult<()> {
        let updates: Vec<(Uuid, i32)> = column.iter().map(|t| (t.id, t.position)).collect();
        self.tasks.update_positions(&updates).await
    }

    /// Clones a task back out of a renumbered column
    fn take_from(&self, column: &[Task], id: Uuid) -> DomainResult<Task> {
        column
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("task", id))
    }

    /// Loads a task, failing with `NotFound` if missing
    async fn load_task(&self, id: Uuid) -> DomainResult<Task> {
        self.tasks
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("task", id))
    }

    /// Loads an active board; deactivated boards read as `NotFound`
    async fn load_board(&self, id: Uuid) -> DomainResult<Board> {
        let board = self
            .boards
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("board", id))?;

        if !board.is_active {
            return Err(DomainError::not_found("board", id));
        }
        Ok(board)
    }
}
