/// Repository ports
///
/// One trait per aggregate. The traits are the persistence boundary: the
/// services and policies above them are written against these contracts and
/// never see sqlx directly.
///
/// # Contract
///
/// Every implementation must honor the same guarantees so callers need no
/// defensive null/exception handling:
///
/// - `get_by_id` returns `Ok(None)` for a missing id, never an error
/// - `get_all`/list queries return an empty Vec when nothing matches
/// - `create` assigns the id and `created_at`/`updated_at`
/// - `update` refreshes `updated_at`, preserves the original `created_at`,
///   and fails with `NotFound` if the entity no longer exists
/// - `delete` is idempotent: `Ok(true)` iff something was deleted, `Ok(false)`
///   on a missing id, never an error
/// - uniqueness violations surface as `DomainError::Conflict`
/// - only backend failures surface as `DomainError::Storage`
///
/// # Implementations
///
/// - [`postgres`]: sqlx against Postgres (production)
/// - [`memory`]: `RwLock<HashMap>` store (service-level tests)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::models::board::{Board, CreateBoard};
use crate::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

/// Persistence port for the User aggregate
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id; `Ok(None)` if missing
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Lists all users, newest first
    async fn get_all(&self) -> DomainResult<Vec<User>>;

    /// Creates a user, assigning id and timestamps
    ///
    /// Fails with `Conflict` on a duplicate username or email.
    async fn create(&self, data: CreateUser) -> DomainResult<User>;

    /// Persists an updated user, refreshing `updated_at`
    async fn update(&self, user: User) -> DomainResult<User>;

    /// Deletes a user; `Ok(false)` if the id was already gone
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// True iff a user with this id exists
    async fn exists(&self, id: Uuid) -> DomainResult<bool>;

    /// Finds a user by exact username
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Finds a user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Lists users by their active flag
    async fn list_by_active(&self, active: bool) -> DomainResult<Vec<User>>;

    /// Free-text search over username, email, and full name
    async fn search(&self, query: &str) -> DomainResult<Vec<User>>;
}

/// Persistence port for the Board aggregate
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Finds a board by id; `Ok(None)` if missing
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<Board>>;

    /// Lists all boards, newest first
    async fn get_all(&self) -> DomainResult<Vec<Board>>;

    /// Creates a board; the owner becomes the sole initial member
    ///
    /// Fails with `Conflict` if the owner already has an active board with
    /// this name.
    async fn create(&self, data: CreateBoard) -> DomainResult<Board>;

    /// Persists an updated board, refreshing `updated_at`
    async fn update(&self, board: Board) -> DomainResult<Board>;

    /// Deletes a board; `Ok(false)` if the id was already gone
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// True iff a board with this id exists
    async fn exists(&self, id: Uuid) -> DomainResult<bool>;

    /// Lists boards owned by a user (active only), newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Board>>;

    /// Lists active boards the user owns or is a member of, newest first
    async fn list_accessible(&self, user_id: Uuid) -> DomainResult<Vec<Board>>;

    /// Finds an active board by owner and exact name
    async fn find_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> DomainResult<Option<Board>>;

    /// Free-text search over name/description within the user's accessible
    /// boards
    async fn search(&self, user_id: Uuid, query: &str) -> DomainResult<Vec<Board>>;
}

/// Persistence port for the Task aggregate
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by id; `Ok(None)` if missing
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<Task>>;

    /// Lists all tasks, newest first
    async fn get_all(&self) -> DomainResult<Vec<Task>>;

    /// Creates a task at the given position in its (board, status) column
    ///
    /// The caller (the task service) computes the position; the repository
    /// assigns id and timestamps.
    async fn create(&self, data: CreateTask, position: i32) -> DomainResult<Task>;

    /// Persists an updated task, refreshing `updated_at`
    async fn update(&self, task: Task) -> DomainResult<Task>;

    /// Deletes a task; `Ok(false)` if the id was already gone
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// True iff a task with this id exists
    async fn exists(&self, id: Uuid) -> DomainResult<bool>;

    /// Lists a board's tasks ordered by status column, then position
    async fn list_by_board(&self, board_id: Uuid) -> DomainResult<Vec<Task>>;

    /// Lists one (board, status) column ordered by position
    async fn list_bucket(&self, board_id: Uuid, status: TaskStatus) -> DomainResult<Vec<Task>>;

    /// Lists tasks assigned to a user across boards, newest first
    async fn list_by_assignee(&self, user_id: Uuid) -> DomainResult<Vec<Task>>;

    /// Lists tasks created by a user across boards, newest first
    async fn list_by_creator(&self, user_id: Uuid) -> DomainResult<Vec<Task>>;

    /// Lists a board's tasks with the given priority
    async fn list_by_priority(
        &self,
        board_id: Uuid,
        priority: TaskPriority,
    ) -> DomainResult<Vec<Task>>;

    /// Lists a board's tasks carrying the given (normalized) tag
    async fn list_by_tag(&self, board_id: Uuid, tag: &str) -> DomainResult<Vec<Task>>;

    /// Lists a board's tasks due inside [from, until]
    async fn list_due_between(
        &self,
        board_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<Task>>;

    /// Free-text search over title/description within one board
    async fn search(&self, board_id: Uuid, query: &str) -> DomainResult<Vec<Task>>;

    /// Bulk-writes positions after a renumber
    ///
    /// Only the ordering key changes; `updated_at` of the renumbered
    /// neighbors is deliberately left alone (a drag is not a content edit of
    /// every sibling). Missing ids are skipped.
    async fn update_positions(&self, updates: &[(Uuid, i32)]) -> DomainResult<()>;

    /// Deletes every task on a board (cascade for board deactivation)
    ///
    /// Returns the number of tasks removed.
    async fn delete_by_board(&self, board_id: Uuid) -> DomainResult<u64>;
}
