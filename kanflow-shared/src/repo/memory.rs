/// In-memory repository implementations
///
/// `RwLock<HashMap>`-backed stores honoring the same contract as the
/// Postgres implementations: `Ok(None)` for missing ids, idempotent deletes,
/// `Conflict` on uniqueness violations, id/timestamp assignment on create.
/// They back the service-level test suites and make the domain layer
/// exercisable without a database.
///
/// # Example
///
/// ```
/// use kanflow_shared::repo::{memory::InMemoryUserRepository, UserRepository};
/// use kanflow_shared::models::user::CreateUser;
///
/// # async fn example() -> Result<(), kanflow_shared::error::DomainError> {
/// let repo = InMemoryUserRepository::new();
/// let user = repo.create(CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$stub".to_string(),
///     full_name: None,
/// }).await?;
/// assert!(repo.exists(user.id).await?);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::board::{Board, CreateBoard, DEFAULT_BOARD_COLOR};
use crate::models::task::{normalize_tags, CreateTask, Task, TaskPriority, TaskStatus};
use crate::models::user::{CreateUser, User};
use crate::repo::{BoardRepository, TaskRepository, UserRepository};

/// In-memory User store
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_all(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create(&self, data: CreateUser) -> DomainResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == data.username) {
            return Err(DomainError::conflict("username already taken"));
        }
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(DomainError::conflict("email already registered"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            full_name: data.full_name,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, mut user: User) -> DomainResult<User> {
        let mut users = self.users.write().await;

        let existing = users
            .get(&user.id)
            .ok_or_else(|| DomainError::not_found("user", user.id))?;

        if users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::conflict("email already registered"));
        }

        user.created_at = existing.created_at;
        user.updated_at = Utc::now();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.users.read().await.contains_key(&id))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_by_active(&self, active: bool) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active == active)
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn search(&self, query: &str) -> DomainResult<Vec<User>> {
        let needle = query.to_lowercase();
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| {
                u.username.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
                    || u.full_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

/// In-memory Board store
#[derive(Default)]
pub struct InMemoryBoardRepository {
    boards: RwLock<HashMap<Uuid, Board>>,
}

impl InMemoryBoardRepository {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<Board>> {
        Ok(self.boards.read().await.get(&id).cloned())
    }

    async fn get_all(&self) -> DomainResult<Vec<Board>> {
        let mut boards: Vec<Board> = self.boards.read().await.values().cloned().collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn create(&self, data: CreateBoard) -> DomainResult<Board> {
        let mut boards = self.boards.write().await;

        if boards
            .values()
            .any(|b| b.is_active && b.owner_id == data.owner_id && b.name == data.name)
        {
            return Err(DomainError::conflict(format!(
                "a board named '{}' already exists for this owner",
                data.name
            )));
        }

        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            owner_id: data.owner_id,
            members: vec![data.owner_id],
            color: data
                .color
                .unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn update(&self, mut board: Board) -> DomainResult<Board> {
        let mut boards = self.boards.write().await;

        let existing = boards
            .get(&board.id)
            .ok_or_else(|| DomainError::not_found("board", board.id))?;

        if boards.values().any(|b| {
            b.id != board.id
                && b.is_active
                && board.is_active
                && b.owner_id == board.owner_id
                && b.name == board.name
        }) {
            return Err(DomainError::conflict(format!(
                "a board named '{}' already exists for this owner",
                board.name
            )));
        }

        board.created_at = existing.created_at;
        board.updated_at = Utc::now();
        boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.boards.write().await.remove(&id).is_some())
    }

    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.boards.read().await.contains_key(&id))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Board>> {
        let mut boards: Vec<Board> = self
            .boards
            .read()
            .await
            .values()
            .filter(|b| b.is_active && b.owner_id == owner_id)
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn list_accessible(&self, user_id: Uuid) -> DomainResult<Vec<Board>> {
        let mut boards: Vec<Board> = self
            .boards
            .read()
            .await
            .values()
            .filter(|b| b.is_active && b.is_member(user_id))
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> DomainResult<Option<Board>> {
        Ok(self
            .boards
            .read()
            .await
            .values()
            .find(|b| b.is_active && b.owner_id == owner_id && b.name == name)
            .cloned())
    }

    async fn search(&self, user_id: Uuid, query: &str) -> DomainResult<Vec<Board>> {
        let needle = query.to_lowercase();
        let mut boards: Vec<Board> = self
            .boards
            .read()
            .await
            .values()
            .filter(|b| {
                b.is_active
                    && b.is_member(user_id)
                    && (b.name.to_lowercase().contains(&needle)
                        || b.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle)))
            })
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }
}

/// In-memory Task store
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted<F>(tasks: &HashMap<Uuid, Task>, predicate: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        let mut out: Vec<Task> = tasks.values().filter(|t| predicate(t)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn get_all(&self) -> DomainResult<Vec<Task>> {
        Ok(Self::collect_sorted(&*self.tasks.read().await, |_| true))
    }

    async fn create(&self, data: CreateTask, position: i32) -> DomainResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            board_id: data.board_id,
            title: data.title,
            description: data.description,
            status: TaskStatus::Todo,
            priority: data.priority,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            tags: normalize_tags(data.tags),
            position,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, mut task: Task) -> DomainResult<Task> {
        let mut tasks = self.tasks.write().await;

        let existing = tasks
            .get(&task.id)
            .ok_or_else(|| DomainError::not_found("task", task.id))?;

        task.created_at = existing.created_at;
        task.updated_at = Utc::now();
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }

    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.tasks.read().await.contains_key(&id))
    }

    async fn list_by_board(&self, board_id: Uuid) -> DomainResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut out: Vec<Task> = tasks
            .values()
            .filter(|t| t.board_id == board_id)
            .cloned()
            .collect();
        out.sort_by_key(|t| {
            let column = TaskStatus::ALL
                .iter()
                .position(|s| *s == t.status)
                .unwrap_or(usize::MAX);
            (column, t.position)
        });
        Ok(out)
    }

    async fn list_bucket(&self, board_id: Uuid, status: TaskStatus) -> DomainResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut out: Vec<Task> = tasks
            .values()
            .filter(|t| t.board_id == board_id && t.status == status)
            .cloned()
            .collect();
        out.sort_by_key(|t| t.position);
        Ok(out)
    }

    async fn list_by_assignee(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        Ok(Self::collect_sorted(&*self.tasks.read().await, |t| {
            t.assigned_to == Some(user_id)
        }))
    }

    async fn list_by_creator(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        Ok(Self::collect_sorted(&*self.tasks.read().await, |t| {
            t.created_by == user_id
        }))
    }

    async fn list_by_priority(
        &self,
        board_id: Uuid,
        priority: TaskPriority,
    ) -> DomainResult<Vec<Task>> {
        Ok(Self::collect_sorted(&*self.tasks.read().await, |t| {
            t.board_id == board_id && t.priority == priority
        }))
    }

    async fn list_by_tag(&self, board_id: Uuid, tag: &str) -> DomainResult<Vec<Task>> {
        let tag = tag.to_lowercase();
        Ok(Self::collect_sorted(&*self.tasks.read().await, |t| {
            t.board_id == board_id && t.tags.contains(&tag)
        }))
    }

    async fn list_due_between(
        &self,
        board_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<Task>> {
        Ok(Self::collect_sorted(&*self.tasks.read().await, |t| {
            t.board_id == board_id
                && t.due_date
                    .is_some_and(|due| due >= from && due <= until)
        }))
    }

    async fn search(&self, board_id: Uuid, query: &str) -> DomainResult<Vec<Task>> {
        let needle = query.to_lowercase();
        Ok(Self::collect_sorted(&*self.tasks.read().await, |t| {
            t.board_id == board_id
                && (t.title.to_lowercase().contains(&needle)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle)))
        }))
    }

    async fn update_positions(&self, updates: &[(Uuid, i32)]) -> DomainResult<()> {
        let mut tasks = self.tasks.write().await;
        for (id, position) in updates {
            if let Some(task) = tasks.get_mut(id) {
                task.position = *position;
            }
        }
        Ok(())
    }

    async fn delete_by_board(&self, board_id: Uuid) -> DomainResult<u64> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, t| t.board_id != board_id);
        Ok((before - tasks.len()) as u64)
    }
}
