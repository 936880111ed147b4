/// Common test utilities for the service-level suites
///
/// Wires the three services over in-memory repositories so the domain rules
/// can be exercised hermetically, and provides fixture helpers for users,
/// boards, and tasks.

use std::sync::Arc;

use kanflow_shared::models::board::{Board, CreateBoard};
use kanflow_shared::models::task::{CreateTask, Task, TaskPriority};
use kanflow_shared::models::user::{CreateUser, User};
use kanflow_shared::repo::memory::{
    InMemoryBoardRepository, InMemoryTaskRepository, InMemoryUserRepository,
};
use kanflow_shared::repo::{BoardRepository, TaskRepository, UserRepository};
use kanflow_shared::services::{BoardService, TaskService, UserService};
use uuid::Uuid;

/// Services plus raw port handles for contract-level assertions
pub struct TestContext {
    pub users: UserService,
    pub boards: BoardService,
    pub tasks: TaskService,
    pub user_repo: Arc<dyn UserRepository>,
    pub board_repo: Arc<dyn BoardRepository>,
    pub task_repo: Arc<dyn TaskRepository>,
}

impl TestContext {
    /// Builds a fresh in-memory stack
    pub fn new() -> Self {
        let user_repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let board_repo: Arc<dyn BoardRepository> = Arc::new(InMemoryBoardRepository::new());
        let task_repo: Arc<dyn TaskRepository> = Arc::new(InMemoryTaskRepository::new());

        Self {
            users: UserService::new(user_repo.clone()),
            boards: BoardService::new(board_repo.clone(), user_repo.clone(), task_repo.clone()),
            tasks: TaskService::new(task_repo.clone(), board_repo.clone()),
            user_repo,
            board_repo,
            task_repo,
        }
    }

    /// Registers a user with derived email and a stub hash
    pub async fn register(&self, username: &str) -> User {
        self.users
            .register(CreateUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "$argon2id$stub".to_string(),
                full_name: None,
            })
            .await
            .expect("user registration should succeed")
    }

    /// Creates a board owned by `owner` with the given extra members
    pub async fn board_with_members(&self, name: &str, owner: Uuid, members: &[Uuid]) -> Board {
        let board = self
            .boards
            .create(CreateBoard {
                name: name.to_string(),
                description: None,
                color: None,
                owner_id: owner,
            })
            .await
            .expect("board creation should succeed");

        let mut board = board;
        for member in members {
            board = self
                .boards
                .add_member(owner, board.id, *member)
                .await
                .expect("adding member should succeed");
        }
        board
    }

    /// Creates a task with defaults on the given board
    pub async fn task(&self, board_id: Uuid, creator: Uuid, title: &str) -> Task {
        self.tasks
            .create(CreateTask {
                board_id,
                title: title.to_string(),
                description: None,
                priority: TaskPriority::Medium,
                created_by: creator,
                assigned_to: None,
                due_date: None,
                tags: vec![],
            })
            .await
            .expect("task creation should succeed")
    }
}

/// Asserts a column holds the given titles at contiguous positions 0..n-1
pub fn assert_column(tasks: &[Task], titles: &[&str]) {
    let got: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(got, titles, "column order mismatch");

    let positions: Vec<i32> = tasks.iter().map(|t| t.position).collect();
    let expected: Vec<i32> = (0..tasks.len() as i32).collect();
    assert_eq!(positions, expected, "positions must be contiguous from 0");
}
