/// Application services
///
/// One service per aggregate, constructed with `Arc<dyn …Repository>` ports
/// (plain constructor injection, no factories). The services own the
/// operation flow: resolve acting user → authorization policy → state
/// machine / reorderer → repository.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kanflow_shared::repo::memory::{
///     InMemoryBoardRepository, InMemoryTaskRepository, InMemoryUserRepository,
/// };
/// use kanflow_shared::services::{BoardService, TaskService, UserService};
///
/// let users = Arc::new(InMemoryUserRepository::new());
/// let boards = Arc::new(InMemoryBoardRepository::new());
/// let tasks = Arc::new(InMemoryTaskRepository::new());
///
/// let user_service = UserService::new(users.clone());
/// let board_service = BoardService::new(boards.clone(), users.clone(), tasks.clone());
/// let task_service = TaskService::new(tasks, boards);
/// ```

mod boards;
mod tasks;
mod users;

pub use boards::BoardService;
pub use tasks::{TaskFilter, TaskService};
pub use users::UserService;
