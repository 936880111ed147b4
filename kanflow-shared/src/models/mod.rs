/// Domain entities for kanflow
///
/// This module contains the three aggregates and their input types. The
/// entities are plain data holders with invariant-enforcing mutators;
/// persistence goes through the ports in [`crate::repo`].
///
/// # Models
///
/// - `user`: accounts that own and join boards
/// - `board`: named task collections with an owner and a member set
/// - `task`: units of work moving through status columns
///
/// # Example
///
/// ```
/// use kanflow_shared::models::task::{TaskStatus, TaskPriority};
///
/// assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
/// assert_eq!(TaskPriority::default(), TaskPriority::Medium);
/// ```

pub mod board;
pub mod task;
pub mod user;
