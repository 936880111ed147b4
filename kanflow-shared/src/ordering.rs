/// Position ordering for drag-and-drop
///
/// Tasks inside one (board, status) column carry a dense integer `position`
/// (0..n-1) that backs the display order. This module owns the renumbering
/// rules; the task service decides *which* buckets to touch and persists the
/// result.
///
/// Two concurrent reorders of the same column are not coordinated here: the
/// repository applies last-write-wins, and a later renumber repairs any gap
/// or duplicate (accepted limitation).
///
/// # Example
///
/// ```
/// # use kanflow_shared::ordering;
/// # use kanflow_shared::models::task::{Task, TaskStatus, TaskPriority};
/// # use chrono::Utc;
/// # use uuid::Uuid;
/// # fn task(title: &str, position: i32) -> Task {
/// #     Task {
/// #         id: Uuid::new_v4(), board_id: Uuid::new_v4(), title: title.into(),
/// #         description: None, status: TaskStatus::Todo,
/// #         priority: TaskPriority::Medium, created_by: Uuid::new_v4(),
/// #         assigned_to: None, due_date: None, tags: vec![], position,
/// #         created_at: Utc::now(), updated_at: Utc::now(), completed_at: None,
/// #     }
/// # }
/// let mut column = vec![task("a", 0), task("b", 1), task("c", 2)];
/// ordering::reorder_within_column(&mut column, 2, 0).unwrap();
/// assert_eq!(column[0].title, "c");
/// assert_eq!(column.iter().map(|t| t.position).collect::<Vec<_>>(), vec![0, 1, 2]);
/// ```

use uuid::Uuid;

use crate::error::DomainError;
use crate::models::task::Task;

/// Renumbers a column with consecutive positions starting at 0
///
/// Slice order is taken as display order; after this, positions are unique
/// and contiguous.
pub fn renumber(column: &mut [Task]) {
    for (index, task) in column.iter_mut().enumerate() {
        task.position = index as i32;
    }
}

/// Sorts a column by its stored positions, then renumbers
///
/// Used when loading a bucket from the repository: repairs any gaps or
/// duplicates left behind by racing writers before applying a new move.
pub fn normalize(column: &mut Vec<Task>) {
    column.sort_by_key(|t| t.position);
    renumber(column);
}

/// Moves the task at `from` to `to` within one column, then renumbers
///
/// `to` beyond the end of the column clamps to append. `from` must address
/// an existing entry.
pub fn reorder_within_column(
    column: &mut Vec<Task>,
    from: usize,
    to: usize,
) -> Result<(), DomainError> {
    if from >= column.len() {
        return Err(DomainError::validation(format!(
            "reorder source index {} is out of bounds for a column of {} tasks",
            from,
            column.len()
        )));
    }

    let task = column.remove(from);
    let to = to.min(column.len());
    column.insert(to, task);
    renumber(column);
    Ok(())
}

/// Inserts a task into a column at `index`, then renumbers
///
/// `index` beyond the end clamps to append; inserting at 0 on an empty
/// column yields position 0.
pub fn insert_at(column: &mut Vec<Task>, task: Task, index: usize) {
    let index = index.min(column.len());
    column.insert(index, task);
    renumber(column);
}

/// Removes a task from a column by id, then renumbers the remainder
///
/// Returns the removed task, or None if the id is not in the column.
pub fn remove(column: &mut Vec<Task>, task_id: Uuid) -> Option<Task> {
    let index = column.iter().position(|t| t.id == task_id)?;
    let task = column.remove(index);
    renumber(column);
    Some(task)
}
