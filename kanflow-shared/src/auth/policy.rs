/// Authorization policy
///
/// Pure allow/deny decisions derived from entity relationships: board
/// ownership, board membership, and task creatorship/assignment. No I/O —
/// callers load the entities through the repository ports first.
///
/// # Permission model
///
/// 1. **Board access**: owner or member may view the board and its tasks
/// 2. **Board management**: only the owner may rename, delete, or change
///    membership
/// 3. **Task editing**: creator or assignee may edit and change status
/// 4. **Task deletion**: only the creator may delete
///
/// Every `require_*` helper converts a denial into
/// [`DomainError::Forbidden`] naming the failed rule, so callers surface it
/// distinctly from `NotFound`.
///
/// # Example
///
/// ```no_run
/// use kanflow_shared::auth::policy;
/// use kanflow_shared::models::board::Board;
/// use uuid::Uuid;
///
/// fn check(user_id: Uuid, board: &Board) -> Result<(), kanflow_shared::error::DomainError> {
///     policy::require_board_access(user_id, board)?;
///     Ok(())
/// }
/// ```

use uuid::Uuid;

use crate::error::DomainError;
use crate::models::board::Board;
use crate::models::task::Task;

/// True iff the user is the board owner or a member
pub fn can_access_board(user_id: Uuid, board: &Board) -> bool {
    board.is_member(user_id)
}

/// True iff the user is the board owner
///
/// Covers rename, deactivation, membership changes, and ownership transfer.
pub fn can_modify_board(user_id: Uuid, board: &Board) -> bool {
    board.owner_id == user_id
}

/// True iff the user may create tasks on the board (any member)
pub fn can_create_task(user_id: Uuid, board: &Board) -> bool {
    can_access_board(user_id, board)
}

/// True iff the user is the task's creator or assignee
pub fn can_edit_task(user_id: Uuid, task: &Task) -> bool {
    task.created_by == user_id || task.assigned_to == Some(user_id)
}

/// True iff the user may change the task's status (same rule as editing)
pub fn can_change_task_status(user_id: Uuid, task: &Task) -> bool {
    can_edit_task(user_id, task)
}

/// True iff the user is the task's creator
pub fn can_delete_task(user_id: Uuid, task: &Task) -> bool {
    task.created_by == user_id
}

/// Requires board access, naming the rule on denial
pub fn require_board_access(user_id: Uuid, board: &Board) -> Result<(), DomainError> {
    if !can_access_board(user_id, board) {
        return Err(DomainError::forbidden(
            "only board members can access this board",
        ));
    }
    Ok(())
}

/// Requires board ownership, naming the rule on denial
pub fn require_board_owner(user_id: Uuid, board: &Board) -> Result<(), DomainError> {
    if !can_modify_board(user_id, board) {
        return Err(DomainError::forbidden(
            "only the board owner can modify this board",
        ));
    }
    Ok(())
}

/// Requires task edit rights, naming the rule on denial
pub fn require_task_editor(user_id: Uuid, task: &Task) -> Result<(), DomainError> {
    if !can_edit_task(user_id, task) {
        return Err(DomainError::forbidden(
            "only the task's creator or assignee can modify this task",
        ));
    }
    Ok(())
}

/// Requires task deletion rights, naming the rule on denial
pub fn require_task_creator(user_id: Uuid, task: &Task) -> Result<(), DomainError> {
    if !can_delete_task(user_id, task) {
        return Err(DomainError::forbidden(
            "only the task's creator can delete this task",
        ));
    }
    Ok(())
}
