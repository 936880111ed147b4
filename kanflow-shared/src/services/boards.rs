/// Board application operations
///
/// Creation, field updates, membership management, ownership transfer, and
/// deactivation. Every operation resolves the acting user's rights through
/// [`crate::auth::policy`] before touching state; deactivation cascades into
/// the board's tasks so no orphans remain.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::policy;
use crate::error::{DomainError, DomainResult};
use crate::models::board::{Board, CreateBoard, UpdateBoard};
use crate::repo::{BoardRepository, TaskRepository, UserRepository};

/// Orchestrates board lifecycle operations against the ports
#[derive(Clone)]
pub struct BoardService {
    boards: Arc<dyn BoardRepository>,
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl BoardService {
    /// Creates a service over the given repositories
    pub fn new(
        boards: Arc<dyn BoardRepository>,
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
    ) -> Self {
        Self {
            boards,
            users,
            tasks,
        }
    }

    /// Creates a board; the creator becomes owner and sole member
    ///
    /// # Errors
    ///
    /// - `NotFound` if the owner id does not resolve
    /// - `Validation` if the name is empty
    /// - `Conflict` if the owner already has an active board with this name
    pub async fn create(&self, data: CreateBoard) -> DomainResult<Board> {
        if data.name.trim().is_empty() {
            return Err(DomainError::validation("board name must not be empty"));
        }

        if !self.users.exists(data.owner_id).await? {
            return Err(DomainError::not_found("user", data.owner_id));
        }

        if self
            .boards
            .find_by_owner_and_name(data.owner_id, &data.name)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "a board named '{}' already exists for this owner",
                data.name
            )));
        }

        let board = self.boards.create(data).await?;
        tracing::info!(board_id = %board.id, owner_id = %board.owner_id, "created board");
        Ok(board)
    }

    /// Fetches an active board the acting user can access
    ///
    /// Deactivated boards are invisible: `NotFound`, not `Forbidden`.
    pub async fn get(&self, acting_user: Uuid, id: Uuid) -> DomainResult<Board> {
        let board = self.load_active(id).await?;
        policy::require_board_access(acting_user, &board)?;
        Ok(board)
    }

    /// Updates board fields (owner only)
    pub async fn update(
        &self,
        acting_user: Uuid,
        id: Uuid,
        data: UpdateBoard,
    ) -> DomainResult<Board> {
        let mut board = self.load_active(id).await?;
        policy::require_board_owner(acting_user, &board)?;

        if let Some(ref name) = data.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("board name must not be empty"));
            }
            if *name != board.name {
                if self
                    .boards
                    .find_by_owner_and_name(board.owner_id, name)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::conflict(format!(
                        "a board named '{}' already exists for this owner",
                        name
                    )));
                }
            }
        }

        board.apply_update(data);
        self.boards.update(board).await
    }

    /// Adds a member to the board (owner only)
    ///
    /// Idempotent: adding an existing member returns the board unchanged.
    pub async fn add_member(
        &self,
        acting_user: Uuid,
        board_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Board> {
        let mut board = self.load_active(board_id).await?;
        policy::require_board_owner(acting_user, &board)?;

        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;
        if !user.is_active {
            return Err(DomainError::validation(
                "cannot add a deactivated user to a board",
            ));
        }

        if !board.add_member(user_id) {
            return Ok(board);
        }
        self.boards.update(board).await
    }

    /// Removes a member from the board (owner only)
    ///
    /// Removing the owner is illegal; their historical tasks stay in place.
    pub async fn remove_member(
        &self,
        acting_user: Uuid,
        board_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<Board> {
        let mut board = self.load_active(board_id).await?;
        policy::require_board_owner(acting_user, &board)?;

        if !board.remove_member(user_id)? {
            return Ok(board);
        }
        self.boards.update(board).await
    }

    /// Transfers ownership to an existing member (owner only)
    pub async fn transfer_ownership(
        &self,
        acting_user: Uuid,
        board_id: Uuid,
        new_owner: Uuid,
    ) -> DomainResult<Board> {
        let mut board = self.load_active(board_id).await?;
        policy::require_board_owner(acting_user, &board)?;

        board.transfer_ownership(new_owner)?;
        let board = self.boards.update(board).await?;
        tracing::info!(board_id = %board.id, new_owner = %new_owner, "transferred board ownership");
        Ok(board)
    }

    /// Deactivates a board (owner only) and deletes its tasks
    ///
    /// The cascade is the operation's contract: a deactivated board leaves
    /// no orphaned tasks behind.
    pub async fn deactivate(&self, acting_user: Uuid, board_id: Uuid) -> DomainResult<Board> {
        let mut board = self.load_active(board_id).await?;
        policy::require_board_owner(acting_user, &board)?;

        board.set_active(false);
        let board = self.boards.update(board).await?;

        let removed = self.tasks.delete_by_board(board_id).await?;
        tracing::info!(board_id = %board.id, tasks_removed = removed, "deactivated board");
        Ok(board)
    }

    /// Lists active boards the user owns or is a member of
    pub async fn list_accessible(&self, user_id: Uuid) -> DomainResult<Vec<Board>> {
        self.boards.list_accessible(user_id).await
    }

    /// Free-text search over the user's accessible boards
    pub async fn search(&self, user_id: Uuid, query: &str) -> DomainResult<Vec<Board>> {
        self.boards.search(user_id, query).await
    }

    /// Loads a board treating missing and deactivated alike as `NotFound`
    async fn load_active(&self, id: Uuid) -> DomainResult<Board> {
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
