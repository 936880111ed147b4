/// Board model
///
/// This module provides the Board entity: a named collection of tasks with an
/// owner and a set of members who may view and modify it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(120) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     members UUID[] NOT NULL,
///     color VARCHAR(16) NOT NULL DEFAULT '#0079bf',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE UNIQUE INDEX boards_owner_name_active
///     ON boards (owner_id, name) WHERE is_active;
/// ```
///
/// # Invariant
///
/// `owner_id` is always present in `members`. The owner is implicitly a
/// member; removing the owner from the member list is illegal, and ownership
/// can only be transferred to an existing member. Every mutator on this type
/// preserves the invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Default board color applied when creation omits one
pub const DEFAULT_BOARD_COLOR: &str = "#0079bf";

/// Board entity
///
/// `members` has set semantics: no duplicates, insertion order preserved for
/// stable display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID (UUID v4)
    pub id: Uuid,

    /// Board name, unique per owner among active boards
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Owning user; always a member
    pub owner_id: Uuid,

    /// Users granted access, owner included
    pub members: Vec<Uuid>,

    /// Display color (hex string)
    pub color: String,

    /// Soft-delete flag
    pub is_active: bool,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new board
///
/// The creator becomes the owner and the sole initial member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    /// Board name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional display color; defaults to [`DEFAULT_BOARD_COLOR`]
    pub color: Option<String>,

    /// Owning user
    pub owner_id: Uuid,
}

/// Input for updating board fields
///
/// Membership and ownership changes go through the dedicated mutators, not
/// this struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoard {
    /// New name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New display color
    pub color: Option<String>,
}

impl Board {
    /// True if the user is the owner or an invited member
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id || self.members.contains(&user_id)
    }

    /// Applies a field update
    pub fn apply_update(&mut self, data: UpdateBoard) {
        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(description) = data.description {
            self.description = description;
        }
        if let Some(color) = data.color {
            self.color = color;
        }
    }

    /// Adds a member; returns false if the user was already a member
    pub fn add_member(&mut self, user_id: Uuid) -> bool {
        if self.members.contains(&user_id) {
            return false;
        }
        self.members.push(user_id);
        true
    }

    /// Removes a member
    ///
    /// Removing the owner is illegal; the owner must first transfer
    /// ownership. Returns false if the user was not a member.
    pub fn remove_member(&mut self, user_id: Uuid) -> Result<bool, DomainError> {
        if user_id == self.owner_id {
            return Err(DomainError::validation(
                "the board owner cannot be removed from the member list",
            ));
        }

        let before = self.members.len();
        self.members.retain(|m| *m != user_id);
        Ok(self.members.len() != before)
    }

    /// Transfers ownership to an existing member
    pub fn transfer_ownership(&mut self, new_owner: Uuid) -> Result<(), DomainError> {
        if !self.members.contains(&new_owner) {
            return Err(DomainError::validation(
                "ownership can only be transferred to an existing board member",
            ));
        }
        self.owner_id = new_owner;
        Ok(())
    }

    /// Marks the board active/inactive (soft delete)
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board(owner: Uuid) -> Board {
        Board {
            id: Uuid::new_v4(),
            name: "Sprint 1".to_string(),
            description: None,
            owner_id: owner,
            members: vec![owner],
            color: DEFAULT_BOARD_COLOR.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_is_always_a_member() {
        let owner = Uuid::new_v4();
        let board = sample_board(owner);

        assert!(board.is_member(owner));
        assert!(board.members.contains(&board.owner_id));
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let owner = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let mut board = sample_board(owner);

        assert!(board.add_member(guest));
        assert!(!board.add_member(guest));
        assert_eq!(board.members.len(), 2);
        assert!(board.is_member(guest));
    }

    #[test]
    fn test_remove_member() {
        let owner = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let mut board = sample_board(owner);
        board.add_member(guest);

        assert!(board.remove_member(guest).unwrap());
        assert!(!board.is_member(guest));

        // Second removal is a no-op
        assert!(!board.remove_member(guest).unwrap());
    }

    #[test]
    fn test_remove_owner_is_rejected() {
        let owner = Uuid::new_v4();
        let mut board = sample_board(owner);

        let err = board.remove_member(owner).unwrap_err();
        assert!(err.is_validation());
        assert!(board.members.contains(&owner));
    }

    #[test]
    fn test_transfer_ownership_requires_membership() {
        let owner = Uuid::new_v4();
        let outsider = Uuid::new_v4();
        let mut board = sample_board(owner);

        let err = board.transfer_ownership(outsider).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(board.owner_id, owner);
    }

    #[test]
    fn test_transfer_ownership_to_member() {
        let owner = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let mut board = sample_board(owner);
        board.add_member(guest);

        board.transfer_ownership(guest).unwrap();
        assert_eq!(board.owner_id, guest);
        // The previous owner stays a member
        assert!(board.is_member(owner));
    }

    #[test]
    fn test_apply_update() {
        let mut board = sample_board(Uuid::new_v4());
        board.apply_update(UpdateBoard {
            name: Some("Sprint 2".to_string()),
            description: Some(Some("second iteration".to_string())),
            color: None,
        });

        assert_eq!(board.name, "Sprint 2");
        assert_eq!(board.description.as_deref(), Some("second iteration"));
        assert_eq!(board.color, DEFAULT_BOARD_COLOR);
    }
}
