/// User model
///
/// This module provides the User entity representing an account in kanflow.
/// Users own and join boards; persistence goes through
/// [`crate::repo::UserRepository`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(64) NOT NULL UNIQUE,
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     full_name VARCHAR(255),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Soft delete
///
/// Users are never physically removed while boards or tasks reference them.
/// Deactivation flips `is_active`, which blocks authentication and hides the
/// account from member pickers but keeps historical tasks resolvable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the hash
/// is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique across all users
    pub username: String,

    /// Email address (case-insensitive via CITEXT), unique across all users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional display name
    pub full_name: Option<String>,

    /// Soft-delete flag; false blocks authentication
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name (must be unique)
    pub username: String,

    /// Email address (must be unique)
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Optional display name
    pub full_name: Option<String>,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields are applied; `Some(None)`
/// clears a clearable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address
    pub email: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,

    /// New display name (use Some(None) to clear)
    pub full_name: Option<Option<String>>,
}

impl User {
    /// Applies a profile update to the in-memory entity
    ///
    /// Uniqueness of the new email is the repository's concern; this only
    /// copies the requested fields.
    pub fn apply_update(&mut self, data: UpdateUser) {
        if let Some(email) = data.email {
            self.email = email;
        }
        if let Some(password_hash) = data.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(full_name) = data.full_name {
            self.full_name = full_name;
        }
    }

    /// Records a successful login
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
    }

    /// Marks the account active/inactive (soft delete)
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}
