/// User application operations
///
/// Registration, profile updates, login stamping, and soft activation. The
/// service owns the uniqueness rules (duplicate username/email → `Conflict`)
/// and the structural ones (empty identifiers → `Validation`); the password
/// is already hashed by the time it reaches this layer.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repo::UserRepository;

/// Orchestrates user lifecycle operations against the User port
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a service over the given repository
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a new account
    ///
    /// # Errors
    ///
    /// - `Validation` if the username or email is empty
    /// - `Conflict` if the username or email is already registered
    pub async fn register(&self, data: CreateUser) -> DomainResult<User> {
        if data.username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        if data.email.trim().is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }

        if self.users.find_by_username(&data.username).await?.is_some() {
            return Err(DomainError::conflict("username already taken"));
        }
        if self.users.find_by_email(&data.email).await?.is_some() {
            return Err(DomainError::conflict("email already registered"));
        }

        let user = self.users.create(data).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "registered user");
        Ok(user)
    }

    /// Fetches a user, failing with `NotFound` if missing
    pub async fn get(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Resolves a login name (username or email) to an account
    pub async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        if let Some(user) = self.users.find_by_username(login).await? {
            return Ok(Some(user));
        }
        self.users.find_by_email(login).await
    }

    /// Updates profile fields
    ///
    /// A changed email must still be unique; the repository enforces that
    /// with a `Conflict`.
    pub async fn update_profile(&self, id: Uuid, data: UpdateUser) -> DomainResult<User> {
        let mut user = self.get(id).await?;

        if let Some(ref email) = data.email {
            if email.trim().is_empty() {
                return Err(DomainError::validation("email must not be empty"));
            }
        }

        user.apply_update(data);
        self.users.update(user).await
    }

    /// Stamps a successful login on the account
    pub async fn record_login(&self, id: Uuid) -> DomainResult<User> {
        let mut user = self.get(id).await?;
        user.record_login(Utc::now());
        self.users.update(user).await
    }

    /// Deactivates an account (soft delete)
    ///
    /// Board memberships and historical tasks keep referencing the account;
    /// only authentication is blocked.
    pub async fn deactivate(&self, id: Uuid) -> DomainResult<User> {
        let mut user = self.get(id).await?;
        user.set_active(false);
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "deactivated user");
        Ok(user)
    }

    /// Reactivates a previously deactivated account
    pub async fn activate(&self, id: Uuid) -> DomainResult<User> {
        let mut user = self.get(id).await?;
        user.set_active(true);
        self.users.update(user).await
    }

    /// Free-text search over username, email, and full name
    pub async fn search(&self, query: &str) -> DomainResult<Vec<User>> {
        self.users.search(query).await
    }

    /// Lists users by active flag
    pub async fn list_by_active(&self, active: bool) -> DomainResult<Vec<User>> {
        self.users.list_by_active(active).await
    }
}
