/// Postgres implementation of the User port

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::user::{CreateUser, User};
use crate::repo::UserRepository;

use super::map_write_error;

const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, is_active, \
                            created_at, updated_at, last_login_at";

/// sqlx-backed User repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_all(&self) -> DomainResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, data: CreateUser) -> DomainResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, full_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(user)
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let updated = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $2,
                email = $3,
                password_hash = $4,
                full_name = $5,
                is_active = $6,
                last_login_at = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.full_name)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        updated.ok_or_else(|| DomainError::not_found("user", user.id))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        // Case-insensitive via the CITEXT column type
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_by_active(&self, active: bool) -> DomainResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_active = $1 ORDER BY created_at DESC"
        ))
        .bind(active)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn search(&self, query: &str) -> DomainResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username ILIKE '%' || $1 || '%'
               OR email::text ILIKE '%' || $1 || '%'
               OR full_name ILIKE '%' || $1 || '%'
            ORDER BY created_at DESC
            "#
        ))
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
