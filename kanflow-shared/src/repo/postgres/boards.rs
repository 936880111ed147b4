/// Postgres implementation of the Board port

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::board::{Board, CreateBoard, DEFAULT_BOARD_COLOR};
use crate::repo::BoardRepository;

use super::map_write_error;

const BOARD_COLUMNS: &str = "id, name, description, owner_id, members, color, is_active, \
                             created_at, updated_at";

/// sqlx-backed Board repository
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepository for PgBoardRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(board)
    }

    async fn get_all(&self) -> DomainResult<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(boards)
    }

    async fn create(&self, data: CreateBoard) -> DomainResult<Board> {
        // The owner is the sole initial member
        let board = sqlx::query_as::<_, Board>(&format!(
            r#"
            INSERT INTO boards (name, description, owner_id, members, color)
            VALUES ($1, $2, $3, ARRAY[$3], $4)
            RETURNING {BOARD_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .bind(
            data.color
                .unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string()),
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(board)
    }

    async fn update(&self, board: Board) -> DomainResult<Board> {
        let updated = sqlx::query_as::<_, Board>(&format!(
            r#"
            UPDATE boards
            SET name = $2,
                description = $3,
                owner_id = $4,
                members = $5,
                color = $6,
                is_active = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOARD_COLUMNS}
            "#
        ))
        .bind(board.id)
        .bind(board.name)
        .bind(board.description)
        .bind(board.owner_id)
        .bind(board.members)
        .bind(board.color)
        .bind(board.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        updated.ok_or_else(|| DomainError::not_found("board", board.id))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        // Tasks go with the board via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM boards WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(&format!(
            r#"
            SELECT {BOARD_COLUMNS}
            FROM boards
            WHERE is_active AND owner_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(boards)
    }

    async fn list_accessible(&self, user_id: Uuid) -> DomainResult<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(&format!(
            r#"
            SELECT {BOARD_COLUMNS}
            FROM boards
            WHERE is_active AND (owner_id = $1 OR $1 = ANY(members))
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(boards)
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> DomainResult<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(&format!(
            r#"
            SELECT {BOARD_COLUMNS}
            FROM boards
            WHERE is_active AND owner_id = $1 AND name = $2
            "#
        ))
        .bind(owner_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(board)
    }

    async fn search(&self, user_id: Uuid, query: &str) -> DomainResult<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(&format!(
            r#"
            SELECT {BOARD_COLUMNS}
            FROM boards
            WHERE is_active
              AND (owner_id = $1 OR $1 = ANY(members))
              AND (name ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(boards)
    }
}
