/// Postgres implementation of the Task port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::task::{normalize_tags, CreateTask, Task, TaskPriority, TaskStatus};
use crate::repo::TaskRepository;

use super::map_write_error;

const TASK_COLUMNS: &str = "id, board_id, title, description, status, priority, created_by, \
                            assigned_to, due_date, tags, position, created_at, updated_at, \
                            completed_at";

/// sqlx-backed Task repository
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn get_all(&self) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn create(&self, data: CreateTask, position: i32) -> DomainResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (board_id, title, description, priority, created_by,
                               assigned_to, due_date, tags, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.board_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.created_by)
        .bind(data.assigned_to)
        .bind(data.due_date)
        .bind(normalize_tags(data.tags))
        .bind(position)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(task)
    }

    async fn update(&self, task: Task) -> DomainResult<Task> {
        let updated = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                priority = $5,
                assigned_to = $6,
                due_date = $7,
                tags = $8,
                position = $9,
                completed_at = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.assigned_to)
        .bind(task.due_date)
        .bind(task.tags)
        .bind(task.position)
        .bind(task.completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        updated.ok_or_else(|| DomainError::not_found("task", task.id))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_by_board(&self, board_id: Uuid) -> DomainResult<Vec<Task>> {
        // Enum order matches column display order
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE board_id = $1
            ORDER BY status, position
            "#
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn list_bucket(&self, board_id: Uuid, status: TaskStatus) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE board_id = $1 AND status = $2
            ORDER BY position
            "#
        ))
        .bind(board_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn list_by_assignee(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE assigned_to = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn list_by_creator(&self, user_id: Uuid) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn list_by_priority(
        &self,
        board_id: Uuid,
        priority: TaskPriority,
    ) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE board_id = $1 AND priority = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(board_id)
        .bind(priority)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn list_by_tag(&self, board_id: Uuid, tag: &str) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE board_id = $1 AND $2 = ANY(tags)
            ORDER BY created_at DESC
            "#
        ))
        .bind(board_id)
        .bind(tag.to_lowercase())
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn list_due_between(
        &self,
        board_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE board_id = $1 AND due_date BETWEEN $2 AND $3
            ORDER BY due_date ASC
            "#
        ))
        .bind(board_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn search(&self, board_id: Uuid, query: &str) -> DomainResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE board_id = $1
              AND (title ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "#
        ))
        .bind(board_id)
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn update_positions(&self, updates: &[(Uuid, i32)]) -> DomainResult<()> {
        for (id, position) in updates {
            sqlx::query("UPDATE tasks SET position = $2 WHERE id = $1")
                .bind(id)
                .bind(position)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn delete_by_board(&self, board_id: Uuid) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE board_id = $1")
            .bind(board_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
