/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create a task (board members only)
/// - `GET /v1/tasks/mine?role=` - Tasks assigned to / created by the caller
/// - `GET /v1/tasks/:id` - Fetch one task (board members only)
/// - `PUT /v1/tasks/:id` - Update fields (creator/assignee, Done-locked)
/// - `DELETE /v1/tasks/:id` - Delete (creator only, Done-locked)
/// - `POST /v1/tasks/:id/status` - Change status (appends to target column)
/// - `POST /v1/tasks/:id/move` - Drag-and-drop move to column + index

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use kanflow_shared::auth::middleware::AuthContext;
use kanflow_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};

use crate::{
    app::AppState,
    error::{map_validation_errors, ApiResult},
};

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Board to create the task on
    pub board_id: Uuid,

    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (defaults to medium)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Optional assignee; must be a board member
    pub assigned_to: Option<Uuid>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Labels; normalized server-side
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Task field update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// Clear the description
    #[serde(default)]
    pub clear_description: bool,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New assignee
    pub assigned_to: Option<Uuid>,

    /// Unassign the task
    #[serde(default)]
    pub unassign: bool,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// Clear the due date
    #[serde(default)]
    pub clear_due_date: bool,

    /// Replacement tag list
    pub tags: Option<Vec<String>>,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// Target status column
    pub status: TaskStatus,
}

/// Drag-and-drop move request
#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    /// Target status column
    pub status: TaskStatus,

    /// Target index within the column; past-the-end appends
    pub index: usize,
}

/// "My tasks" listing query
#[derive(Debug, Default, Deserialize)]
pub struct MyTasksQuery {
    /// Which relation to list by (default: assigned)
    #[serde(default)]
    pub role: TaskRole,
}

/// Relation selector for the "my tasks" listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskRole {
    /// Tasks assigned to the caller
    #[default]
    Assigned,

    /// Tasks created by the caller
    Created,
}

/// Creates a task on a board the caller belongs to
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(map_validation_errors)?;

    let task = state
        .tasks
        .create(CreateTask {
            board_id: req.board_id,
            title: req.title,
            description: req.description,
            priority: req.priority,
            created_by: auth.user_id,
            assigned_to: req.assigned_to,
            due_date: req.due_date,
            tags: req.tags,
        })
        .await?;

    Ok(Json(task))
}

/// Lists tasks assigned to or created by the caller
pub async fn list_my_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<MyTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = match query.role {
        TaskRole::Assigned => state.tasks.list_assigned(auth.user_id).await?,
        TaskRole::Created => state.tasks.list_created(auth.user_id).await?,
    };

    Ok(Json(tasks))
}

/// Fetches one task (board members only)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.get(auth.user_id, id).await?;
    Ok(Json(task))
}

/// Updates task fields (creator or assignee; rejected while the task is done)
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(map_validation_errors)?;

    let description = if req.clear_description {
        Some(None)
    } else {
        req.description.map(Some)
    };
    let assigned_to = if req.unassign {
        Some(None)
    } else {
        req.assigned_to.map(Some)
    };
    let due_date = if req.clear_due_date {
        Some(None)
    } else {
        req.due_date.map(Some)
    };

    let task = state
        .tasks
        .update(
            auth.user_id,
            id,
            UpdateTask {
                title: req.title,
                description,
                priority: req.priority,
                assigned_to,
                due_date,
                tags: req.tags,
            },
        )
        .await?;

    Ok(Json(task))
}

/// Deletes a task (creator only; rejected while the task is done)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.tasks.delete(auth.user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Changes a task's status; the task lands at the end of the target column
pub async fn change_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.change_status(auth.user_id, id, req.status).await?;
    Ok(Json(task))
}

/// Moves a task to a column and index (drag-and-drop)
pub async fn move_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = state
        .tasks
        .move_task(auth.user_id, id, req.status, req.index)
        .await?;
    Ok(Json(task))
}
