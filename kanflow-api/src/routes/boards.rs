/// Board endpoints
///
/// # Endpoints
///
/// - `POST /v1/boards` - Create a board (creator becomes owner)
/// - `GET /v1/boards` - Accessible boards, optional `?q=` search
/// - `GET /v1/boards/:id` - Fetch one board (members only)
/// - `PUT /v1/boards/:id` - Update fields (owner only)
/// - `DELETE /v1/boards/:id` - Deactivate, cascading task deletion (owner only)
/// - `POST /v1/boards/:id/members` - Add a member (owner only)
/// - `DELETE /v1/boards/:id/members/:user_id` - Remove a member (owner only)
/// - `POST /v1/boards/:id/transfer` - Transfer ownership (owner only)
/// - `GET /v1/boards/:id/tasks` - Task listing with optional single filter

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use kanflow_shared::auth::middleware::AuthContext;
use kanflow_shared::models::board::{Board, CreateBoard, UpdateBoard};
use kanflow_shared::models::task::{Task, TaskPriority, TaskStatus};
use kanflow_shared::services::TaskFilter;

use crate::{
    app::AppState,
    error::{map_validation_errors, ApiResult},
};

/// Board creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Board name
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional display color (hex string)
    #[validate(length(max = 16, message = "Color must be at most 16 characters"))]
    pub color: Option<String>,
}

/// Board update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    /// New name
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// Clear the description
    #[serde(default)]
    pub clear_description: bool,

    /// New display color
    #[validate(length(max = 16, message = "Color must be at most 16 characters"))]
    pub color: Option<String>,
}

/// Member addition request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,
}

/// Ownership transfer request
#[derive(Debug, Deserialize)]
pub struct TransferOwnershipRequest {
    /// Member to promote to owner
    pub new_owner: Uuid,
}

/// Board listing query
#[derive(Debug, Default, Deserialize)]
pub struct ListBoardsQuery {
    /// Optional free-text search over name/description
    pub q: Option<String>,
}

/// Task listing query (single filter; first present field wins)
#[derive(Debug, Default, Deserialize)]
pub struct ListBoardTasksQuery {
    /// Free-text search over title/description
    pub q: Option<String>,

    /// Filter by status column
    pub status: Option<TaskStatus>,

    /// Filter by priority
    pub priority: Option<TaskPriority>,

    /// Filter by tag
    pub tag: Option<String>,

    /// Due-window start
    pub due_from: Option<chrono::DateTime<chrono::Utc>>,

    /// Due-window end
    pub due_until: Option<chrono::DateTime<chrono::Utc>>,
}

/// Creates a board; the authenticated user becomes owner and sole member
pub async fn create_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<Json<Board>> {
    req.validate().map_err(map_validation_errors)?;

    let board = state
        .boards
        .create(CreateBoard {
            name: req.name,
            description: req.description,
            color: req.color,
            owner_id: auth.user_id,
        })
        .await?;

    Ok(Json(board))
}

/// Lists the authenticated user's accessible boards
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListBoardsQuery>,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = match query.q {
        Some(ref q) => state.boards.search(auth.user_id, q).await?,
        None => state.boards.list_accessible(auth.user_id).await?,
    };

    Ok(Json(boards))
}

/// Fetches one board (members only)
pub async fn get_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Board>> {
    let board = state.boards.get(auth.user_id, id).await?;
    Ok(Json(board))
}

/// Updates board fields (owner only)
pub async fn update_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBoardRequest>,
) -> ApiResult<Json<Board>> {
    req.validate().map_err(map_validation_errors)?;

    let description = if req.clear_description {
        Some(None)
    } else {
        req.description.map(Some)
    };

    let board = state
        .boards
        .update(
            auth.user_id,
            id,
            UpdateBoard {
                name: req.name,
                description,
                color: req.color,
            },
        )
        .await?;

    Ok(Json(board))
}

/// Deactivates a board and deletes its tasks (owner only)
pub async fn deactivate_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Board>> {
    let board = state.boards.deactivate(auth.user_id, id).await?;
    Ok(Json(board))
}

/// Adds a member to a board (owner only)
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<Board>> {
    let board = state.boards.add_member(auth.user_id, id, req.user_id).await?;
    Ok(Json(board))
}

/// Removes a member from a board (owner only; the owner cannot be removed)
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Board>> {
    let board = state.boards.remove_member(auth.user_id, id, user_id).await?;
    Ok(Json(board))
}

/// Transfers board ownership to an existing member (owner only)
pub async fn transfer_ownership(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransferOwnershipRequest>,
) -> ApiResult<Json<Board>> {
    let board = state
        .boards
        .transfer_ownership(auth.user_id, id, req.new_owner)
        .await?;
    Ok(Json(board))
}

/// Lists a board's tasks, optionally filtered (members only)
pub async fn list_board_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListBoardTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = TaskFilter {
        text: query.q,
        status: query.status,
        priority: query.priority,
        tag: query.tag,
        due_from: query.due_from,
        due_until: query.due_until,
    };

    let tasks = if filter.is_empty() {
        state.tasks.list_by_board(auth.user_id, id).await?
    } else {
        state
            .tasks
            .list_by_board_filtered(auth.user_id, id, filter)
            .await?
    };

    Ok(Json(tasks))
}
