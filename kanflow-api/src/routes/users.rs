/// User endpoints
///
/// # Endpoints
///
/// - `GET /v1/users?q=` - Search users (for member pickers)
/// - `GET /v1/users/me` - Current account
/// - `PUT /v1/users/me` - Update profile
/// - `DELETE /v1/users/me` - Deactivate account (soft delete)

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use kanflow_shared::auth::{middleware::AuthContext, password};
use kanflow_shared::models::user::{UpdateUser, User};

use crate::{
    app::AppState,
    error::{map_validation_errors, ApiError, ApiResult, ValidationErrorDetail},
};

/// User search query
#[derive(Debug, Deserialize)]
pub struct SearchUsersQuery {
    /// Free-text match over username, email, and full name
    pub q: String,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New display name (null clears it)
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub full_name: Option<String>,

    /// Clear the display name
    #[serde(default)]
    pub clear_full_name: bool,

    /// New password (validated for strength before hashing)
    pub password: Option<String>,
}

/// Searches users by username, email, or full name
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchUsersQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.users.search(&query.q).await?;
    Ok(Json(users))
}

/// Returns the authenticated user's account
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = state.users.get(auth.user_id).await?;
    Ok(Json(user))
}

/// Updates the authenticated user's profile
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateMeRequest>,
) -> ApiResult<Json<User>> {
    req.validate().map_err(map_validation_errors)?;

    let password_hash = match req.password {
        Some(ref new_password) => {
            password::validate_password_strength(new_password).map_err(|e| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: e,
                }])
            })?;
            Some(password::hash_password(new_password)?)
        }
        None => None,
    };

    let full_name = if req.clear_full_name {
        Some(None)
    } else {
        req.full_name.map(Some)
    };

    let user = state
        .users
        .update_profile(
            auth.user_id,
            UpdateUser {
                email: req.email,
                password_hash,
                full_name,
            },
        )
        .await?;

    Ok(Json(user))
}

/// Deactivates the authenticated user's account (soft delete)
///
/// Board memberships and historical tasks remain; only authentication is
/// blocked from here on.
pub async fn deactivate_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = state.users.deactivate(auth.user_id).await?;
    Ok(Json(user))
}
