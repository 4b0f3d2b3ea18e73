//! User account routes.

use axum::extract::{Path, State};
use domain::models::user::{RegisterPushTokenRequest, UpdateUserRequest};
use domain::models::{Participation, User, UserParticipation};
use persistence::repositories::UserRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson, UserAuth};
use crate::response::{ApiResponse, Message};
use crate::services::auth::map_unique_violation;
use crate::services::ReconciliationService;

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// GET /api/v1/users
///
/// Every non-admin user with attendance, computed in a single query.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<ApiResponse<Vec<UserParticipation>>, ApiError> {
    let users = ReconciliationService::new(state.pool.clone())
        .aggregate_user_participation()
        .await?;
    Ok(ApiResponse::ok(users))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<User>, ApiError> {
    auth.ensure_self_or_admin(id)?;
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(ApiResponse::ok(user.into()))
}

/// PUT /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    auth.ensure_self_or_admin(id)?;
    request.validate()?;
    if request.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let user = UserRepository::new(state.pool.clone())
        .update_profile(
            id,
            request.name.as_deref().map(str::trim),
            request.email.as_deref().map(str::trim),
            request.mobile.as_deref(),
        )
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(user_not_found)?;

    info!(user_id = %id, "User profile updated");
    Ok(ApiResponse::ok(user.into()))
}

/// DELETE /api/v1/users/:id
///
/// Soft delete: the account is deactivated and disappears from every read.
pub async fn delete_user(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if admin.user_id() == id {
        return Err(ApiError::bad_request("Admins cannot delete their own account"));
    }
    if !UserRepository::new(state.pool.clone()).soft_delete(id).await? {
        return Err(user_not_found());
    }
    info!(user_id = %id, "User deactivated");
    Ok(ApiResponse::ok(Message::new("User deleted")))
}

/// GET /api/v1/users/:id/participation
pub async fn get_participation(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Participation>, ApiError> {
    auth.ensure_self_or_admin(id)?;
    let participation = ReconciliationService::new(state.pool.clone())
        .compute_participation(id)
        .await?;
    Ok(ApiResponse::ok(participation))
}

/// POST /api/v1/users/me/push-tokens
pub async fn register_push_token(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<RegisterPushTokenRequest>,
) -> Result<ApiResponse<Message>, ApiError> {
    request.validate()?;
    let stored = UserRepository::new(state.pool.clone())
        .add_push_token(auth.user_id(), request.token.trim())
        .await?;
    if !stored {
        return Err(user_not_found());
    }
    Ok(ApiResponse::ok(Message::new("Push token registered")))
}
