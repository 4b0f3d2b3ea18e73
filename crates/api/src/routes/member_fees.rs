//! Membership fee plans.

use axum::extract::{Path, State};
use domain::models::payment::CreateMemberFeeRequest;
use domain::models::MemberFee;
use persistence::repositories::MemberFeeRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::response::{ApiResponse, Message};

/// POST /api/v1/member-fees
pub async fn create_member_fee(
    State(state): State<AppState>,
    _admin: AdminAuth,
    ApiJson(request): ApiJson<CreateMemberFeeRequest>,
) -> Result<ApiResponse<MemberFee>, ApiError> {
    request.validate()?;
    let fee = MemberFeeRepository::new(state.pool.clone())
        .create(
            request.title.trim(),
            request.amount,
            request.description.as_deref().map(str::trim),
        )
        .await?;
    info!(fee_id = %fee.id, amount = fee.amount, "Member fee created");
    Ok(ApiResponse::created(fee.into()))
}

/// GET /api/v1/member-fees
pub async fn list_member_fees(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<MemberFee>>, ApiError> {
    let fees = MemberFeeRepository::new(state.pool.clone())
        .list_active()
        .await?;
    Ok(ApiResponse::ok(fees.into_iter().map(Into::into).collect()))
}

/// DELETE /api/v1/member-fees/:id
pub async fn delete_member_fee(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if !MemberFeeRepository::new(state.pool.clone()).delete(id).await? {
        return Err(ApiError::NotFound("Membership fee not found".to_string()));
    }
    Ok(ApiResponse::ok(Message::new("Membership fee deleted")))
}
