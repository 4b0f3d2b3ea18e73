//! Membership payment routes.

use axum::extract::{Path, State};
use domain::models::payment::CreateMemberPaymentRequest;
use domain::models::{MemberPayment, MembershipStatus};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, UserAuth};
use crate::response::ApiResponse;
use crate::services::ReconciliationService;

/// POST /api/v1/member-payments
///
/// `userId`, `memberFeesId` and `paymentId` are all required. The expiry is
/// stamped by the server.
pub async fn create_member_payment(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<CreateMemberPaymentRequest>,
) -> Result<ApiResponse<MemberPayment>, ApiError> {
    if let Some(user_id) = request.user_id {
        auth.ensure_self_or_admin(user_id)?;
    }
    let payment = ReconciliationService::new(state.pool.clone())
        .create_member_payment(&request)
        .await?;
    Ok(ApiResponse::created(payment))
}

/// GET /api/v1/member-payments/user/:user_id
pub async fn list_for_user(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<MemberPayment>>, ApiError> {
    auth.ensure_self_or_admin(user_id)?;
    let payments = ReconciliationService::new(state.pool.clone())
        .list_member_payments_for_user(user_id)
        .await?;
    Ok(ApiResponse::ok(payments))
}

/// GET /api/v1/member-payments/check-membership/:user_id
pub async fn check_membership(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<MembershipStatus>, ApiError> {
    auth.ensure_self_or_admin(user_id)?;
    let status = ReconciliationService::new(state.pool.clone())
        .check_membership_status(user_id)
        .await?;
    Ok(ApiResponse::ok(status))
}
