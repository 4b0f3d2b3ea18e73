//! Event payment routes.

use axum::extract::{Path, State};
use domain::models::payment::CreateEventPaymentRequest;
use domain::models::EventPayment;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson, UserAuth};
use crate::response::ApiResponse;
use crate::services::ReconciliationService;

/// POST /api/v1/event-payments
///
/// Records the caller's payment for an event. Admins may record one on
/// behalf of another user.
pub async fn create_event_payment(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<CreateEventPaymentRequest>,
) -> Result<ApiResponse<EventPayment>, ApiError> {
    request.validate()?;
    let user_id = auth.resolve_subject(request.user_id)?;
    let payment = ReconciliationService::new(state.pool.clone())
        .create_event_payment(user_id, request.event_id, &request.payment_id)
        .await?;
    Ok(ApiResponse::created(payment))
}

/// GET /api/v1/event-payments/user/:user_id
pub async fn list_for_user(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<EventPayment>>, ApiError> {
    auth.ensure_self_or_admin(user_id)?;
    let payments = ReconciliationService::new(state.pool.clone())
        .list_event_payments_for_user(user_id)
        .await?;
    Ok(ApiResponse::ok(payments))
}

/// GET /api/v1/event-payments/event/:event_id
pub async fn list_for_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(event_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<EventPayment>>, ApiError> {
    let payments = ReconciliationService::new(state.pool.clone())
        .list_event_payments_for_event(event_id)
        .await?;
    Ok(ApiResponse::ok(payments))
}

/// POST /api/v1/event-payments/:id/revoke
pub async fn revoke(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<EventPayment>, ApiError> {
    let payment = ReconciliationService::new(state.pool.clone())
        .revoke_event_payment(id)
        .await?;
    Ok(ApiResponse::ok(payment))
}
