//! Event guest registration.

use axum::extract::{Path, State};
use domain::models::guest::CreateGuestRequest;
use domain::models::Guest;
use persistence::db::{constraints, violates};
use persistence::repositories::{EventRepository, GuestRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::response::{ApiResponse, Message};

const DUPLICATE_GUEST: &str = "Guest with this email already exists for this event";

/// POST /api/v1/guests
///
/// Public. One registration per email per event.
pub async fn create_guest(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateGuestRequest>,
) -> Result<ApiResponse<Guest>, ApiError> {
    request.validate()?;
    if !EventRepository::new(state.pool.clone())
        .exists(request.event_id)
        .await?
    {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    let guests = GuestRepository::new(state.pool.clone());
    let email = request.email.trim();
    if guests
        .find_by_email_event(email, request.event_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate(DUPLICATE_GUEST.to_string()));
    }

    let guest = guests
        .create(request.event_id, request.name.trim(), email, &request.mobile)
        .await
        .map_err(|e| {
            if violates(&e, constraints::GUESTS_EMAIL_EVENT) {
                ApiError::Duplicate(DUPLICATE_GUEST.to_string())
            } else {
                e.into()
            }
        })?;

    info!(guest_id = %guest.id, event_id = %guest.event_id, "Guest registered");
    Ok(ApiResponse::created(guest.into()))
}

/// GET /api/v1/guests/event/:event_id
pub async fn list_for_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(event_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Guest>>, ApiError> {
    let guests = GuestRepository::new(state.pool.clone())
        .list_for_event(event_id)
        .await?;
    Ok(ApiResponse::ok(guests.into_iter().map(Into::into).collect()))
}

/// DELETE /api/v1/guests/:id
pub async fn delete_guest(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if !GuestRepository::new(state.pool.clone()).delete(id).await? {
        return Err(ApiError::NotFound("Guest not found".to_string()));
    }
    Ok(ApiResponse::ok(Message::new("Guest deleted")))
}
