//! Personal event reminders.

use axum::extract::{Path, State};
use domain::models::reminder::CreateReminderRequest;
use domain::models::Reminder;
use persistence::repositories::{EventRepository, ReminderRepository};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, UserAuth};
use crate::response::{ApiResponse, Message};

/// POST /api/v1/reminders
pub async fn create_reminder(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<CreateReminderRequest>,
) -> Result<ApiResponse<Reminder>, ApiError> {
    request.validate()?;
    if !EventRepository::new(state.pool.clone())
        .exists(request.event_id)
        .await?
    {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }
    let reminder = ReminderRepository::new(state.pool.clone())
        .create(
            auth.user_id(),
            request.event_id,
            request.remind_at,
            request.note.as_deref().map(str::trim),
        )
        .await?;
    Ok(ApiResponse::created(reminder.into()))
}

/// GET /api/v1/reminders
pub async fn list_reminders(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<ApiResponse<Vec<Reminder>>, ApiError> {
    let reminders = ReminderRepository::new(state.pool.clone())
        .list_for_user(auth.user_id())
        .await?;
    Ok(ApiResponse::ok(reminders.into_iter().map(Into::into).collect()))
}

/// DELETE /api/v1/reminders/:id
///
/// Someone else's reminder reads as not found.
pub async fn delete_reminder(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if !ReminderRepository::new(state.pool.clone())
        .delete_owned(id, auth.user_id())
        .await?
    {
        return Err(ApiError::NotFound("Reminder not found".to_string()));
    }
    Ok(ApiResponse::ok(Message::new("Reminder deleted")))
}
