//! Event reviews.

use axum::extract::{Path, State};
use domain::models::review::CreateReviewRequest;
use domain::models::Review;
use persistence::db::{constraints, violates};
use persistence::repositories::{EventRepository, ReviewRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson, UserAuth};
use crate::response::{ApiResponse, Message};

const DUPLICATE_REVIEW: &str = "You have already reviewed this event";

/// POST /api/v1/reviews
pub async fn create_review(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> Result<ApiResponse<Review>, ApiError> {
    request.validate()?;
    let user_id = auth.resolve_subject(request.user_id)?;
    if !EventRepository::new(state.pool.clone())
        .exists(request.event_id)
        .await?
    {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    let reviews = ReviewRepository::new(state.pool.clone());
    if reviews
        .find_by_user_event(user_id, request.event_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate(DUPLICATE_REVIEW.to_string()));
    }

    let review = reviews
        .create(user_id, request.event_id, request.rating, request.message.trim())
        .await
        .map_err(|e| {
            if violates(&e, constraints::REVIEWS_USER_EVENT) {
                ApiError::Duplicate(DUPLICATE_REVIEW.to_string())
            } else {
                e.into()
            }
        })?;

    info!(review_id = %review.id, event_id = %review.event_id, rating = review.rating, "Review posted");
    Ok(ApiResponse::created(review.into()))
}

/// GET /api/v1/reviews/event/:event_id
pub async fn list_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Review>>, ApiError> {
    let reviews = ReviewRepository::new(state.pool.clone())
        .list_for_event(event_id)
        .await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

/// DELETE /api/v1/reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if !ReviewRepository::new(state.pool.clone()).delete(id).await? {
        return Err(ApiError::NotFound("Review not found".to_string()));
    }
    Ok(ApiResponse::ok(Message::new("Review deleted")))
}
