//! Learning content: tips and video lessons.

use axum::extract::{Path, State};
use domain::models::content::{CreateTipRequest, CreateVideoLessonRequest};
use domain::models::{TipsAndTricks, VideoLesson};
use persistence::repositories::ContentRepository;
use shared::validation::is_allowed_video_link;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::response::{ApiResponse, Message};

/// POST /api/v1/tips
pub async fn create_tip(
    State(state): State<AppState>,
    _admin: AdminAuth,
    ApiJson(request): ApiJson<CreateTipRequest>,
) -> Result<ApiResponse<TipsAndTricks>, ApiError> {
    request.validate()?;
    let tip = ContentRepository::new(state.pool.clone())
        .create_tip(request.title.trim(), request.body.trim())
        .await?;
    Ok(ApiResponse::created(tip.into()))
}

/// GET /api/v1/tips
pub async fn list_tips(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<TipsAndTricks>>, ApiError> {
    let tips = ContentRepository::new(state.pool.clone()).list_tips().await?;
    Ok(ApiResponse::ok(tips.into_iter().map(Into::into).collect()))
}

/// DELETE /api/v1/tips/:id
pub async fn delete_tip(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if !ContentRepository::new(state.pool.clone())
        .delete_tip(id)
        .await?
    {
        return Err(ApiError::NotFound("Tip not found".to_string()));
    }
    Ok(ApiResponse::ok(Message::new("Tip deleted")))
}

/// POST /api/v1/video-lessons
pub async fn create_video_lesson(
    State(state): State<AppState>,
    _admin: AdminAuth,
    ApiJson(request): ApiJson<CreateVideoLessonRequest>,
) -> Result<ApiResponse<VideoLesson>, ApiError> {
    request.validate()?;
    let link = request.link.trim();
    if !is_allowed_video_link(link, &state.config.content.video_hosts) {
        return Err(ApiError::field(
            "link",
            "Video link must point to an allowed video host",
        ));
    }
    let lesson = ContentRepository::new(state.pool.clone())
        .create_video_lesson(
            request.title.trim(),
            request.description.as_deref().map(str::trim),
            link,
        )
        .await?;
    Ok(ApiResponse::created(lesson.into()))
}

/// GET /api/v1/video-lessons
pub async fn list_video_lessons(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<VideoLesson>>, ApiError> {
    let lessons = ContentRepository::new(state.pool.clone())
        .list_video_lessons()
        .await?;
    Ok(ApiResponse::ok(lessons.into_iter().map(Into::into).collect()))
}

/// DELETE /api/v1/video-lessons/:id
pub async fn delete_video_lesson(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if !ContentRepository::new(state.pool.clone())
        .delete_video_lesson(id)
        .await?
    {
        return Err(ApiError::NotFound("Video lesson not found".to_string()));
    }
    Ok(ApiResponse::ok(Message::new("Video lesson deleted")))
}
