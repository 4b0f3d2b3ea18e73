//! Image and video uploads.
//!
//! Each route takes a multipart form with a single `file` part and answers
//! with the stored filename, which other routes then reference.

use axum::extract::{Multipart, State};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::response::ApiResponse;
use crate::routes::events::multipart_error;
use crate::services::media::{MediaKind, StoredMedia};

async fn store_upload(
    state: &AppState,
    kind: MediaKind,
    mut multipart: Multipart,
) -> Result<StoredMedia, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        return state
            .media
            .store(kind, content_type.as_deref(), file_name.as_deref(), data)
            .await
            .map_err(|e| e.for_field("file"));
    }
    Err(ApiError::missing_field("file"))
}

/// POST /api/v1/media/images
pub async fn upload_image(
    State(state): State<AppState>,
    _auth: UserAuth,
    multipart: Multipart,
) -> Result<ApiResponse<StoredMedia>, ApiError> {
    let stored = store_upload(&state, MediaKind::Image, multipart).await?;
    Ok(ApiResponse::created(stored))
}

/// POST /api/v1/media/videos
pub async fn upload_video(
    State(state): State<AppState>,
    _auth: UserAuth,
    multipart: Multipart,
) -> Result<ApiResponse<StoredMedia>, ApiError> {
    let stored = store_upload(&state, MediaKind::Video, multipart).await?;
    Ok(ApiResponse::created(stored))
}
