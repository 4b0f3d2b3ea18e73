//! Push notification broadcast.

use axum::extract::State;
use domain::services::{BroadcastSummary, PushMessage};
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::response::ApiResponse;
use crate::services::NotificationService;

#[derive(Debug, Deserialize, Validate)]
pub struct BroadcastRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 1000, message = "Body must be 1-1000 characters"))]
    pub body: String,

    #[serde(default)]
    pub data: HashMap<String, String>,
}

/// POST /api/v1/notifications/broadcast
///
/// Tokens the provider reports as not registered are pruned.
pub async fn broadcast(
    State(state): State<AppState>,
    _admin: AdminAuth,
    ApiJson(request): ApiJson<BroadcastRequest>,
) -> Result<ApiResponse<BroadcastSummary>, ApiError> {
    request.validate()?;
    let message = PushMessage {
        title: request.title.trim().to_string(),
        body: request.body.trim().to_string(),
        data: request.data,
    };
    let summary = NotificationService::new(state.pool.clone(), state.push.clone())
        .broadcast(&message)
        .await?;
    Ok(ApiResponse::ok(summary))
}
