//! Event review models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user's review of an event. One per (user, event).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub rating: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for posting a review.
///
/// `userId` defaults to the caller; only admins may name another user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: Option<Uuid>,

    pub event_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 1000, message = "Message must be 1-1000 characters"))]
    pub message: String,
}
