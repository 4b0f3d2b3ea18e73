//! Review entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ReviewEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub rating: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewEntity> for domain::models::Review {
    fn from(entity: ReviewEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            rating: entity.rating,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}
