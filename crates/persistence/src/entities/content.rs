//! Learning content entities (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TipEntity {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TipEntity> for domain::models::TipsAndTricks {
    fn from(entity: TipEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            body: entity.body,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct VideoLessonEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoLessonEntity> for domain::models::VideoLesson {
    fn from(entity: VideoLessonEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            link: entity.link,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
