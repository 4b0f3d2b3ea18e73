//! Reminder entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ReminderEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub remind_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReminderEntity> for domain::models::Reminder {
    fn from(entity: ReminderEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            remind_at: entity.remind_at,
            note: entity.note,
            created_at: entity.created_at,
        }
    }
}
