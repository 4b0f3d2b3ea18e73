//! Guest entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct GuestEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

impl From<GuestEntity> for domain::models::Guest {
    fn from(entity: GuestEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            name: entity.name,
            email: entity.email,
            mobile: entity.mobile,
            created_at: entity.created_at,
        }
    }
}
