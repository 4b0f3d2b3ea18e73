//! OTP entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct OtpEntity {
    pub id: Uuid,
    pub mobile: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<OtpEntity> for domain::models::OtpRecord {
    fn from(entity: OtpEntity) -> Self {
        Self {
            id: entity.id,
            mobile: entity.mobile,
            code_hash: entity.code_hash,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}
