//! User account entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::UserRole;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_verified: bool,
    pub active: bool,
    pub push_tokens: Vec<String>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            mobile: entity.mobile,
            password_hash: entity.password_hash,
            // The column is CHECK-constrained to the three role names.
            role: UserRole::from_str(&entity.role).unwrap_or(UserRole::Student),
            date_of_birth: entity.date_of_birth,
            is_verified: entity.is_verified,
            active: entity.active,
            push_tokens: entity.push_tokens,
            password_changed_at: entity.password_changed_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// A user row joined with attendance counts.
#[derive(Debug, Clone, FromRow)]
pub struct UserParticipationEntity {
    #[sqlx(flatten)]
    pub user: UserEntity,
    pub attended: i64,
    pub total_events: i64,
}

impl From<UserParticipationEntity> for domain::models::UserParticipation {
    fn from(entity: UserParticipationEntity) -> Self {
        Self {
            participation: domain::services::participation(entity.attended, entity.total_events),
            user: entity.user.into(),
        }
    }
}
