//! Payment entities (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct EventPaymentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub payment_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventPaymentEntity> for domain::models::EventPayment {
    fn from(entity: EventPaymentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            payment_id: entity.payment_id,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MemberFeeEntity {
    pub id: Uuid,
    pub title: String,
    pub amount: i64,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberFeeEntity> for domain::models::MemberFee {
    fn from(entity: MemberFeeEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            amount: entity.amount,
            description: entity.description,
            active: entity.active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MemberPaymentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub member_fees_id: Uuid,
    pub payment_id: String,
    pub expire_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberPaymentEntity> for domain::models::MemberPayment {
    fn from(entity: MemberPaymentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            member_fees_id: entity.member_fees_id,
            payment_id: entity.payment_id,
            expire_date: entity.expire_date,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
