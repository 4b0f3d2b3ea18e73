//! Event entities (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub name: String,
    pub max_seats: i32,
    pub is_start_up_vapi_event: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            max_seats: entity.max_seats,
            is_start_up_vapi_event: entity.is_start_up_vapi_event,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the event_details table.
#[derive(Debug, Clone, FromRow)]
pub struct EventDetailsEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub banner: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub description: String,
    pub video_links: Vec<String>,
    pub prize: Option<String>,
    pub last_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventDetailsEntity> for domain::models::EventDetails {
    fn from(entity: EventDetailsEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            banner: entity.banner,
            date: entity.date,
            time: entity.time,
            location: entity.location,
            description: entity.description,
            video_links: entity.video_links,
            prize: entity.prize,
            last_date: entity.last_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Event left-joined with its details. Detail columns are prefixed `d_`.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithDetailsEntity {
    #[sqlx(flatten)]
    pub event: EventEntity,
    pub d_id: Option<Uuid>,
    pub d_banner: Option<String>,
    pub d_date: Option<NaiveDate>,
    pub d_time: Option<String>,
    pub d_location: Option<String>,
    pub d_description: Option<String>,
    pub d_video_links: Option<Vec<String>>,
    pub d_prize: Option<String>,
    pub d_last_date: Option<NaiveDate>,
    pub d_created_at: Option<DateTime<Utc>>,
    pub d_updated_at: Option<DateTime<Utc>>,
}

impl From<EventWithDetailsEntity> for domain::models::EventWithDetails {
    fn from(entity: EventWithDetailsEntity) -> Self {
        let details = match (
            entity.d_id,
            entity.d_date,
            entity.d_last_date,
            entity.d_created_at,
            entity.d_updated_at,
        ) {
            (Some(id), Some(date), Some(last_date), Some(created_at), Some(updated_at)) => {
                Some(domain::models::EventDetails {
                    id,
                    event_id: entity.event.id,
                    banner: entity.d_banner.unwrap_or_default(),
                    date,
                    time: entity.d_time.unwrap_or_default(),
                    location: entity.d_location.unwrap_or_default(),
                    description: entity.d_description.unwrap_or_default(),
                    video_links: entity.d_video_links.unwrap_or_default(),
                    prize: entity.d_prize,
                    last_date,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        Self {
            event: entity.event.into(),
            details,
        }
    }
}
