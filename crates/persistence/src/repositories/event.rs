//! Event repository for database operations.

use domain::models::{NewEvent, NewEventDetails};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventDetailsEntity, EventEntity, EventWithDetailsEntity};
use crate::metrics::{timed, QueryTimer};

const EVENT_COLUMNS: &str = "id, name, max_seats, is_start_up_vapi_event, created_at, updated_at";

const DETAILS_COLUMNS: &str = "id, event_id, banner, date, time, location, description, \
    video_links, prize, last_date, created_at, updated_at";

const JOINED_SELECT: &str = r#"
    SELECT e.id, e.name, e.max_seats, e.is_start_up_vapi_event, e.created_at, e.updated_at,
           d.id AS d_id, d.banner AS d_banner, d.date AS d_date, d.time AS d_time,
           d.location AS d_location, d.description AS d_description,
           d.video_links AS d_video_links, d.prize AS d_prize, d.last_date AS d_last_date,
           d.created_at AS d_created_at, d.updated_at AS d_updated_at
    FROM events e
    LEFT JOIN event_details d ON d.event_id = e.id
"#;

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an event and its details atomically.
    pub async fn create(
        &self,
        event: &NewEvent,
    ) -> Result<(EventEntity, EventDetailsEntity), sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO events (name, max_seats, is_start_up_vapi_event) \
             VALUES ($1, $2, $3) RETURNING {EVENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, EventEntity>(&sql)
            .bind(&event.name)
            .bind(event.max_seats)
            .bind(event.is_start_up_vapi_event)
            .fetch_one(&mut *tx)
            .await?;

        let details = event.details.clone();
        let sql = format!(
            r#"
            INSERT INTO event_details
                (event_id, banner, date, time, location, description, video_links, prize, last_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DETAILS_COLUMNS}
            "#
        );
        let details = sqlx::query_as::<_, EventDetailsEntity>(&sql)
            .bind(created.id)
            .bind(details.banner)
            .bind(details.date)
            .bind(details.time)
            .bind(details.location)
            .bind(details.description)
            .bind(details.video_links)
            .bind(details.prize)
            .bind(details.last_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok((created, details))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventWithDetailsEntity>, sqlx::Error> {
        let sql = format!("{JOINED_SELECT} WHERE e.id = $1");
        timed(
            "find_event_by_id",
            sqlx::query_as::<_, EventWithDetailsEntity>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// All events, soonest first; events without details sort last.
    pub async fn list(&self) -> Result<Vec<EventWithDetailsEntity>, sqlx::Error> {
        let sql = format!("{JOINED_SELECT} ORDER BY d.date ASC NULLS LAST, e.created_at DESC");
        timed(
            "list_events",
            sqlx::query_as::<_, EventWithDetailsEntity>(&sql).fetch_all(&self.pool),
        )
        .await
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        timed(
            "event_exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        timed(
            "count_events",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events").fetch_one(&self.pool),
        )
        .await
    }

    /// Partial update of the event record; `None` keeps the stored value.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        max_seats: Option<i32>,
        is_start_up_vapi_event: Option<bool>,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                max_seats = COALESCE($3, max_seats),
                is_start_up_vapi_event = COALESCE($4, is_start_up_vapi_event),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        timed(
            "update_event",
            sqlx::query_as::<_, EventEntity>(&sql)
                .bind(id)
                .bind(name)
                .bind(max_seats)
                .bind(is_start_up_vapi_event)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn find_details(
        &self,
        event_id: Uuid,
    ) -> Result<Option<EventDetailsEntity>, sqlx::Error> {
        let sql = format!("SELECT {DETAILS_COLUMNS} FROM event_details WHERE event_id = $1");
        timed(
            "find_event_details",
            sqlx::query_as::<_, EventDetailsEntity>(&sql)
                .bind(event_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Replaces the details of an event with an already merged and validated set.
    pub async fn replace_details(
        &self,
        event_id: Uuid,
        details: &NewEventDetails,
    ) -> Result<Option<EventDetailsEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE event_details
            SET banner = $2, date = $3, time = $4, location = $5, description = $6,
                video_links = $7, prize = $8, last_date = $9, updated_at = NOW()
            WHERE event_id = $1
            RETURNING {DETAILS_COLUMNS}
            "#
        );
        timed(
            "replace_event_details",
            sqlx::query_as::<_, EventDetailsEntity>(&sql)
                .bind(event_id)
                .bind(&details.banner)
                .bind(details.date)
                .bind(&details.time)
                .bind(&details.location)
                .bind(&details.description)
                .bind(&details.video_links)
                .bind(&details.prize)
                .bind(details.last_date)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Hard delete. Details go with the event; payments, guests and reviews stay.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_event",
            sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
