//! Guest repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GuestEntity;
use crate::metrics::timed;

#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email_event(
        &self,
        email: &str,
        event_id: Uuid,
    ) -> Result<Option<GuestEntity>, sqlx::Error> {
        timed(
            "find_guest_by_email_event",
            sqlx::query_as::<_, GuestEntity>(
                r#"
                SELECT id, event_id, name, email, mobile, created_at
                FROM guests
                WHERE lower(email) = lower($1) AND event_id = $2
                "#,
            )
            .bind(email)
            .bind(event_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn create(
        &self,
        event_id: Uuid,
        name: &str,
        email: &str,
        mobile: &str,
    ) -> Result<GuestEntity, sqlx::Error> {
        timed(
            "create_guest",
            sqlx::query_as::<_, GuestEntity>(
                r#"
                INSERT INTO guests (event_id, name, email, mobile)
                VALUES ($1, $2, $3, $4)
                RETURNING id, event_id, name, email, mobile, created_at
                "#,
            )
            .bind(event_id)
            .bind(name)
            .bind(email)
            .bind(mobile)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<GuestEntity>, sqlx::Error> {
        timed(
            "list_guests_for_event",
            sqlx::query_as::<_, GuestEntity>(
                r#"
                SELECT id, event_id, name, email, mobile, created_at
                FROM guests
                WHERE event_id = $1
                ORDER BY created_at ASC
                "#,
            )
            .bind(event_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_guest",
            sqlx::query("DELETE FROM guests WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
