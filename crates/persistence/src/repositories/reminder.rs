//! Reminder repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ReminderEntity;
use crate::metrics::timed;

#[derive(Clone)]
pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        remind_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<ReminderEntity, sqlx::Error> {
        timed(
            "create_reminder",
            sqlx::query_as::<_, ReminderEntity>(
                r#"
                INSERT INTO reminders (user_id, event_id, remind_at, note)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, event_id, remind_at, note, created_at
                "#,
            )
            .bind(user_id)
            .bind(event_id)
            .bind(remind_at)
            .bind(note)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ReminderEntity>, sqlx::Error> {
        timed(
            "list_reminders_for_user",
            sqlx::query_as::<_, ReminderEntity>(
                r#"
                SELECT id, user_id, event_id, remind_at, note, created_at
                FROM reminders
                WHERE user_id = $1
                ORDER BY remind_at ASC
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    /// Deletes a reminder only if `user_id` owns it.
    pub async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_reminder",
            sqlx::query("DELETE FROM reminders WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
