//! Review repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ReviewEntity;
use crate::metrics::timed;

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<ReviewEntity>, sqlx::Error> {
        timed(
            "find_review_by_user_event",
            sqlx::query_as::<_, ReviewEntity>(
                r#"
                SELECT id, user_id, event_id, rating, message, created_at
                FROM reviews
                WHERE user_id = $1 AND event_id = $2
                "#,
            )
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        rating: i32,
        message: &str,
    ) -> Result<ReviewEntity, sqlx::Error> {
        timed(
            "create_review",
            sqlx::query_as::<_, ReviewEntity>(
                r#"
                INSERT INTO reviews (user_id, event_id, rating, message)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, event_id, rating, message, created_at
                "#,
            )
            .bind(user_id)
            .bind(event_id)
            .bind(rating)
            .bind(message)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<ReviewEntity>, sqlx::Error> {
        timed(
            "list_reviews_for_event",
            sqlx::query_as::<_, ReviewEntity>(
                r#"
                SELECT id, user_id, event_id, rating, message, created_at
                FROM reviews
                WHERE event_id = $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(event_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_review",
            sqlx::query("DELETE FROM reviews WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
