//! Tips and video lesson repositories.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TipEntity, VideoLessonEntity};
use crate::metrics::timed;

#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_tip(&self, title: &str, body: &str) -> Result<TipEntity, sqlx::Error> {
        timed(
            "create_tip",
            sqlx::query_as::<_, TipEntity>(
                r#"
                INSERT INTO tips (title, body)
                VALUES ($1, $2)
                RETURNING id, title, body, created_at, updated_at
                "#,
            )
            .bind(title)
            .bind(body)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn list_tips(&self) -> Result<Vec<TipEntity>, sqlx::Error> {
        timed(
            "list_tips",
            sqlx::query_as::<_, TipEntity>(
                "SELECT id, title, body, created_at, updated_at FROM tips ORDER BY created_at DESC",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn delete_tip(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_tip",
            sqlx::query("DELETE FROM tips WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_video_lesson(
        &self,
        title: &str,
        description: Option<&str>,
        link: &str,
    ) -> Result<VideoLessonEntity, sqlx::Error> {
        timed(
            "create_video_lesson",
            sqlx::query_as::<_, VideoLessonEntity>(
                r#"
                INSERT INTO video_lessons (title, description, link)
                VALUES ($1, $2, $3)
                RETURNING id, title, description, link, created_at, updated_at
                "#,
            )
            .bind(title)
            .bind(description)
            .bind(link)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn list_video_lessons(&self) -> Result<Vec<VideoLessonEntity>, sqlx::Error> {
        timed(
            "list_video_lessons",
            sqlx::query_as::<_, VideoLessonEntity>(
                r#"
                SELECT id, title, description, link, created_at, updated_at
                FROM video_lessons
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn delete_video_lesson(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_video_lesson",
            sqlx::query("DELETE FROM video_lessons WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
