//! OTP repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::OtpEntity;
use crate::metrics::timed;

#[derive(Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a code for `mobile`, replacing any earlier one.
    ///
    /// The replaced row gets a fresh id, so a stale id never matches the new code.
    pub async fn replace(
        &self,
        mobile: &str,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<OtpEntity, sqlx::Error> {
        timed(
            "replace_otp",
            sqlx::query_as::<_, OtpEntity>(
                r#"
                INSERT INTO otps (mobile, code_hash, expires_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (mobile) DO UPDATE
                SET id = gen_random_uuid(),
                    code_hash = EXCLUDED.code_hash,
                    expires_at = EXCLUDED.expires_at,
                    created_at = NOW()
                RETURNING id, mobile, code_hash, expires_at, created_at
                "#,
            )
            .bind(mobile)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(&self.pool),
        )
        .await
    }

    /// Deletes and returns the live code matching `(mobile, code_hash)`.
    ///
    /// A single statement, so two concurrent verifications cannot both succeed.
    pub async fn consume(
        &self,
        mobile: &str,
        code_hash: &str,
    ) -> Result<Option<OtpEntity>, sqlx::Error> {
        timed(
            "consume_otp",
            sqlx::query_as::<_, OtpEntity>(
                r#"
                DELETE FROM otps
                WHERE mobile = $1 AND code_hash = $2 AND expires_at > NOW()
                RETURNING id, mobile, code_hash, expires_at, created_at
                "#,
            )
            .bind(mobile)
            .bind(code_hash)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn find_live(&self, mobile: &str) -> Result<Option<OtpEntity>, sqlx::Error> {
        timed(
            "find_live_otp",
            sqlx::query_as::<_, OtpEntity>(
                r#"
                SELECT id, mobile, code_hash, expires_at, created_at
                FROM otps
                WHERE mobile = $1 AND expires_at > NOW()
                "#,
            )
            .bind(mobile)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_otp",
            sqlx::query("DELETE FROM otps WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes every expired code. Returns the number removed.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = timed(
            "delete_expired_otps",
            sqlx::query("DELETE FROM otps WHERE expires_at <= NOW()").execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected())
    }
}
