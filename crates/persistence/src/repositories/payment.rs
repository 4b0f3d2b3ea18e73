//! Event payment, member fee and member payment repositories.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventPaymentEntity, MemberFeeEntity, MemberPaymentEntity};
use crate::metrics::timed;

const EVENT_PAYMENT_COLUMNS: &str =
    "id, user_id, event_id, payment_id, is_active, created_at, updated_at";

const MEMBER_PAYMENT_COLUMNS: &str =
    "id, user_id, member_fees_id, payment_id, expire_date, is_active, created_at, updated_at";

const MEMBER_FEE_COLUMNS: &str = "id, title, amount, description, active, created_at, updated_at";

#[derive(Clone)]
pub struct EventPaymentRepository {
    pool: PgPool,
}

impl EventPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<EventPaymentEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {EVENT_PAYMENT_COLUMNS} FROM event_payments WHERE user_id = $1 AND event_id = $2"
        );
        timed(
            "find_event_payment",
            sqlx::query_as::<_, EventPaymentEntity>(&sql)
                .bind(user_id)
                .bind(event_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Inserts an active payment. A second payment for the same pair fails
    /// with a unique violation on `event_payments_user_event_key`.
    pub async fn create(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        payment_id: &str,
    ) -> Result<EventPaymentEntity, sqlx::Error> {
        let sql = format!(
            "INSERT INTO event_payments (user_id, event_id, payment_id) \
             VALUES ($1, $2, $3) RETURNING {EVENT_PAYMENT_COLUMNS}"
        );
        timed(
            "create_event_payment",
            sqlx::query_as::<_, EventPaymentEntity>(&sql)
                .bind(user_id)
                .bind(event_id)
                .bind(payment_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    /// Logical revocation.
    pub async fn deactivate(&self, id: Uuid) -> Result<Option<EventPaymentEntity>, sqlx::Error> {
        let sql = format!(
            "UPDATE event_payments SET is_active = false, updated_at = NOW() \
             WHERE id = $1 RETURNING {EVENT_PAYMENT_COLUMNS}"
        );
        timed(
            "deactivate_event_payment",
            sqlx::query_as::<_, EventPaymentEntity>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<EventPaymentEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {EVENT_PAYMENT_COLUMNS} FROM event_payments \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        timed(
            "list_event_payments_for_user",
            sqlx::query_as::<_, EventPaymentEntity>(&sql)
                .bind(user_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn list_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<EventPaymentEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {EVENT_PAYMENT_COLUMNS} FROM event_payments \
             WHERE event_id = $1 ORDER BY created_at ASC"
        );
        timed(
            "list_event_payments_for_event",
            sqlx::query_as::<_, EventPaymentEntity>(&sql)
                .bind(event_id)
                .fetch_all(&self.pool),
        )
        .await
    }
}

#[derive(Clone)]
pub struct MemberFeeRepository {
    pool: PgPool,
}

impl MemberFeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: &str,
        amount: i64,
        description: Option<&str>,
    ) -> Result<MemberFeeEntity, sqlx::Error> {
        let sql = format!(
            "INSERT INTO member_fees (title, amount, description) \
             VALUES ($1, $2, $3) RETURNING {MEMBER_FEE_COLUMNS}"
        );
        timed(
            "create_member_fee",
            sqlx::query_as::<_, MemberFeeEntity>(&sql)
                .bind(title)
                .bind(amount)
                .bind(description)
                .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberFeeEntity>, sqlx::Error> {
        let sql = format!("SELECT {MEMBER_FEE_COLUMNS} FROM member_fees WHERE id = $1");
        timed(
            "find_member_fee",
            sqlx::query_as::<_, MemberFeeEntity>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn list_active(&self) -> Result<Vec<MemberFeeEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {MEMBER_FEE_COLUMNS} FROM member_fees WHERE active ORDER BY amount ASC"
        );
        timed(
            "list_member_fees",
            sqlx::query_as::<_, MemberFeeEntity>(&sql).fetch_all(&self.pool),
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_member_fee",
            sqlx::query("DELETE FROM member_fees WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct MemberPaymentRepository {
    pool: PgPool,
}

impl MemberPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_reference(
        &self,
        payment_id: &str,
    ) -> Result<Option<MemberPaymentEntity>, sqlx::Error> {
        let sql =
            format!("SELECT {MEMBER_PAYMENT_COLUMNS} FROM member_payments WHERE payment_id = $1");
        timed(
            "find_member_payment_by_reference",
            sqlx::query_as::<_, MemberPaymentEntity>(&sql)
                .bind(payment_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Inserts an active membership payment with a server-computed expiry.
    pub async fn create(
        &self,
        user_id: Uuid,
        member_fees_id: Uuid,
        payment_id: &str,
        expire_date: NaiveDate,
    ) -> Result<MemberPaymentEntity, sqlx::Error> {
        let sql = format!(
            "INSERT INTO member_payments (user_id, member_fees_id, payment_id, expire_date) \
             VALUES ($1, $2, $3, $4) RETURNING {MEMBER_PAYMENT_COLUMNS}"
        );
        timed(
            "create_member_payment",
            sqlx::query_as::<_, MemberPaymentEntity>(&sql)
                .bind(user_id)
                .bind(member_fees_id)
                .bind(payment_id)
                .bind(expire_date)
                .fetch_one(&self.pool),
        )
        .await
    }

    /// Full payment history of a user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MemberPaymentEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {MEMBER_PAYMENT_COLUMNS} FROM member_payments \
             WHERE user_id = $1 ORDER BY created_at DESC, expire_date DESC"
        );
        timed(
            "list_member_payments_for_user",
            sqlx::query_as::<_, MemberPaymentEntity>(&sql)
                .bind(user_id)
                .fetch_all(&self.pool),
        )
        .await
    }
}
