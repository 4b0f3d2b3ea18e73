//! User repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserParticipationEntity};
use crate::metrics::timed;

const USER_COLUMNS: &str = "id, name, email, mobile, password_hash, role, date_of_birth, \
    is_verified, active, push_tokens, password_changed_at, created_at, updated_at";

/// Input for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub mobile: &'a str,
    pub password_hash: Option<&'a str>,
    pub role: &'a str,
    pub date_of_birth: Option<NaiveDate>,
    pub is_verified: bool,
}

/// Repository for user accounts. Every read ignores soft-deleted users.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND active");
        timed(
            "find_user_by_id",
            sqlx::query_as::<_, UserEntity>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Case-insensitive email lookup.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1) AND active");
        timed(
            "find_user_by_email",
            sqlx::query_as::<_, UserEntity>(&sql)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn find_by_mobile(&self, mobile: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE mobile = $1 AND active");
        timed(
            "find_user_by_mobile",
            sqlx::query_as::<_, UserEntity>(&sql)
                .bind(mobile)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn create(&self, user: NewUser<'_>) -> Result<UserEntity, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, mobile, password_hash, role, date_of_birth, is_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );
        timed(
            "create_user",
            sqlx::query_as::<_, UserEntity>(&sql)
                .bind(user.name)
                .bind(user.email)
                .bind(user.mobile)
                .bind(user.password_hash)
                .bind(user.role)
                .bind(user.date_of_birth)
                .bind(user.is_verified)
                .fetch_one(&self.pool),
        )
        .await
    }

    /// Applies a partial profile update; `None` keeps the stored value.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        mobile: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                mobile = COALESCE($4, mobile),
                updated_at = NOW()
            WHERE id = $1 AND active
            RETURNING {USER_COLUMNS}
            "#
        );
        timed(
            "update_user_profile",
            sqlx::query_as::<_, UserEntity>(&sql)
                .bind(id)
                .bind(name)
                .bind(email)
                .bind(mobile)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Marks the account owning `mobile` as verified.
    pub async fn mark_verified_by_mobile(
        &self,
        mobile: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE users
            SET is_verified = true, updated_at = NOW()
            WHERE mobile = $1 AND active
            RETURNING {USER_COLUMNS}
            "#
        );
        timed(
            "mark_user_verified",
            sqlx::query_as::<_, UserEntity>(&sql)
                .bind(mobile)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Stores a new password hash and stamps `password_changed_at`.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, sqlx::Error> {
        let result = timed(
            "update_user_password",
            sqlx::query(
                r#"
                UPDATE users
                SET password_hash = $2, password_changed_at = NOW(), updated_at = NOW()
                WHERE id = $1 AND active
                "#,
            )
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "soft_delete_user",
            sqlx::query("UPDATE users SET active = false, updated_at = NOW() WHERE id = $1 AND active")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any active admin account exists.
    pub async fn admin_exists(&self) -> Result<bool, sqlx::Error> {
        timed(
            "admin_exists",
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM users WHERE role = 'admin' AND active)",
            )
            .fetch_one(&self.pool),
        )
        .await
    }

    /// Adds a device token unless already present.
    pub async fn add_push_token(&self, id: Uuid, token: &str) -> Result<bool, sqlx::Error> {
        let result = timed(
            "add_push_token",
            sqlx::query(
                r#"
                UPDATE users
                SET push_tokens = CASE
                        WHEN $2 = ANY(push_tokens) THEN push_tokens
                        ELSE array_append(push_tokens, $2)
                    END,
                    updated_at = NOW()
                WHERE id = $1 AND active
                "#,
            )
            .bind(id)
            .bind(token)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes the given tokens from every user holding them.
    pub async fn prune_push_tokens(&self, tokens: &[String]) -> Result<u64, sqlx::Error> {
        if tokens.is_empty() {
            return Ok(0);
        }
        let result = timed(
            "prune_push_tokens",
            sqlx::query(
                r#"
                UPDATE users
                SET push_tokens = ARRAY(
                        SELECT t FROM unnest(push_tokens) AS t WHERE t <> ALL($1)
                    ),
                    updated_at = NOW()
                WHERE push_tokens && $1
                "#,
            )
            .bind(tokens)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected())
    }

    /// Every stored device token of active users.
    pub async fn all_push_tokens(&self) -> Result<Vec<String>, sqlx::Error> {
        timed(
            "all_push_tokens",
            sqlx::query_scalar::<_, String>(
                "SELECT DISTINCT unnest(push_tokens) FROM users WHERE active",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    /// Active payments for existing events, and the number of events.
    pub async fn participation_counts(&self, user_id: Uuid) -> Result<(i64, i64), sqlx::Error> {
        timed(
            "user_participation",
            sqlx::query_as::<_, (i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*)
                     FROM event_payments ep
                     JOIN events e ON e.id = ep.event_id
                     WHERE ep.user_id = $1 AND ep.is_active) AS attended,
                    (SELECT COUNT(*) FROM events) AS total_events
                "#,
            )
            .bind(user_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    /// All active non-admin users with their attendance, in one query.
    pub async fn list_with_participation(&self) -> Result<Vec<UserParticipationEntity>, sqlx::Error> {
        timed(
            "list_users_with_participation",
            sqlx::query_as::<_, UserParticipationEntity>(
                r#"
                SELECT u.id, u.name, u.email, u.mobile, u.password_hash, u.role, u.date_of_birth,
                       u.is_verified, u.active, u.push_tokens, u.password_changed_at,
                       u.created_at, u.updated_at,
                       COALESCE(p.attended, 0) AS attended,
                       t.total_events
                FROM users u
                LEFT JOIN (
                    SELECT ep.user_id, COUNT(*) AS attended
                    FROM event_payments ep
                    JOIN events e ON e.id = ep.event_id
                    WHERE ep.is_active
                    GROUP BY ep.user_id
                ) p ON p.user_id = u.id
                CROSS JOIN (SELECT COUNT(*) AS total_events FROM events) t
                WHERE u.active AND u.role <> 'admin'
                ORDER BY u.created_at DESC
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await
    }
}
