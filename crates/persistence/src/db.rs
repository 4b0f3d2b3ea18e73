//! Database connection pool management.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Names of the unique indexes that back domain invariants.
pub mod constraints {
    pub const USERS_EMAIL: &str = "users_email_key";
    pub const USERS_MOBILE: &str = "users_mobile_key";
    pub const EVENT_PAYMENTS_USER_EVENT: &str = "event_payments_user_event_key";
    pub const MEMBER_PAYMENTS_REFERENCE: &str = "member_payments_payment_reference_key";
    pub const GUESTS_EMAIL_EVENT: &str = "guests_email_event_key";
    pub const REVIEWS_USER_EVENT: &str = "reviews_user_event_key";
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Creates a PostgreSQL connection pool with the given configuration.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
}

/// Returns the violated constraint name if `err` is a unique violation.
///
/// An unnamed violation yields an empty string.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Whether `err` violates the named unique constraint.
pub fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    unique_violation(err).is_some_and(|name| name == constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert!(unique_violation(&sqlx::Error::RowNotFound).is_none());
        assert!(!violates(&sqlx::Error::PoolTimedOut, constraints::USERS_EMAIL));
    }
}
