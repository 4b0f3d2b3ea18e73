//! Admin bootstrap for initial setup.
//!
//! Admins are never self-registered. On startup, if `admin.bootstrap_email` is
//! configured and no active admin exists, one is created from configuration.

use persistence::db::unique_violation;
use persistence::repositories::{NewUser, UserRepository};
use shared::password::{hash_password, PasswordError};
use shared::validation::validate_mobile;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// What [`bootstrap_admin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    AdminExists,
    Created,
}

fn check_config(config: &AdminConfig) -> Result<bool, BootstrapError> {
    if config.bootstrap_email.is_empty() {
        return Ok(false);
    }
    if config.bootstrap_password.is_empty() {
        return Err(BootstrapError::Config(
            "ED__ADMIN__BOOTSTRAP_EMAIL is set but ED__ADMIN__BOOTSTRAP_PASSWORD is empty".into(),
        ));
    }
    if validate_mobile(&config.bootstrap_mobile).is_err() {
        return Err(BootstrapError::Config(
            "ED__ADMIN__BOOTSTRAP_MOBILE must be a 10 digit mobile number".into(),
        ));
    }
    Ok(true)
}

/// Idempotent; call after migrations.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    if !check_config(config)? {
        return Ok(BootstrapOutcome::NotConfigured);
    }

    let users = UserRepository::new(pool.clone());
    if users.admin_exists().await? {
        info!("Admin account already exists - skipping bootstrap");
        return Ok(BootstrapOutcome::AdminExists);
    }

    let password_hash = hash_password(&config.bootstrap_password)?;
    let created = users
        .create(NewUser {
            name: &config.bootstrap_name,
            email: &config.bootstrap_email,
            mobile: &config.bootstrap_mobile,
            password_hash: Some(&password_hash),
            role: "admin",
            date_of_birth: None,
            is_verified: true,
        })
        .await;

    match created {
        Ok(user) => {
            info!(email = %config.bootstrap_email, user_id = %user.id, "Bootstrap admin created");
            warn!(
                "SECURITY: Remove ED__ADMIN__BOOTSTRAP_PASSWORD from configuration after initial setup"
            );
            Ok(BootstrapOutcome::Created)
        }
        Err(e) => match unique_violation(&e) {
            Some(constraint) => Err(BootstrapError::Config(format!(
                "Bootstrap admin conflicts with an existing account ({})",
                constraint
            ))),
            None => Err(e.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(email: &str, password: &str, mobile: &str) -> AdminConfig {
        AdminConfig {
            bootstrap_email: email.to_string(),
            bootstrap_password: password.to_string(),
            bootstrap_mobile: mobile.to_string(),
            bootstrap_name: "Administrator".to_string(),
        }
    }

    #[test]
    fn test_not_configured() {
        assert!(!check_config(&config("", "", "")).unwrap());
    }

    #[test]
    fn test_missing_password() {
        let result = check_config(&config("admin@example.com", "", "9998887777"));
        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }

    #[test]
    fn test_invalid_mobile() {
        let result = check_config(&config("admin@example.com", "s3cret-pass", "12"));
        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }

    #[test]
    fn test_complete_config() {
        assert!(check_config(&config("admin@example.com", "s3cret-pass", "9998887777")).unwrap());
    }
}
