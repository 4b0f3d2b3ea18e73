//! Account registration, password login and session token issuance.

use chrono::Utc;
use domain::models::user::{
    age_on, ChangePasswordRequest, LoginRequest, RegisterUserRequest, User, UserRole,
};
use persistence::db::{constraints, violates};
use persistence::repositories::{NewUser, UserRepository};
use shared::jwt::{IssuedToken, JwtConfig, JwtError};
use shared::password::{check_password_policy, hash_password, verify_password, PasswordError};
use shared::validation::parse_date;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Mobile number already registered")]
    MobileAlreadyExists,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid date of birth")]
    InvalidDateOfBirth,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Your current password is wrong")]
    WrongCurrentPassword,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::Duplicate(err.to_string()),
            AuthError::MobileAlreadyExists => ApiError::Duplicate(err.to_string()),
            AuthError::WeakPassword(msg) => ApiError::field("password", msg),
            AuthError::InvalidDateOfBirth => ApiError::field("dateOfBirth", err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::WrongCurrentPassword => ApiError::Unauthorized(err.to_string()),
            AuthError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::Password(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::Database(e) => e.into(),
        }
    }
}

/// An authenticated user together with a freshly issued session token.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub token: IssuedToken,
}

pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Creates a student or jury account (by age) and signs it in.
    pub async fn register(&self, request: &RegisterUserRequest) -> Result<AuthResult, AuthError> {
        check_password_policy(&request.password).map_err(AuthError::WeakPassword)?;

        let date_of_birth =
            parse_date(&request.date_of_birth).ok_or(AuthError::InvalidDateOfBirth)?;
        let today = Utc::now().date_naive();
        if date_of_birth >= today {
            return Err(AuthError::InvalidDateOfBirth);
        }
        let role = UserRole::for_age(age_on(date_of_birth, today));

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }
        if self.users.find_by_mobile(&request.mobile).await?.is_some() {
            return Err(AuthError::MobileAlreadyExists);
        }

        let password_hash = hash_password(&request.password)?;
        let created = self
            .users
            .create(NewUser {
                name: request.name.trim(),
                email: request.email.trim(),
                mobile: &request.mobile,
                password_hash: Some(&password_hash),
                role: role.as_str(),
                date_of_birth: Some(date_of_birth),
                is_verified: false,
            })
            .await
            .map_err(map_unique_violation)?;

        let user: User = created.into();
        info!(user_id = %user.id, role = %user.role, "User registered");
        self.sign_in(user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResult, AuthError> {
        let user: User = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&request.password, hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        self.sign_in(user)
    }

    /// Replaces the caller's password. Tokens issued before the change stop
    /// working; the returned token is issued after it.
    pub async fn change_password(
        &self,
        user: &User,
        request: &ChangePasswordRequest,
    ) -> Result<AuthResult, AuthError> {
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::WrongCurrentPassword)?;
        if !verify_password(&request.current_password, hash)? {
            return Err(AuthError::WrongCurrentPassword);
        }
        check_password_policy(&request.new_password).map_err(AuthError::WeakPassword)?;

        let new_hash = hash_password(&request.new_password)?;
        self.users.update_password(user.id, &new_hash).await?;

        let updated: User = self
            .users
            .find_by_id(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?
            .into();

        info!(user_id = %user.id, "Password changed");
        self.sign_in(updated)
    }

    pub fn issue_token(&self, user: &User) -> Result<IssuedToken, AuthError> {
        Ok(self.jwt.issue(user.id, user.role.as_str())?)
    }

    fn sign_in(&self, user: User) -> Result<AuthResult, AuthError> {
        let token = self.issue_token(&user)?;
        Ok(AuthResult { user, token })
    }
}

/// Maps violations of the user email and mobile indexes to their duplicate errors.
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if violates(&err, constraints::USERS_EMAIL) {
        AuthError::EmailAlreadyExists
    } else if violates(&err, constraints::USERS_MOBILE) {
        AuthError::MobileAlreadyExists
    } else {
        AuthError::Database(err)
    }
}
