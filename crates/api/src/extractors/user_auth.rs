//! Session authentication extractors.
//!
//! The session token is read from the `Authorization: Bearer` header first and
//! from the session cookie second. A valid signature is not enough: the user
//! must still exist and be active, and the token must not predate the user's
//! last password change.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{User, UserRole};
use persistence::repositories::UserRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user: User,
    /// JWT ID (jti) of the presented token.
    pub jti: String,
}

impl UserAuth {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    /// Admins may act on any account; everyone else only on their own.
    pub fn ensure_self_or_admin(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.is_admin() || self.user.id == user_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You can only access your own account".to_string(),
            ))
        }
    }

    /// Account a write is attributed to. A body-supplied id other than the
    /// caller's own is honoured only for admins.
    pub fn resolve_subject(&self, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
        match requested {
            None => Ok(self.user.id),
            Some(id) => {
                self.ensure_self_or_admin(id)?;
                Ok(id)
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, ApiError> {
    let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format".to_string(),
        )),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }

        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => state.cookies.extract_token(&parts.headers).ok_or_else(|| {
                ApiError::Unauthorized("You are not logged in. Please log in to get access".into())
            })?,
        };

        let claims = state
            .jwt
            .validate(&token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let user: User = UserRepository::new(state.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "The user belonging to this token no longer exists".to_string(),
                )
            })?
            .into();

        if user.changed_password_after(claims.iat) {
            return Err(ApiError::Unauthorized(
                "Password was changed recently. Please log in again".to_string(),
            ));
        }

        let auth = UserAuth {
            user,
            jti: claims.jti,
        };
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}

/// Authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub UserAuth);

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;
        if !auth.is_admin() {
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ));
        }
        Ok(AdminAuth(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder();
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn auth_with_role(role: UserRole) -> UserAuth {
        UserAuth {
            user: User {
                id: Uuid::new_v4(),
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                mobile: "9000000001".to_string(),
                password_hash: None,
                role,
                date_of_birth: None,
                is_verified: true,
                active: true,
                push_tokens: vec![],
                password_changed_at: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with_auth(None)).unwrap(), None);
        assert_eq!(
            bearer_token(&parts_with_auth(Some("Bearer abc"))).unwrap(),
            Some("abc".to_string())
        );
        assert!(bearer_token(&parts_with_auth(Some("Basic abc"))).is_err());
        assert!(bearer_token(&parts_with_auth(Some("Bearer "))).is_err());
    }

    #[test]
    fn test_resolve_subject_defaults_to_caller() {
        let auth = auth_with_role(UserRole::Student);
        assert_eq!(auth.resolve_subject(None).unwrap(), auth.user_id());
        assert_eq!(
            auth.resolve_subject(Some(auth.user_id())).unwrap(),
            auth.user_id()
        );
    }

    #[test]
    fn test_resolve_subject_other_user_requires_admin() {
        let other = Uuid::new_v4();
        let student = auth_with_role(UserRole::Student);
        assert!(matches!(
            student.resolve_subject(Some(other)),
            Err(ApiError::Forbidden(_))
        ));

        let admin = auth_with_role(UserRole::Admin);
        assert_eq!(admin.resolve_subject(Some(other)).unwrap(), other);
    }
}
