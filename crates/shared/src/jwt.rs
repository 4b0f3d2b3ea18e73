//! Session token utilities.
//!
//! Session tokens are HS256-signed JWTs. The signing secret comes from
//! configuration at process start and is never compiled into the binary.
//! The `iat` claim is compared against the user's last password change so
//! that tokens issued before a change stop working.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at issue time (student, jury, admin)
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Parses the subject claim as a user ID.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }
}

/// A freshly signed token with the metadata callers put in responses.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_in: i64,
}

/// Minimum secret length accepted for HS256 signing.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Signing and verification keys plus token lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub token_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("token_expiry_secs", &self.token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a config from a shared secret.
    pub fn new(secret: &str, token_expiry_secs: i64, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(JwtError::InvalidKey(format!(
                "Secret must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_secs,
            leeway_secs,
        })
    }

    /// Signs a session token for the given user.
    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(self.token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_in: self.token_expiry_secs,
        })
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    const SECRET: &str = "test_secret_key_for_session_tokens_0123456789";

    fn create_test_config() -> JwtConfig {
        JwtConfig::new(SECRET, 900, 0).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtConfig::new("too-short", 900, 0);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_issue_and_validate() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let issued = config.issue(user_id, "student").unwrap();
        let claims = config.validate(&issued.token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role, "student");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(issued.expires_in, 900);
    }

    #[test]
    fn test_claims_timestamps() {
        let config = create_test_config();
        let before = Utc::now().timestamp();
        let issued = config.issue(Uuid::new_v4(), "jury").unwrap();
        let after = Utc::now().timestamp();

        let claims = config.validate(&issued.token).unwrap();
        assert!(claims.iat >= before && claims.iat <= after);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_expired_token() {
        let config = JwtConfig::new(SECRET, 1, 0).unwrap();
        let issued = config.issue(Uuid::new_v4(), "student").unwrap();

        sleep(StdDuration::from_secs(2));

        let result = config.validate(&issued.token);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issuer = JwtConfig::new("another_secret_key_that_is_long_enough_!!", 900, 0).unwrap();
        let issued = issuer.issue(Uuid::new_v4(), "admin").unwrap();

        let result = create_test_config().validate(&issued.token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token() {
        assert!(create_test_config().validate("not_a_jwt").is_err());
    }

    #[test]
    fn test_unique_jti_per_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();
        let a = config.issue(user_id, "student").unwrap();
        let b = config.issue(user_id, "student").unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_invalid_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            role: "student".to_string(),
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", create_test_config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(SECRET));
    }
}
