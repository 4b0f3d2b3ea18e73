//! One-time password models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A live OTP row. Only the digest of the code is ever stored.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub id: Uuid,
    pub mobile: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Request payload for `send-otp`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,
}

/// Request payload for `verify-otp`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

/// Response body for `send-otp`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub mobile: String,
    pub expires_in: i64,
}
