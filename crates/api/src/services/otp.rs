//! OTP issuance and verification for mobile sign-in.
//!
//! At most one code is live per mobile. Codes are stored as digests, expire
//! after `otp.ttl_secs`, and are consumed by a single delete so each code
//! verifies at most once.

use chrono::{Duration, Utc};
use domain::models::otp::SendOtpResponse;
use domain::models::User;
use domain::services::{SmsError, SmsSender};
use persistence::repositories::{OtpRepository, UserRepository};
use shared::crypto::otp_digest;
use shared::otp::{generate_code, is_well_formed};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::middleware::metrics::record_otp_sent;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Invalid or expired OTP")]
    InvalidOrExpired,

    #[error("Failed to deliver OTP: {0}")]
    DeliveryFailed(#[from] SmsError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::InvalidOrExpired => ApiError::field("otp", err.to_string()),
            OtpError::DeliveryFailed(_) => ApiError::Upstream(err.to_string()),
            OtpError::Database(e) => e.into(),
        }
    }
}

/// Outcome of a successful verification.
#[derive(Debug, Clone)]
pub struct OtpVerification {
    pub mobile: String,
    /// The account registered with this mobile, now marked verified.
    pub user: Option<User>,
}

pub fn otp_message(code: &str, ttl_secs: i64) -> String {
    let minutes = (ttl_secs + 59) / 60;
    format!(
        "Your EventDesk verification code is {}. It expires in {} minutes.",
        code, minutes
    )
}

pub struct OtpService {
    otps: OtpRepository,
    users: UserRepository,
    sms: Arc<dyn SmsSender>,
    ttl_secs: i64,
}

impl OtpService {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>, ttl_secs: i64) -> Self {
        Self {
            otps: OtpRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            sms,
            ttl_secs,
        }
    }

    /// Replaces any live code for `mobile` and texts the new one.
    ///
    /// If the provider rejects the message the new code is deleted, so a code
    /// nobody received can never be guessed into a session.
    pub async fn issue(&self, mobile: &str) -> Result<SendOtpResponse, OtpError> {
        let code = generate_code();
        let expires_at = Utc::now() + Duration::seconds(self.ttl_secs);
        let record = self
            .otps
            .replace(mobile, &otp_digest(mobile, &code), expires_at)
            .await?;

        if let Err(e) = self.sms.send(mobile, &otp_message(&code, self.ttl_secs)).await {
            warn!(mobile = %mobile, error = %e, "OTP delivery failed, revoking code");
            record_otp_sent("failed");
            self.otps.delete_by_id(record.id).await?;
            return Err(OtpError::DeliveryFailed(e));
        }

        record_otp_sent("sent");
        info!(mobile = %mobile, "OTP issued");
        Ok(SendOtpResponse {
            mobile: mobile.to_string(),
            expires_in: self.ttl_secs,
        })
    }

    /// Consumes the live code for `mobile` if `code` matches it.
    pub async fn verify(&self, mobile: &str, code: &str) -> Result<OtpVerification, OtpError> {
        if !is_well_formed(code) {
            return Err(OtpError::InvalidOrExpired);
        }

        self.otps
            .consume(mobile, &otp_digest(mobile, code))
            .await?
            .ok_or(OtpError::InvalidOrExpired)?;

        let user = self
            .users
            .mark_verified_by_mobile(mobile)
            .await?
            .map(User::from);

        info!(mobile = %mobile, has_account = user.is_some(), "OTP verified");
        Ok(OtpVerification {
            mobile: mobile.to_string(),
            user,
        })
    }

    /// Physically removes expired codes; reads already ignore them.
    pub async fn purge_expired(&self) -> Result<u64, OtpError> {
        Ok(self.otps.delete_expired().await?)
    }
}
