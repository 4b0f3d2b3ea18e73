//! Removes expired OTP rows.
//!
//! Expired codes are already rejected on read; this only reclaims the rows.

use std::sync::Arc;

use super::scheduler::{Job, JobFrequency};
use crate::services::OtpService;

pub struct OtpCleanupJob {
    otp: Arc<OtpService>,
    interval_secs: u64,
}

impl OtpCleanupJob {
    pub fn new(otp: Arc<OtpService>, interval_secs: u64) -> Self {
        Self { otp, interval_secs }
    }
}

#[async_trait::async_trait]
impl Job for OtpCleanupJob {
    fn name(&self) -> &'static str {
        "otp_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let removed = self
            .otp
            .purge_expired()
            .await
            .map_err(|e| format!("Failed to purge expired OTPs: {}", e))?;
        if removed > 0 {
            tracing::info!(removed, "Expired OTPs removed");
        }
        Ok(())
    }
}
