//! Drops idle per-IP rate limiter state.

use std::sync::Arc;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::RateLimiterState;

pub struct RateLimitSweepJob {
    limiter: Arc<RateLimiterState>,
}

impl RateLimitSweepJob {
    pub fn new(limiter: Arc<RateLimiterState>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitSweepJob {
    fn name(&self) -> &'static str {
        "rate_limit_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(10)
    }

    async fn execute(&self) -> Result<(), String> {
        self.limiter.retain_recent();
        metrics::gauge!("rate_limiter_tracked_clients").set(self.limiter.tracked_clients() as f64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_keeps_limiter_usable() {
        let limiter = Arc::new(RateLimiterState::new(5).unwrap());
        let ip = "10.0.0.1".parse().unwrap();
        assert!(limiter.check(ip).is_ok());

        let job = RateLimitSweepJob::new(Arc::clone(&limiter));
        assert!(job.execute().await.is_ok());
        assert!(limiter.check(ip).is_ok());
    }
}
