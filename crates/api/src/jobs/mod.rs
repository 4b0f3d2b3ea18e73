//! Background jobs.

mod otp_cleanup;
mod pool_metrics;
mod rate_limit_sweep;
mod scheduler;

pub use otp_cleanup::OtpCleanupJob;
pub use pool_metrics::PoolMetricsJob;
pub use rate_limit_sweep::RateLimitSweepJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
