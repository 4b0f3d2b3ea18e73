//! Background job scheduler.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How often a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFrequency {
    Seconds(u64),
    Minutes(u64),
    Hourly,
}

impl JobFrequency {
    /// Interval between runs. Never zero.
    pub fn duration(&self) -> Duration {
        let secs = match self {
            JobFrequency::Seconds(secs) => *secs,
            JobFrequency::Minutes(mins) => mins.saturating_mul(60),
            JobFrequency::Hourly => 3600,
        };
        Duration::from_secs(secs.max(1))
    }
}

/// A periodic background task.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    fn frequency(&self) -> JobFrequency;

    async fn execute(&self) -> Result<(), String>;
}

fn record_run(job: &'static str, ok: bool, elapsed: Duration) {
    let outcome = if ok { "success" } else { "failure" };
    metrics::counter!("background_job_runs_total", "job" => job, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("background_job_duration_seconds", "job" => job)
        .record(elapsed.as_secs_f64());
}

/// Runs registered jobs on their own intervals until shutdown is signalled.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Spawns one task per job. The first run happens one interval after start.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_rx.clone();

            let handle = tokio::spawn(async move {
                let name = job.name();
                let frequency = job.frequency();
                let mut interval = tokio::time::interval(frequency.duration());
                interval.tick().await;

                info!(job = name, frequency = ?frequency, "Job scheduled");

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let start = Instant::now();
                            let result = job.execute().await;
                            let elapsed = start.elapsed();
                            record_run(name, result.is_ok(), elapsed);
                            match result {
                                Ok(()) => info!(
                                    job = name,
                                    elapsed_ms = elapsed.as_millis() as u64,
                                    "Job completed"
                                ),
                                Err(e) => error!(
                                    job = name,
                                    elapsed_ms = elapsed.as_millis() as u64,
                                    error = %e,
                                    "Job failed"
                                ),
                            }
                        }
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                info!(job = name, "Job shutting down");
                                break;
                            }
                        }
                    }
                }
            });

            self.handles.push(handle);
        }
    }

    /// Signals every job to stop; returns immediately.
    pub fn shutdown(&self) {
        info!("Initiating job scheduler shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let handles = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        match tokio::time::timeout(timeout, handles).await {
            Ok(()) => info!("All jobs stopped"),
            Err(_) => warn!("Job shutdown timed out after {:?}", timeout),
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}
