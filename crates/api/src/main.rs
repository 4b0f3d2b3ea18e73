use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use eventdesk_api::app::{build_state, router};
use eventdesk_api::config::Config;
use eventdesk_api::jobs::{JobScheduler, OtpCleanupJob, PoolMetricsJob, RateLimitSweepJob};
use eventdesk_api::middleware::{init_metrics, logging::init_logging};
use eventdesk_api::services::admin_bootstrap::{bootstrap_admin, BootstrapOutcome};
use eventdesk_api::services::fcm::build_push_notifier;
use eventdesk_api::services::sms::build_sms_sender;
use eventdesk_api::services::OtpService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging);
    if let Err(e) = init_metrics() {
        warn!(error = %e, "Prometheus recorder not installed");
    }

    info!("Starting EventDesk API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    match bootstrap_admin(&pool, &config.admin).await? {
        BootstrapOutcome::Created => info!("Bootstrap admin account created"),
        BootstrapOutcome::AdminExists => info!("Admin account present"),
        BootstrapOutcome::NotConfigured => warn!("No admin account configured"),
    }

    let config = Arc::new(config);
    let sms = build_sms_sender(&config.sms)?;
    let push = build_push_notifier(&config.fcm);

    let mut scheduler = JobScheduler::new();
    scheduler.register(OtpCleanupJob::new(
        Arc::new(OtpService::new(
            pool.clone(),
            sms.clone(),
            config.otp.ttl_secs,
        )),
        config.otp.cleanup_interval_secs,
    ));
    scheduler.register(PoolMetricsJob::new(pool.clone()));

    let (state, rate_limiter) = build_state(config.clone(), pool, sms, push)?;
    if let Some(limiter) = rate_limiter {
        scheduler.register(RateLimitSweepJob::new(limiter));
    }
    scheduler.start();

    let app = router(state);

    let addr = config.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped, waiting for background jobs");
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
