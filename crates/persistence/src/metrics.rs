//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::future::Future;
use std::time::Instant;

/// Record a query's duration under its name.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Count a failed query under its name.
pub fn record_query_error(query_name: &str) {
    counter!(
        "database_query_errors_total",
        "query" => query_name.to_string()
    )
    .increment(1);
}

/// Record connection pool gauges. Called periodically by the pool metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times a database operation from construction until [`QueryTimer::record`].
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}

/// Awaits `query`, recording its duration and counting failures.
///
/// ```ignore
/// let row = timed("find_event_by_id", sqlx::query_as::<_, EventEntity>(SQL)
///     .bind(id)
///     .fetch_optional(&self.pool))
/// .await?;
/// ```
pub async fn timed<T, F>(query_name: &'static str, query: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let timer = QueryTimer::new(query_name);
    let result = query.await;
    timer.record();
    if result.is_err() {
        record_query_error(query_name);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_accepts_owned_and_borrowed_names() {
        assert_eq!(QueryTimer::new("consume_otp").query_name, "consume_otp");
        let name = format!("list_{}", "guests");
        assert_eq!(QueryTimer::new(name).query_name, "list_guests");
    }

    #[tokio::test]
    async fn test_timed_passes_results_through() {
        let ok: Result<i32, sqlx::Error> = timed("count_events", async { Ok(3) }).await;
        assert_eq!(ok.unwrap(), 3);

        let err: Result<i32, sqlx::Error> =
            timed("find_event_by_id", async { Err(sqlx::Error::RowNotFound) }).await;
        assert!(matches!(err, Err(sqlx::Error::RowNotFound)));
    }
}
