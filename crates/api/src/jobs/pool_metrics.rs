//! Connection pool metrics background job.

use sqlx::PgPool;

use persistence::metrics::record_pool_metrics;

use super::scheduler::{Job, JobFrequency};

/// Background job that periodically records connection pool gauges.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    /// Create a new pool metrics job.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(15)
    }

    async fn execute(&self) -> Result<(), String> {
        record_pool_metrics(&self.pool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_job_frequency() {
        assert_eq!(
            JobFrequency::Seconds(15).duration(),
            Duration::from_secs(15)
        );
    }
}
