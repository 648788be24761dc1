//! Background job scheduler and job implementations.

mod pool_metrics;
mod scheduler;
mod survey_dispatch;

pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use survey_dispatch::SurveyDispatchJob;
