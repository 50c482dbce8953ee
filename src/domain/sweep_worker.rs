//! Background worker that periodically deletes expired mappings.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{error, info};

use crate::application::services::SweepService;
use crate::domain::repositories::UrlMappingRepository;

/// Backoff grows as `RETRY_BASE_MS^n * RETRY_FACTOR`: 0.5s, 5s, 50s.
const RETRY_BASE_MS: u64 = 10;
const RETRY_FACTOR: u64 = 50;

/// Retries after the first failed attempt of a run.
const MAX_RETRIES: usize = 3;

/// Runs [`SweepService::sweep_expired`] every `period` until the task is dropped.
///
/// The first sweep runs immediately. A failed sweep is retried with jittered
/// exponential backoff; if every retry fails the error is logged and the
/// worker waits for the next tick.
pub async fn run_sweep_worker<R>(service: Arc<SweepService<R>>, period: Duration)
where
    R: UrlMappingRepository + ?Sized,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(period_secs = period.as_secs(), "Sweep worker started");

    loop {
        ticker.tick().await;

        let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MS)
            .factor(RETRY_FACTOR)
            .map(jitter)
            .take(MAX_RETRIES);

        if let Err(e) = Retry::spawn(strategy, || service.sweep_expired()).await {
            error!(error = %e, "Expired mapping sweep failed");
        }
    }
}
