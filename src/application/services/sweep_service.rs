//! Removal of expired mappings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::repositories::UrlMappingRepository;
use crate::error::AppError;

/// Deletes mappings whose expiry has passed.
///
/// Resolution never depends on this running: expired rows already read as
/// not found. The sweep only reclaims storage.
pub struct SweepService<R: UrlMappingRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: UrlMappingRepository + ?Sized> SweepService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Current time of the service's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Counts mappings that expired before `now` and await deletion.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn count_expired_at(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.repository.count_expired(now).await
    }

    /// Deletes every mapping that expired before now.
    ///
    /// Returns the number of deleted mappings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        self.sweep_expired_at(self.clock.now()).await
    }

    /// Deletes every mapping that expired before `now`.
    ///
    /// Pairs with [`Self::count_expired_at`] so a count and the deletion
    /// that follows it agree on the cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        info!("Sweeping expired URL mappings");

        let deleted = self.repository.delete_expired(now).await?;

        if deleted > 0 {
            info!(deleted, "Deleted expired URL mappings");
        } else {
            info!("No expired URL mappings to delete");
        }
        metrics::counter!("shortener_expired_swept_total").increment(deleted);

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::MockUrlMappingRepository;
    use serde_json::json;

    #[tokio::test]
    async fn test_sweep_uses_clock_time() {
        let clock = Arc::new(ManualClock::default());
        let now = clock.now();

        let mut repo = MockUrlMappingRepository::new();
        repo.expect_delete_expired()
            .withf(move |cutoff| *cutoff == now)
            .times(1)
            .returning(|_| Ok(3));

        let service = SweepService::new(Arc::new(repo), clock);

        assert_eq!(service.sweep_expired().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_count_and_sweep_share_cutoff() {
        let clock = Arc::new(ManualClock::default());
        let cutoff = clock.now();

        let mut repo = MockUrlMappingRepository::new();
        repo.expect_count_expired()
            .withf(move |now| *now == cutoff)
            .times(1)
            .returning(|_| Ok(2));
        repo.expect_delete_expired()
            .withf(move |now| *now == cutoff)
            .times(1)
            .returning(|_| Ok(2));

        let service = SweepService::new(Arc::new(repo), clock.clone());

        let pending = service.count_expired_at(cutoff).await.unwrap();
        clock.advance(chrono::TimeDelta::hours(1));
        let deleted = service.sweep_expired_at(cutoff).await.unwrap();

        assert_eq!(pending, deleted);
    }

    #[tokio::test]
    async fn test_sweep_propagates_errors() {
        let mut repo = MockUrlMappingRepository::new();
        repo.expect_delete_expired()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = SweepService::new(Arc::new(repo), Arc::new(ManualClock::default()));

        assert!(service.sweep_expired().await.is_err());
    }
}
