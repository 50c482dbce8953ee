//! Short code resolution and usage statistics.

use std::sync::Arc;

use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::entities::{UrlMapping, UrlStats};
use crate::domain::repositories::UrlMappingRepository;
use crate::error::AppError;

/// Resolves short codes to their target URLs.
///
/// Expired mappings are reported as not found by every read, whether or not
/// the sweep has deleted them yet.
pub struct ResolveService<R: UrlMappingRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: UrlMappingRepository + ?Sized> ResolveService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Returns the original URL for `short_code` and counts the visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or expired.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        let mapping = self.find_live(short_code).await?;

        let clicks = self.repository.increment_clicks(mapping.id).await?;
        debug!(code = short_code, clicks, "Resolved short code");
        metrics::counter!("shortener_redirects_total").increment(1);

        Ok(mapping.original_url)
    }

    /// Returns usage statistics for `short_code` without counting a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or expired.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_stats(&self, short_code: &str) -> Result<UrlStats, AppError> {
        let mapping = self.find_live(short_code).await?;

        Ok(UrlStats {
            original_url: mapping.original_url,
            short_code: short_code.to_string(),
            created_at: mapping.created_at,
            click_count: mapping.click_count,
        })
    }

    async fn find_live(&self, short_code: &str) -> Result<UrlMapping, AppError> {
        let mapping = self
            .repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::mapping_not_found(short_code))?;

        if mapping.is_expired_at(self.clock.now()) {
            debug!(code = short_code, "Short code has expired");
            return Err(AppError::mapping_not_found(short_code));
        }

        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::MockUrlMappingRepository;
    use chrono::{DateTime, TimeDelta, Utc};

    fn mapping(code: &str, click_count: i64, expires_at: Option<DateTime<Utc>>) -> UrlMapping {
        UrlMapping {
            id: 42,
            original_url: "https://example.com/landing?ref=a&b=c".to_string(),
            short_code: Some(code.to_string()),
            created_at: Utc::now() - TimeDelta::days(1),
            click_count,
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_resolve_increments_clicks_once() {
        let mut repo = MockUrlMappingRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "g8")
            .times(1)
            .returning(|code| Ok(Some(mapping(code, 4, None))));
        repo.expect_increment_clicks()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|_| Ok(5));

        let service = ResolveService::new(Arc::new(repo), Arc::new(ManualClock::default()));

        let url = service.resolve("g8").await.unwrap();

        assert_eq!(url, "https://example.com/landing?ref=a&b=c");
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found() {
        let mut repo = MockUrlMappingRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_increment_clicks().times(0);

        let service = ResolveService::new(Arc::new(repo), Arc::new(ManualClock::default()));

        let err = service.resolve("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_expired_code_is_not_found() {
        let clock = Arc::new(ManualClock::default());
        let expired_at = clock.now() - TimeDelta::minutes(1);

        let mut repo = MockUrlMappingRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |code| Ok(Some(mapping(code, 0, Some(expired_at)))));
        repo.expect_increment_clicks().times(0);

        let service = ResolveService::new(Arc::new(repo), clock);

        let err = service.resolve("temp").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_error_info().message, "Short link not found");
    }

    #[tokio::test]
    async fn test_resolve_before_expiry_succeeds() {
        let clock = Arc::new(ManualClock::default());
        let expires_at = clock.now() + TimeDelta::minutes(1);

        let mut repo = MockUrlMappingRepository::new();
        repo.expect_find_by_code()
            .returning(move |code| Ok(Some(mapping(code, 0, Some(expires_at)))));
        repo.expect_increment_clicks().times(1).returning(|_| Ok(1));

        let service = ResolveService::new(Arc::new(repo), clock);

        assert!(service.resolve("temp").await.is_ok());
    }

    #[tokio::test]
    async fn test_get_stats_does_not_count_a_visit() {
        let mut repo = MockUrlMappingRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(mapping(code, 12, None))));
        repo.expect_increment_clicks().times(0);

        let service = ResolveService::new(Arc::new(repo), Arc::new(ManualClock::default()));

        let stats = service.get_stats("promo").await.unwrap();

        assert_eq!(stats.short_code, "promo");
        assert_eq!(stats.click_count, 12);
        assert_eq!(stats.original_url, "https://example.com/landing?ref=a&b=c");
    }

    #[tokio::test]
    async fn test_get_stats_expired_code_is_not_found() {
        let clock = Arc::new(ManualClock::default());
        let expired_at = clock.now() - TimeDelta::hours(1);

        let mut repo = MockUrlMappingRepository::new();
        repo.expect_find_by_code()
            .returning(move |code| Ok(Some(mapping(code, 3, Some(expired_at)))));

        let service = ResolveService::new(Arc::new(repo), clock);

        let err = service.get_stats("old").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
