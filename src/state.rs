//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ResolveService, ShortenService, SweepService};
use crate::domain::clock::Clock;
use crate::domain::repositories::UrlMappingRepository;

/// Services and settings shared across requests.
///
/// Services are generic over the repository; the state erases the concrete
/// backend so PostgreSQL and in-memory storage share one router.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn UrlMappingRepository>,
    pub shorten_service: Arc<ShortenService<dyn UrlMappingRepository>>,
    pub resolve_service: Arc<ResolveService<dyn UrlMappingRepository>>,
    pub sweep_service: Arc<SweepService<dyn UrlMappingRepository>>,
    /// Prefix of public short URLs.
    pub base_url: String,
}

impl AppState {
    /// Builds all services on top of one repository and clock.
    pub fn new(
        repository: Arc<dyn UrlMappingRepository>,
        clock: Arc<dyn Clock>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            shorten_service: Arc::new(ShortenService::new(repository.clone(), clock.clone())),
            resolve_service: Arc::new(ResolveService::new(repository.clone(), clock.clone())),
            sweep_service: Arc::new(SweepService::new(repository.clone(), clock)),
            repository,
            base_url: base_url.into(),
        }
    }
}
