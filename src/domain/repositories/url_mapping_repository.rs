//! Repository trait for URL mapping storage.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store of URL mapping records.
///
/// Implementations must enforce uniqueness of `short_code` themselves
/// (a unique constraint in PostgreSQL, an index in memory): the service's
/// existence check before inserting an alias is not atomic with the insert.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlMappingRepository`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlMappingRepository: Send + Sync {
    /// Inserts a new mapping and returns it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `short_code` is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError>;

    /// Finds a mapping by exact short code, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Sets the short code of a mapping created without one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no code-less mapping has this id.
    /// Returns [`AppError::Conflict`] if the code is already taken.
    async fn assign_code(&self, id: i64, code: &str) -> Result<(), AppError>;

    /// Atomically increments the click counter and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the mapping no longer exists.
    async fn increment_clicks(&self, id: i64) -> Result<i64, AppError>;

    /// Counts mappings whose expiry is before `now`.
    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Deletes every mapping whose expiry is before `now`.
    ///
    /// Returns the number of deleted rows.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self) -> bool;
}
