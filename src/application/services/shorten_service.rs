//! Short code allocation.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::NewUrlMapping;
use crate::domain::repositories::UrlMappingRepository;
use crate::error::AppError;
use crate::utils::base62;

/// Placeholder rows tried before giving up on a derived code.
///
/// A derived code can only collide with a custom alias that happens to spell
/// the same base-62 number.
const MAX_DERIVE_ATTEMPTS: usize = 10;

/// Allocates short codes and persists new mappings.
///
/// Codes come from one of two sources:
/// - a caller-chosen alias, reserved only if no mapping already uses it
/// - the base-62 encoding of the id the store assigns to the new row
pub struct ShortenService<R: UrlMappingRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: UrlMappingRepository + ?Sized> ShortenService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Creates a mapping for `original_url` and returns its short code.
    ///
    /// `original_url` and `custom_alias` are expected to be validated by the
    /// caller. `hours_to_expire` applies to both aliased and derived codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `custom_alias` is already in use; no
    /// mapping is created in that case.
    /// Returns [`AppError::Validation`] if the expiry is out of range.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn allocate(
        &self,
        original_url: String,
        custom_alias: Option<String>,
        hours_to_expire: Option<u32>,
    ) -> Result<String, AppError> {
        let now = self.clock.now();
        let expires_at = expiry_from(now, hours_to_expire)?;

        let new_mapping = NewUrlMapping {
            original_url,
            short_code: None,
            created_at: now,
            expires_at,
        };

        let code = match custom_alias {
            Some(alias) => self.reserve_alias(new_mapping, alias).await?,
            None => self.derive_code(new_mapping).await?,
        };

        metrics::counter!("shortener_links_created_total").increment(1);
        Ok(code)
    }

    async fn reserve_alias(
        &self,
        mut new_mapping: NewUrlMapping,
        alias: String,
    ) -> Result<String, AppError> {
        if self.repository.find_by_code(&alias).await?.is_some() {
            debug!(alias = %alias, "Alias already taken");
            return Err(AppError::alias_conflict(&alias));
        }

        new_mapping.short_code = Some(alias.clone());

        // The unique constraint catches a concurrent registration of the same alias.
        match self.repository.create(new_mapping).await {
            Ok(mapping) => {
                info!(id = mapping.id, alias = %alias, "Registered custom alias");
                Ok(alias)
            }
            Err(e) if e.is_conflict() => Err(AppError::alias_conflict(&alias)),
            Err(e) => Err(e),
        }
    }

    async fn derive_code(&self, new_mapping: NewUrlMapping) -> Result<String, AppError> {
        for _ in 0..MAX_DERIVE_ATTEMPTS {
            let mapping = self.repository.create(new_mapping.clone()).await?;

            let id = u64::try_from(mapping.id).map_err(|_| {
                AppError::internal(
                    "Store assigned a negative id",
                    json!({ "id": mapping.id }),
                )
            })?;
            let code = base62::encode(id);

            match self.repository.assign_code(mapping.id, &code).await {
                Ok(()) => {
                    info!(id = mapping.id, code = %code, "Allocated derived code");
                    return Ok(code);
                }
                Err(e) if e.is_conflict() => {
                    warn!(
                        id = mapping.id,
                        code = %code,
                        "Derived code is taken by an alias, leaving row without a code"
                    );
                }
                Err(e) => {
                    error!(id = mapping.id, error = %e, "Row left without a code");
                    return Err(e);
                }
            }
        }

        Err(AppError::internal(
            "Failed to allocate a short code",
            json!({ "reason": "Derived codes collided with existing aliases" }),
        ))
    }
}

fn expiry_from(
    now: DateTime<Utc>,
    hours_to_expire: Option<u32>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(hours) = hours_to_expire else {
        return Ok(None);
    };

    TimeDelta::try_hours(i64::from(hours))
        .and_then(|delta| now.checked_add_signed(delta))
        .map(Some)
        .ok_or_else(|| {
            AppError::bad_request(
                "Expiry is out of range",
                json!({ "hours_to_expire": hours }),
            )
        })
}
