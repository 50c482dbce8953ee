//! Process-local implementation of the URL mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::UrlMappingRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    last_id: i64,
    rows: BTreeMap<i64, UrlMapping>,
    /// Unique index over `short_code`.
    by_code: HashMap<String, i64>,
}

/// In-memory repository holding all mappings behind a single lock.
///
/// Mirrors the PostgreSQL schema: ids start at 1 and increase, `short_code`
/// is unique, and every operation is atomic with respect to the others.
/// Contents are lost when the process exits.
///
/// # Use Cases
///
/// - Local development without PostgreSQL (`STORAGE_BACKEND=memory`)
/// - HTTP tests
#[derive(Default)]
pub struct InMemoryUrlMappingRepository {
    store: Mutex<Store>,
}

impl InMemoryUrlMappingRepository {
    pub fn new() -> Self {
        debug!("Using in-memory URL mapping store");
        Self::default()
    }

    /// Number of stored mappings, expired ones included.
    pub fn len(&self) -> usize {
        self.store.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn code_taken(code: &str) -> AppError {
    AppError::conflict("Short code is already in use", json!({ "code": code }))
}

#[async_trait]
impl UrlMappingRepository for InMemoryUrlMappingRepository {
    async fn create(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let mut store = self.store.lock();

        if let Some(code) = &new_mapping.short_code {
            if store.by_code.contains_key(code) {
                return Err(code_taken(code));
            }
        }

        store.last_id += 1;
        let mapping = UrlMapping {
            id: store.last_id,
            original_url: new_mapping.original_url,
            short_code: new_mapping.short_code,
            created_at: new_mapping.created_at,
            click_count: 0,
            expires_at: new_mapping.expires_at,
        };

        if let Some(code) = &mapping.short_code {
            store.by_code.insert(code.clone(), mapping.id);
        }
        store.rows.insert(mapping.id, mapping.clone());

        Ok(mapping)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError> {
        let store = self.store.lock();

        Ok(store
            .by_code
            .get(code)
            .and_then(|id| store.rows.get(id))
            .cloned())
    }

    async fn assign_code(&self, id: i64, code: &str) -> Result<(), AppError> {
        let mut store = self.store.lock();

        if store.by_code.contains_key(code) {
            return Err(code_taken(code));
        }

        let Some(mapping) = store
            .rows
            .get_mut(&id)
            .filter(|mapping| mapping.short_code.is_none())
        else {
            return Err(AppError::not_found(
                "No mapping awaiting a short code",
                json!({ "id": id }),
            ));
        };

        mapping.short_code = Some(code.to_string());
        store.by_code.insert(code.to_string(), id);

        Ok(())
    }

    async fn increment_clicks(&self, id: i64) -> Result<i64, AppError> {
        let mut store = self.store.lock();

        let mapping = store
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?;

        mapping.click_count += 1;
        Ok(mapping.click_count)
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let store = self.store.lock();

        Ok(store
            .rows
            .values()
            .filter(|mapping| mapping.is_expired_at(now))
            .count() as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut store = self.store.lock();

        let expired: Vec<i64> = store
            .rows
            .values()
            .filter(|mapping| mapping.is_expired_at(now))
            .map(|mapping| mapping.id)
            .collect();

        for id in &expired {
            if let Some(mapping) = store.rows.remove(id) {
                if let Some(code) = mapping.short_code {
                    store.by_code.remove(&code);
                }
            }
        }

        Ok(expired.len() as u64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
