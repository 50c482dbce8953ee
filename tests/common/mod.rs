#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use shortlink::domain::clock::ManualClock;
use shortlink::domain::entities::{NewUrlMapping, UrlMapping};
use shortlink::domain::repositories::UrlMappingRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::InMemoryUrlMappingRepository;
use shortlink::routes;
use shortlink::state::AppState;
use std::sync::Arc;

pub const BASE_URL: &str = "http://sho.rt";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub repository: Arc<InMemoryUrlMappingRepository>,
}

pub fn create_test_context() -> TestContext {
    let clock = Arc::new(ManualClock::new(start_time()));
    let repository = Arc::new(InMemoryUrlMappingRepository::new());
    let state = AppState::new(repository.clone(), clock.clone(), BASE_URL);

    TestContext {
        state,
        clock,
        repository,
    }
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(routes::router(state)).unwrap()
}

/// Shortens `url` through the API and returns the allocated code.
pub async fn shorten(server: &TestServer, body: serde_json::Value) -> String {
    let response = server.post("/api/v1/url/shorten").json(&body).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["code"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Repository whose storage is unreachable.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[async_trait]
impl UrlMappingRepository for UnavailableRepository {
    async fn create(&self, _new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        Err(unavailable())
    }

    async fn find_by_code(&self, _short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        Err(unavailable())
    }

    async fn assign_code(&self, _id: i64, _short_code: &str) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn increment_clicks(&self, _id: i64) -> Result<i64, AppError> {
        Err(unavailable())
    }

    async fn count_expired(&self, _now: DateTime<Utc>) -> Result<u64, AppError> {
        Err(unavailable())
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> Result<u64, AppError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> bool {
        false
    }
}
