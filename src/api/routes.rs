//! API route configuration.

use crate::api::handlers::{shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Versioned API routes, nested under `/api/v1`.
///
/// # Endpoints
///
/// - `POST /url/shorten`       - Create a short link
/// - `GET  /url/stats/{code}`  - Usage statistics for a short link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/url/shorten", post(shorten_handler))
        .route("/url/stats/{code}", get(stats_handler))
}
