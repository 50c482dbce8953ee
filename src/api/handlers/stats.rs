//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_url;

/// Returns usage statistics for a short link.
///
/// # Endpoint
///
/// `GET /api/v1/url/stats/{code}`
///
/// # Response
///
/// ```json
/// {
///   "original_url": "https://example.com",
///   "short_url": "http://localhost:3000/1",
///   "creation_date": "2025-01-01T12:00:00Z",
///   "click_count": 3
/// }
/// ```
///
/// Reading statistics does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist or has expired.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.resolve_service.get_stats(&code).await?;

    Ok(Json(StatsResponse {
        short_url: short_url(&state.base_url, &stats.short_code),
        original_url: stats.original_url,
        creation_date: stats.created_at,
        click_count: stats.click_count,
    }))
}
