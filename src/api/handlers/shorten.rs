//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_url;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/v1/url/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "custom_alias": "promo",   // optional
///   "hours_to_expire": 24      // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "code": "promo", "short_url": "http://localhost:3000/promo" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the alias is already in use.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let code = state
        .shorten_service
        .allocate(payload.url, payload.custom_alias, payload.hours_to_expire)
        .await?;

    let response = ShortenResponse {
        short_url: short_url(&state.base_url, &code),
        code,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
