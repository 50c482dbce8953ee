//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Usage statistics for a single short link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub original_url: String,
    pub short_url: String,
    pub creation_date: DateTime<Utc>,
    pub click_count: i64,
}
