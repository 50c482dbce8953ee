//! Mapping record between a short code and its target URL.

use chrono::{DateTime, Utc};

/// A stored URL mapping.
///
/// `short_code` is `None` only between the two writes of the derived-code
/// path: the row is inserted first to obtain its `id`, and the code derived
/// from that id is assigned right after.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlMapping {
    pub id: i64,
    pub original_url: String,
    pub short_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlMapping {
    /// Returns true once `now` has passed the expiry time.
    ///
    /// A mapping without `expires_at` never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

/// Input data for creating a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlMapping {
    pub original_url: String,
    /// Set for aliases; `None` when the code is derived from the new id.
    pub short_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Read-only view of a mapping returned by the stats lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlStats {
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}
