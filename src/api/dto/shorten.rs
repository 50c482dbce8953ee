//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::alias::{ALIAS_REGEX, ensure_not_reserved};
use crate::utils::target_url::ensure_no_control_chars;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[validate(length(min = 1, message = "URL cannot be empty"))]
    #[validate(url(message = "A valid URL format is required"))]
    #[validate(custom(function = "ensure_no_control_chars"))]
    pub url: String,

    /// Optional caller-chosen short code.
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(
        path = *ALIAS_REGEX,
        message = "Alias may only contain letters, digits, '-' and '_'"
    ))]
    #[validate(custom(function = "ensure_not_reserved"))]
    pub custom_alias: Option<String>,

    /// Optional lifetime of the link in hours.
    #[validate(range(min = 1, message = "Hours to expire must be a positive number"))]
    pub hours_to_expire: Option<u32>,
}

impl ShortenRequest {
    /// Treats a blank alias the same as no alias.
    pub fn normalized(mut self) -> Self {
        self.custom_alias = self.custom_alias.filter(|alias| !alias.trim().is_empty());
        self
    }
}

/// Response for a created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
}
