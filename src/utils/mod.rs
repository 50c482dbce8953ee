//! Utility functions for code derivation and request validation.
//!
//! - [`base62`] - Base-62 encoding of record identifiers into short codes
//! - [`alias`] - Validation rules for caller-chosen aliases
//! - [`target_url`] - Validation rules for link targets

pub mod alias;
pub mod base62;
pub mod target_url;

/// Joins the public base URL and a short code into the full short URL.
///
/// Tolerates a base URL with or without a trailing slash.
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
