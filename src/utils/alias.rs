//! Validation rules for caller-chosen aliases.
//!
//! Aliases become the first path segment of the short URL, so they are limited
//! to URL-safe symbols and must not shadow a system route. Length (at most
//! 64, the `short_code` column width) is checked on the request DTO.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// Allowed alias symbols.
pub static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Path segments owned by the service itself.
const RESERVED_ALIASES: &[&str] = &["api", "health"];

/// Rejects aliases that would collide with a system route.
///
/// Comparison is case-insensitive.
pub fn ensure_not_reserved(alias: &str) -> Result<(), ValidationError> {
    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        let mut error = ValidationError::new("reserved");
        error.message = Some(Cow::Borrowed("This alias is reserved"));
        error.add_param(Cow::Borrowed("alias"), &alias);
        return Err(error);
    }

    Ok(())
}
