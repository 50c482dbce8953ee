//! Validation rules for link targets.

use std::borrow::Cow;
use validator::ValidationError;

/// Rejects targets containing control characters.
///
/// URL parsing strips tabs and newlines, so such a target passes the `url`
/// check but can never be sent back in a `Location` header.
pub fn ensure_no_control_chars(url: &str) -> Result<(), ValidationError> {
    if url.chars().any(char::is_control) {
        let mut error = ValidationError::new("control_characters");
        error.message = Some(Cow::Borrowed("URL must not contain control characters"));
        return Err(error);
    }

    Ok(())
}
