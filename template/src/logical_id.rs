use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static LOGICAL_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,255}$").expect("Failed to init regexp"));

/// Check that a logical ID is alphanumeric and at most 255 characters long
pub fn validate_logical_id(id: &str) -> Result<(), ValidationError> {
    if LOGICAL_ID_REGEX.is_match(id) {
        return Ok(());
    }

    let reason = if id.is_empty() {
        "must not be empty"
    } else if id.len() > 255 {
        "must be at most 255 characters long"
    } else {
        "must contain only letters (a-z, A-Z) and digits"
    };

    Err(ValidationError::InvalidLogicalId {
        id: id.to_string(),
        reason: reason.into(),
    })
}

/// Turn an arbitrary name into a logical ID
///
/// Common separators are spelled out so that e.g. `my-queue` and `my_queue`
/// do not collide, anything else non-alphanumeric is dropped.
pub fn sanitize_logical_id(name: &str) -> String {
    name.replace('@', "AT")
        .replace('.', "DOT")
        .replace('-', "HYPHEN")
        .replace('_', "UNDRSC")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
