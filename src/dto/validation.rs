//! Validation helpers for inbound WebSocket payloads.

use validator::ValidationError;

/// Longest option identifier accepted from a client.
pub const MAX_OPTION_ID_LEN: usize = 64;

/// Validates that an option id is 1 to [`MAX_OPTION_ID_LEN`] characters.
///
/// Whether the id names a real option is up to the poll store, which answers
/// unknown ids with an error reply.
///
/// # Examples
///
/// ```ignore
/// validate_option_id("friend-choose") // Ok
/// validate_option_id("")              // Err - empty
/// validate_option_id("movie night")   // Ok, rejected later as unknown
/// ```
pub fn validate_option_id(id: &str) -> Result<(), ValidationError> {
    let length = id.chars().count();
    if length == 0 || length > MAX_OPTION_ID_LEN {
        let mut err = ValidationError::new("option_id_length");
        err.message = Some(
            format!("Option id must be 1 to {MAX_OPTION_ID_LEN} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_option_id_valid() {
        assert!(validate_option_id("movie").is_ok());
        assert!(validate_option_id("friend-choose").is_ok());
        assert!(validate_option_id("concert").is_ok()); // unknown ids are the store's call
    }

    #[test]
    fn test_validate_option_id_invalid_length() {
        assert!(validate_option_id("").is_err());
        assert!(validate_option_id(&"x".repeat(MAX_OPTION_ID_LEN + 1)).is_err());
        assert!(validate_option_id(&"x".repeat(MAX_OPTION_ID_LEN)).is_ok());
    }

    #[test]
    fn test_validate_option_id_leaves_content_to_store() {
        assert!(validate_option_id("movie night").is_ok());
        assert!(validate_option_id(" movie").is_ok());
        assert!(validate_option_id("movie\n").is_ok());
    }
}
