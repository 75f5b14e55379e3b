//! Argument checks run before any request is sent.

use crate::error::{ApiError, ApiResult};
use purlhub_types::text::{sanitize, trim_slashes};
use validator::ValidateEmail;

/// Sanitizes a name or path and requires something to be left.
pub(crate) fn require_path(raw: &str, what: &str) -> ApiResult<String> {
    let value = trim_slashes(raw);
    if value.is_empty() {
        return Err(ApiError::InvalidArgument(format!("A {what} is required!")));
    }
    Ok(value)
}

/// Sanitizes an object identifier and requires it to be non-empty.
pub(crate) fn require_purl_code(raw: &str) -> ApiResult<String> {
    let code = sanitize(raw);
    if code.is_empty() {
        return Err(ApiError::InvalidArgument(
            "A purlCode is required!".to_string(),
        ));
    }
    Ok(code)
}

/// Like [`require_purl_code`], additionally rejecting email-shaped values:
/// object identifiers and email lookups are disjoint namespaces.
pub(crate) fn require_lookup_code(raw: &str) -> ApiResult<String> {
    let code = require_purl_code(raw)?;
    if code.validate_email() {
        return Err(ApiError::InvalidArgument(format!(
            "A purlCode is required! {code:?} is an email address"
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_path_trims_and_rejects_empty() {
        assert_eq!(require_path("/default/Sales/", "node path").unwrap(), "default/Sales");
        let err = require_path(" / ", "node path").unwrap_err();
        assert!(err.to_string().contains("node path is required"));
    }

    #[test]
    fn require_purl_code_sanitizes() {
        assert_eq!(require_purl_code(" JaneDoe\n").unwrap(), "JaneDoe");
        assert!(matches!(require_purl_code(""), Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn lookup_code_rejects_email_addresses() {
        assert!(matches!(
            require_lookup_code("user@example.com"),
            Err(ApiError::InvalidArgument(_))
        ));
        assert_eq!(require_lookup_code("TestUser123").unwrap(), "TestUser123");
    }
}
