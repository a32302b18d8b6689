//! Property-based tests for error module.
//!
//! These tests validate that error messages keep the upstream context that
//! users need to diagnose a failed generation.

use proptest::prelude::*;

use crate::error::{Error, ErrorKind};

/// Generate valid HTTP status codes (100-599)
fn http_status_strategy() -> impl Strategy<Value = u16> {
    100u16..600u16
}

/// Generate generateContent endpoint URLs
fn endpoint_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(
        "https://[a-z]+\\.googleapis\\.com/v1beta/models/[a-z0-9.-]+:generateContent",
    )
    .unwrap()
    .prop_filter("endpoint must be non-empty", |s| !s.is_empty())
}

/// Generate error messages
fn message_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{1,100}"
}

proptest! {
    /// *For any* API error, the error message includes the endpoint that
    /// failed and the HTTP status code.
    #[test]
    fn api_error_includes_endpoint_and_status(
        endpoint in endpoint_strategy(),
        status_code in http_status_strategy(),
        message in message_strategy()
    ) {
        let err = Error::api(&endpoint, status_code, &message);
        let err_string = err.to_string();

        prop_assert!(
            err_string.contains(&endpoint),
            "API error should include endpoint '{}' in message: {}",
            endpoint,
            err_string
        );
        prop_assert!(
            err_string.contains(&status_code.to_string()),
            "API error should include status code '{}' in message: {}",
            status_code,
            err_string
        );
    }

    /// The upstream message is carried through untranslated, with its status.
    #[test]
    fn api_error_message_is_verbatim(
        status_code in http_status_strategy(),
        message in message_strategy()
    ) {
        let err = Error::api("https://example.googleapis.com", status_code, &message);
        let user_message = err.user_message();
        prop_assert!(user_message.ends_with(&message));
        prop_assert!(user_message.contains(&status_code.to_string()));
        prop_assert!(!user_message.contains("example.googleapis.com"));
        prop_assert_eq!(err.kind(), ErrorKind::Transport);
    }

    /// Validation messages are surfaced verbatim as well.
    #[test]
    fn validation_error_message_is_verbatim(message in message_strategy()) {
        let err = Error::validation(&message);
        prop_assert!(err.to_string().contains(&message));
        prop_assert_eq!(err.user_message(), message);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn api_error_format_is_readable() {
        let err = Error::api(
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-image-preview:generateContent",
            429,
            "Resource has been exhausted",
        );
        let msg = err.to_string();

        assert!(msg.contains("API error"), "Should indicate it's an API error");
        assert!(msg.contains("HTTP"), "Should mention HTTP");
        assert!(msg.contains("429"), "Should include status code");
        assert!(msg.contains("gemini-3-pro-image-preview"), "Should include endpoint");
    }

    #[test]
    fn precondition_error_format_is_readable() {
        let err = Error::precondition("GEMINI_API_KEY is not set");
        let msg = err.to_string();
        assert!(msg.contains("Precondition"));
        assert!(msg.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn no_candidates_is_distinct_from_api_error() {
        let err = Error::NoCandidates {
            block_reason: Some("PROHIBITED_CONTENT".to_string()),
        };
        assert!(!matches!(err, Error::Api { .. }));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.user_message(), err.to_string());
    }
}
