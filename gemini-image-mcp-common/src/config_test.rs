//! Property-based tests for the configuration module.
//!
//! These tests drive `Config::from_lookup` with in-memory variable maps so no
//! process environment has to be mutated.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::config::{API_BASE_URL_VAR, API_KEY_VAR, AUTH_TOKEN_VAR, Config, DEFAULT_API_BASE_URL};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

/// Strategy for generating plausible API keys
fn api_key_strategy() -> impl Strategy<Value = String> {
    "AIza[A-Za-z0-9_-]{20,35}"
}

/// Strategy for generating model identifiers
fn model_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{3,30}"
}

#[cfg(test)]
mod config_logic_tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert!(config.auth_token.is_none());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "secret-key"),
            (API_BASE_URL_VAR, "http://127.0.0.1:9000/v1beta/models"),
            (AUTH_TOKEN_VAR, "gate"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret-key"));
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/v1beta/models");
        assert_eq!(config.auth_token.as_deref(), Some("gate"));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "   "),
            (AUTH_TOKEN_VAR, ""),
            (API_BASE_URL_VAR, ""),
        ]))
        .unwrap();

        assert!(config.api_key.is_none());
        assert!(config.auth_token.is_none());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config =
            Config::from_lookup(lookup(&[(API_BASE_URL_VAR, "https://proxy.example.com/models/")]))
                .unwrap();
        assert_eq!(config.api_base_url, "https://proxy.example.com/models");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let result = Config::from_lookup(lookup(&[(API_BASE_URL_VAR, "ftp://example.com")]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains(API_BASE_URL_VAR));
    }

    #[test]
    fn generate_content_endpoint_formats_correctly() {
        let config = Config::with_api_key("k");
        assert_eq!(
            config.generate_content_endpoint("gemini-2.5-flash-image"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = Config::with_api_key("super-secret-key");
        config.auth_token = Some("bearer-secret".to_string());

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super-secret-key"));
        assert!(!debug_str.contains("bearer-secret"));
        assert!(debug_str.contains("redacted"));
        assert!(debug_str.contains(DEFAULT_API_BASE_URL));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        /// Any non-empty API key is preserved exactly.
        #[test]
        fn config_preserves_api_key(key in api_key_strategy()) {
            let config = Config::from_lookup(lookup(&[(API_KEY_VAR, key.as_str())])).unwrap();
            prop_assert_eq!(config.api_key, Some(key));
        }

        /// The endpoint always ends with `{model}:generateContent` under the base URL.
        #[test]
        fn endpoint_includes_model(key in api_key_strategy(), model in model_strategy()) {
            let config = Config::with_api_key(key);
            let endpoint = config.generate_content_endpoint(&model);

            prop_assert!(endpoint.starts_with(DEFAULT_API_BASE_URL));
            let expected_suffix = format!("/{}:generateContent", model);
            prop_assert!(endpoint.ends_with(&expected_suffix));
        }
    }
}
