//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;

/// Default base URL of the Gemini model API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable overriding the API base URL.
pub const API_BASE_URL_VAR: &str = "GEMINI_API_BASE_URL";

/// Environment variable holding the bearer token required by HTTP transports.
pub const AUTH_TOKEN_VAR: &str = "MCP_AUTH_TOKEN";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Gemini API key. Checked per call rather than at startup.
    pub api_key: Option<String>,
    /// Base URL that model identifiers are appended to
    pub api_base_url: String,
    /// Bearer token gating the HTTP/SSE transports
    pub auth_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if `GEMINI_API_BASE_URL` is not an
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = match get(API_BASE_URL_VAR) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) => {
                return Err(ConfigError::invalid_value(
                    API_BASE_URL_VAR,
                    format!("'{}' is not an http(s) URL", url),
                ));
            }
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        Ok(Self {
            api_key: get(API_KEY_VAR),
            api_base_url,
            auth_token: get(AUTH_TOKEN_VAR),
        })
    }

    /// Configuration with an explicit API key and the default endpoint.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
        }
    }

    /// Get the `generateContent` endpoint URL for a given model.
    pub fn generate_content_endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.api_base_url, model)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
