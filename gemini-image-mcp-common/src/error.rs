//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` so that the
//! tool-invocation boundary can classify every failure the same way.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration at startup
//! - `Error::Precondition`: The API credential is absent when a call needs it
//! - `Error::Validation`: Tool input failed an input contract
//! - `Error::Api`: Non-success HTTP status or failed request (includes endpoint and status)
//! - `Error::NoCandidates`: The model answered with zero candidates (and maybe a block reason)

use thiserror::Error;

/// Unified error type for the common library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (invalid env values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required precondition is not met (e.g. missing API key).
    ///
    /// Raised before any network attempt and never retried.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// API errors with endpoint and HTTP status context
    ///
    /// Status code `0` means the request never produced an HTTP response.
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// The model responded successfully but without any candidate.
    #[error("No candidates returned from the model{}", blocked_suffix(.block_reason))]
    NoCandidates {
        /// `promptFeedback.blockReason`, when the prompt was blocked
        block_reason: Option<String>,
    },
}

fn blocked_suffix(block_reason: &Option<String>) -> String {
    match block_reason {
        Some(reason) => format!(" (blocked: {})", reason),
        None => String::new(),
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Startup configuration problem
    Config,
    /// Missing credential
    Precondition,
    /// Rejected tool input
    Validation,
    /// Upstream HTTP failure or unusable upstream response
    Transport,
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::api(
    ///     "https://api.example.com/v1beta/models/m:generateContent",
    ///     500,
    ///     "Internal server error"
    /// );
    /// assert!(err.to_string().contains("api.example.com"));
    /// assert!(err.to_string().contains("500"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::validation("prompt cannot be empty");
    /// assert!(err.to_string().contains("prompt cannot be empty"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Precondition(_) => ErrorKind::Precondition,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Api { .. } | Error::NoCandidates { .. } => ErrorKind::Transport,
        }
    }

    /// Human-readable description for tool callers.
    ///
    /// Carries the upstream message verbatim. API errors keep their HTTP
    /// status but drop the endpoint.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api {
                status_code: 0,
                message,
                ..
            } => message.clone(),
            Error::Api {
                status_code,
                message,
                ..
            } => format!("HTTP {}: {}", status_code, message),
            Error::Precondition(message) | Error::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
