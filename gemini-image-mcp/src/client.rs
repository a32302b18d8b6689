//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One POST per call, no retries. The API key travels in the
//! `x-goog-api-key` header and is checked before any request is sent.

use crate::request::GenerateContentRequest;
use crate::response::GenerateContentResponse;
use async_trait::async_trait;
use gemini_image_mcp_common::config::{API_KEY_VAR, Config};
use gemini_image_mcp_common::error::Error;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// The remote side of an image generation call.
#[async_trait]
pub trait ImageGenerationApi: Send + Sync {
    /// Send one `generateContent` request for `model`.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, Error>;
}

/// Error body returned by the Gemini API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<i64>,
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Extract the upstream message from an error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => {
            debug!(
                code = ?parsed.error.code,
                status = ?parsed.error.status,
                "Parsed Gemini error body"
            );
            parsed.error.message
        }
        Err(_) => body.to_string(),
    }
}

/// Gemini API client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: Config,
}

impl GeminiClient {
    /// Create a client from configuration.
    pub fn new(config: Config) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    /// Create a client with a caller-supplied HTTP client.
    pub fn with_http(config: Config, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    /// The `generateContent` URL for a model.
    pub fn endpoint(&self, model: &str) -> String {
        self.config.generate_content_endpoint(model)
    }
}

#[async_trait]
impl ImageGenerationApi for GeminiClient {
    #[instrument(level = "debug", name = "gemini_generate_content", skip(self, request))]
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, Error> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::precondition(format!(
                "{} is not set. Provide a Gemini API key to use the image tools.",
                API_KEY_VAR
            ))
        })?;

        let endpoint = self.endpoint(model);
        debug!(endpoint = %endpoint, "Calling Gemini API");

        let response = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::api(&endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let message = format!("Failed to read response: {}", e);
            Error::api(&endpoint, status.as_u16(), message)
        })?;

        if !status.is_success() {
            let message = api_error_message(&body);
            warn!(status = status.as_u16(), message = %message, "Gemini API returned an error");
            return Err(Error::api(&endpoint, status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::api(
                &endpoint,
                status.as_u16(),
                format!("Failed to parse response: {}", e),
            )
        })
    }
}
