//! Image tool handler.
//!
//! This module provides the `ImageHandler` struct, the tool-invocation
//! boundary for the three image tools. Every call ends in a [`ToolOutcome`];
//! failures are caught here and never propagate to the transport.

use crate::client::{GeminiClient, ImageGenerationApi};
use crate::contracts::{
    ComposeImagesParams, EditImageParams, GenerateImageParams, JsonObject, parse_request,
};
use crate::request::{GenerationRequest, build_request};
use crate::response::{NormalizedResult, normalize};
use gemini_image_mcp_common::config::Config;
use gemini_image_mcp_common::error::Error;
use gemini_image_mcp_common::models::DEFAULT_IMAGE_MODEL;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// =============================================================================
// Tools
// =============================================================================

/// The image tools served by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTool {
    Generate,
    Edit,
    Compose,
}

impl ImageTool {
    /// All image tools, in listing order.
    pub const ALL: [ImageTool; 3] = [ImageTool::Generate, ImageTool::Edit, ImageTool::Compose];

    /// Look up a tool by its MCP name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// The MCP tool name.
    pub fn name(&self) -> &'static str {
        match self {
            ImageTool::Generate => "generate_image",
            ImageTool::Edit => "edit_image",
            ImageTool::Compose => "compose_images",
        }
    }

    /// Static advice shown ahead of the upstream message when a call fails.
    pub fn guidance(&self) -> &'static str {
        match self {
            ImageTool::Generate => {
                "Image generation failed. Check that GEMINI_API_KEY is set and valid, \
                 and that the prompt complies with the content policy."
            }
            ImageTool::Edit => {
                "Image editing failed. Check that GEMINI_API_KEY is set and valid, \
                 that the image is valid base64 in a supported format, and that the \
                 instructions comply with the content policy."
            }
            ImageTool::Compose => {
                "Image composition failed. Check that GEMINI_API_KEY is set and valid, \
                 that 1 to 14 valid base64 images were supplied, and that the prompt \
                 complies with the content policy."
            }
        }
    }

    /// The user-facing text of a failed call.
    pub fn failure_text(&self, message: &str) -> String {
        format!("{}\n\nError: {}", self.guidance(), message)
    }

    fn parse(&self, args: &JsonObject) -> Result<GenerationRequest, Error> {
        match self {
            ImageTool::Generate => parse_request::<GenerateImageParams>(args),
            ImageTool::Edit => parse_request::<EditImageParams>(args),
            ImageTool::Compose => parse_request::<ComposeImagesParams>(args),
        }
    }

    /// Model id to report when the arguments never made it to a request.
    fn reported_model(&self, args: &JsonObject) -> String {
        match self {
            ImageTool::Compose => DEFAULT_IMAGE_MODEL.id.to_string(),
            _ => args
                .get("model")
                .and_then(serde_json::Value::as_str)
                .unwrap_or(DEFAULT_IMAGE_MODEL.id)
                .to_string(),
        }
    }
}

impl std::fmt::Display for ImageTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Result of one tool invocation, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutcome {
    pub success: bool,
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    fn succeeded(
        model: impl Into<String>,
        prompt: impl Into<String>,
        result: NormalizedResult,
    ) -> Self {
        Self {
            success: true,
            model: model.into(),
            prompt: prompt.into(),
            image_data: result.image_data,
            mime_type: result.mime_type,
            text: result.text,
            error: None,
        }
    }

    fn failed(model: impl Into<String>, prompt: impl Into<String>, error: &Error) -> Self {
        Self {
            success: false,
            model: model.into(),
            prompt: prompt.into(),
            image_data: None,
            mime_type: None,
            text: None,
            error: Some(error.user_message()),
        }
    }

    /// True for a successful call that produced neither image nor text.
    pub fn is_empty(&self) -> bool {
        self.success && self.image_data.is_none() && self.text.is_none()
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Runs image tools against the Gemini API.
#[derive(Clone)]
pub struct ImageHandler {
    api: Arc<dyn ImageGenerationApi>,
}

impl ImageHandler {
    /// Create a handler backed by the real Gemini client.
    pub fn new(config: Config) -> Self {
        Self::with_api(Arc::new(GeminiClient::new(config)))
    }

    /// Create a handler with a custom API implementation.
    pub fn with_api(api: Arc<dyn ImageGenerationApi>) -> Self {
        Self { api }
    }

    /// Build, send and normalize one validated request.
    #[instrument(
        level = "info",
        name = "generate",
        skip(self, request),
        fields(model = request.model.id, images = request.reference_images.len())
    )]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<NormalizedResult, Error> {
        let body = build_request(request);
        debug!(
            aspect_ratio = ?request.aspect_ratio,
            resolution = ?request.resolution,
            google_search = request.use_google_search,
            "Built generateContent request"
        );

        let response = self.api.generate_content(request.model.id, &body).await?;
        let result = normalize(response)?;

        info!(
            has_image = result.image_data.is_some(),
            has_text = result.text.is_some(),
            "Received response from Gemini API"
        );
        Ok(result)
    }

    /// Run a tool with raw MCP arguments. Never fails; errors become outcomes.
    #[instrument(level = "info", name = "invoke", skip(self, tool, args), fields(tool = %tool))]
    pub async fn invoke(&self, tool: ImageTool, args: &JsonObject) -> ToolOutcome {
        let request = match tool.parse(args) {
            Ok(request) => request,
            Err(e) => return self.failure(tool, args, e),
        };

        match self.generate(&request).await {
            Ok(result) => {
                if result.is_empty() {
                    warn!("Model returned neither image nor text");
                }
                ToolOutcome::succeeded(request.model.id, request.prompt, result)
            }
            Err(e) => {
                let model = match tool {
                    ImageTool::Compose => DEFAULT_IMAGE_MODEL.id,
                    _ => request.model.id,
                };
                warn!(kind = ?e.kind(), error = %e, "Image tool failed");
                ToolOutcome::failed(model, request.prompt, &e)
            }
        }
    }

    fn failure(&self, tool: ImageTool, args: &JsonObject, error: Error) -> ToolOutcome {
        warn!(kind = ?error.kind(), error = %error, "Rejected tool arguments");
        let prompt = args
            .get("prompt")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        ToolOutcome::failed(tool.reported_model(args), prompt, &error)
    }
}

impl std::fmt::Debug for ImageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandler").finish_non_exhaustive()
    }
}
