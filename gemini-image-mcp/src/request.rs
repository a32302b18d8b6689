//! Request building for the Gemini `generateContent` API.
//!
//! All three image tools reduce to [`build_request`]: the prompt text comes
//! first, followed by the reference images in input order.

use gemini_image_mcp_common::models::ImageModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Output modalities requested on every call.
pub const RESPONSE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];

// =============================================================================
// Semantic Request
// =============================================================================

/// An input image passed to the model as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    /// Base64-encoded image data, forwarded unchanged
    pub data: String,
    /// MIME type of the image
    pub mime_type: String,
}

/// A validated tool call, before it is shaped into the wire format.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: &'static ImageModel,
    pub aspect_ratio: Option<String>,
    pub resolution: Option<String>,
    pub use_google_search: bool,
    /// Images in the order the model should see them (0..=14)
    pub reference_images: Vec<ReferenceImage>,
}

// =============================================================================
// Wire Types
// =============================================================================

/// Gemini API request for image generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Content blocks
    pub contents: Vec<Content>,
    /// Generation configuration
    pub generation_config: GenerationConfig,
    /// Tool directives (search grounding only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDirective>,
}

/// Gemini content structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    /// Role of the author
    pub role: String,
    /// Ordered content parts
    pub parts: Vec<Part>,
}

/// Gemini content part (request).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text { text: String },
    /// Inline binary data
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Gemini inline data (base64 encoded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

/// Gemini generation config for image generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Response modalities, always TEXT and IMAGE
    pub response_modalities: Vec<String>,
    /// Image shape configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Gemini image configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

impl ImageConfig {
    fn is_empty(&self) -> bool {
        self.aspect_ratio.is_none() && self.image_size.is_none()
    }
}

/// A tool the model may call while generating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ToolDirective {
    /// Ground generation in Google Search results
    #[serde(rename = "googleSearch")]
    GoogleSearch(GoogleSearch),
}

/// Empty configuration object for search grounding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoogleSearch {}

// =============================================================================
// Builder
// =============================================================================

/// Shape a validated request into the `generateContent` envelope.
///
/// Resolution and search grounding are only forwarded when the model
/// supports them; otherwise they are dropped without error.
pub fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
    let model = request.model;

    let mut parts = Vec::with_capacity(1 + request.reference_images.len());
    parts.push(Part::Text {
        text: request.prompt.clone(),
    });
    parts.extend(request.reference_images.iter().map(|image| Part::InlineData {
        inline_data: InlineData {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
        },
    }));

    let image_size = match &request.resolution {
        Some(resolution) if model.supports_resolution => Some(resolution.clone()),
        Some(resolution) => {
            debug!(model = model.id, resolution = %resolution, "Dropping unsupported resolution");
            None
        }
        None => None,
    };

    let image_config = ImageConfig {
        aspect_ratio: request.aspect_ratio.clone(),
        image_size,
    };

    let mut tools = Vec::new();
    if request.use_google_search {
        if model.supports_google_search {
            tools.push(ToolDirective::GoogleSearch(GoogleSearch::default()));
        } else {
            debug!(model = model.id, "Dropping unsupported Google Search grounding");
        }
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        generation_config: GenerationConfig {
            response_modalities: RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
            image_config: (!image_config.is_empty()).then_some(image_config),
        },
        tools,
    }
}
