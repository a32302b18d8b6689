//! MCP Resources for the Gemini image server.
//!
//! This module provides resource implementations for:
//! - `image://models` - List available image models and their capabilities
//! - `image://aspect_ratios` - List accepted aspect ratios

use gemini_image_mcp_common::models::{IMAGE_MODELS, ImageModel, SUPPORTED_ASPECT_RATIOS};
use serde::Serialize;

/// URI of the models resource.
pub const MODELS_URI: &str = "image://models";

/// URI of the aspect ratios resource.
pub const ASPECT_RATIOS_URI: &str = "image://aspect_ratios";

/// Information about an available image model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Model identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    pub description: &'static str,
    /// Whether this model is used when none is given
    pub is_default: bool,
    pub supports_resolution: bool,
    pub supports_google_search: bool,
    /// Maximum number of reference images per request
    pub max_reference_images: usize,
    pub supported_aspect_ratios: Vec<&'static str>,
    pub supported_resolutions: Vec<&'static str>,
}

impl From<&'static ImageModel> for ModelInfo {
    fn from(model: &'static ImageModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_default: model.is_default(),
            supports_resolution: model.supports_resolution,
            supports_google_search: model.supports_google_search,
            max_reference_images: model.max_reference_images,
            supported_aspect_ratios: model.supported_aspect_ratios.to_vec(),
            supported_resolutions: model.supported_resolutions.to_vec(),
        }
    }
}

/// Payload of the `list_models` tool.
#[derive(Debug, Clone, Serialize)]
pub struct ModelList {
    pub models: Vec<ModelInfo>,
}

/// List all available image models.
pub fn list_models() -> ModelList {
    ModelList {
        models: IMAGE_MODELS.iter().map(ModelInfo::from).collect(),
    }
}

/// Get models resource as JSON string.
pub fn models_resource_json() -> String {
    serde_json::to_string_pretty(&list_models()).unwrap_or_else(|_| "{\"models\":[]}".to_string())
}

/// Get aspect ratios resource as JSON string.
pub fn aspect_ratios_resource_json() -> String {
    serde_json::to_string_pretty(SUPPORTED_ASPECT_RATIOS).unwrap_or_else(|_| "[]".to_string())
}
