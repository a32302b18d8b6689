//! Model definitions and registry for Gemini image models.
//!
//! This module provides the static model definitions and a registry for
//! resolving model identifiers to their capabilities.

use serde::Serialize;

/// Aspect ratios accepted by every image model.
pub const SUPPORTED_ASPECT_RATIOS: &[&str] = &[
    "1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9",
];

/// Output resolutions (only honoured by models with `supports_resolution`).
pub const SUPPORTED_RESOLUTIONS: &[&str] = &["1K", "2K", "4K"];

/// Gemini image model definition.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageModel {
    /// Full model identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// Whether `resolution` is forwarded to the API
    pub supports_resolution: bool,
    /// Whether Google Search grounding is forwarded to the API
    pub supports_google_search: bool,
    /// Maximum number of reference images per request
    pub max_reference_images: usize,
    /// Supported aspect ratios
    pub supported_aspect_ratios: &'static [&'static str],
    /// Supported output resolutions
    pub supported_resolutions: &'static [&'static str],
}

// =============================================================================
// Static Model Definitions
// =============================================================================

/// Gemini 3 Pro Image (preview), the higher-capability model.
pub const GEMINI_3_PRO_IMAGE_PREVIEW: ImageModel = ImageModel {
    id: "gemini-3-pro-image-preview",
    name: "Gemini 3 Pro Image",
    description: "High-fidelity generation with up to 4K output, Google Search grounding \
                  and composition of up to 14 reference images",
    supports_resolution: true,
    supports_google_search: true,
    max_reference_images: 14,
    supported_aspect_ratios: SUPPORTED_ASPECT_RATIOS,
    supported_resolutions: SUPPORTED_RESOLUTIONS,
};

/// Gemini 2.5 Flash Image, the fast base-tier model.
pub const GEMINI_2_5_FLASH_IMAGE: ImageModel = ImageModel {
    id: "gemini-2.5-flash-image",
    name: "Gemini 2.5 Flash Image",
    description: "Fast, low-latency generation and single-image editing at the default resolution",
    supports_resolution: false,
    supports_google_search: false,
    max_reference_images: 1,
    supported_aspect_ratios: SUPPORTED_ASPECT_RATIOS,
    supported_resolutions: &[],
};

/// All available image models. The first entry is the default.
pub const IMAGE_MODELS: &[ImageModel] = &[GEMINI_3_PRO_IMAGE_PREVIEW, GEMINI_2_5_FLASH_IMAGE];

/// Model used when a tool call does not select one, and the only model
/// available for composition.
pub const DEFAULT_IMAGE_MODEL: &ImageModel = &GEMINI_3_PRO_IMAGE_PREVIEW;

/// Registry for resolving model identifiers.
pub struct ModelRegistry;

impl ModelRegistry {
    /// Resolve an exact model identifier. Matching is case-sensitive.
    pub fn resolve(id: &str) -> Option<&'static ImageModel> {
        IMAGE_MODELS.iter().find(|m| m.id == id)
    }

    /// All known model identifiers, default first.
    pub fn ids() -> Vec<&'static str> {
        IMAGE_MODELS.iter().map(|m| m.id).collect()
    }
}

impl ImageModel {
    /// Whether this is the default (higher-capability) model.
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_IMAGE_MODEL.id
    }
}
