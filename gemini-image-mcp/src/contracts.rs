//! Input contracts for the image tools.
//!
//! Every tool call is checked here before a request is built. Arguments go
//! through three gates, in order:
//!
//! 1. a closed-set check on the top-level keys ([`reject_unknown_fields`]),
//! 2. typed deserialization (nested payloads also deny unknown fields),
//! 3. the per-tool [`ToolContract::validate`] rules.
//!
//! The first failing constraint is reported as a single `Error::Validation`.

use crate::request::{GenerationRequest, ReferenceImage};
use gemini_image_mcp_common::error::Error;
use gemini_image_mcp_common::models::{
    DEFAULT_IMAGE_MODEL, ImageModel, ModelRegistry, SUPPORTED_ASPECT_RATIOS,
    SUPPORTED_RESOLUTIONS,
};
use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Maximum prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 10_000;

/// Minimum number of images accepted by `compose_images`.
pub const MIN_COMPOSE_IMAGES: usize = 1;

/// Maximum number of images accepted by `compose_images`.
pub const MAX_COMPOSE_IMAGES: usize = 14;

/// Accepted MIME types for input images.
pub const VALID_IMAGE_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

/// Raw tool arguments as received over MCP.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Validation error details for tool parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::validation(err.to_string())
    }
}

/// An image supplied inline as base64 data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImagePayload {
    /// Base64-encoded image data (no data: URL prefix).
    pub base64: String,
    /// MIME type: image/png, image/jpeg, image/jpg, image/gif or image/webp.
    pub mime_type: String,
}

impl From<ImagePayload> for ReferenceImage {
    fn from(image: ImagePayload) -> Self {
        Self {
            data: image.base64,
            mime_type: image.mime_type,
        }
    }
}

/// Parameters of `generate_image`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateImageParams {
    /// Text description of the image to generate (1-10000 characters).
    pub prompt: String,
    /// Model to use: "gemini-3-pro-image-preview" (default) or "gemini-2.5-flash-image".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Aspect ratio: 1:1, 2:3, 3:2, 3:4, 4:3, 4:5, 5:4, 9:16, 16:9 or 21:9.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Output resolution: 1K, 2K or 4K (gemini-3-pro-image-preview only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Ground generation in Google Search results (gemini-3-pro-image-preview only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_google_search: Option<bool>,
}

/// Parameters of `edit_image`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EditImageParams {
    /// Instructions describing how to edit the image (1-10000 characters).
    pub prompt: String,
    /// The image to edit.
    pub image: ImagePayload,
    /// Model to use: "gemini-3-pro-image-preview" (default) or "gemini-2.5-flash-image".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Aspect ratio: 1:1, 2:3, 3:2, 3:4, 4:3, 4:5, 5:4, 9:16, 16:9 or 21:9.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Output resolution: 1K, 2K or 4K (gemini-3-pro-image-preview only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Ground generation in Google Search results (gemini-3-pro-image-preview only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_google_search: Option<bool>,
}

/// Parameters of `compose_images`. Always uses gemini-3-pro-image-preview.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComposeImagesParams {
    /// Instructions describing how to combine the images (1-10000 characters).
    pub prompt: String,
    /// Reference images in the order they should be considered (1-14).
    pub images: Vec<ImagePayload>,
    /// Model id. Only gemini-3-pro-image-preview is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "compose_model_schema")]
    pub model: Option<String>,
    /// Aspect ratio: 1:1, 2:3, 3:2, 3:4, 4:3, 4:5, 5:4, 9:16, 16:9 or 21:9.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Output resolution: 1K, 2K or 4K.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Ground generation in Google Search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_google_search: Option<bool>,
}

/// Contract shared by the three image tools.
pub trait ToolContract: DeserializeOwned + Sized {
    /// The closed set of accepted top-level keys.
    const FIELDS: &'static [&'static str];

    /// Check the deserialized parameters, stopping at the first violation.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Convert validated parameters into the semantic request.
    fn into_request(self) -> GenerationRequest;
}

impl ToolContract for GenerateImageParams {
    const FIELDS: &'static [&'static str] =
        &["prompt", "model", "aspectRatio", "resolution", "useGoogleSearch"];

    fn validate(&self) -> Result<(), ValidationError> {
        validate_prompt(&self.prompt)?;
        validate_model(self.model.as_deref())?;
        validate_options(self.aspect_ratio.as_deref(), self.resolution.as_deref())
    }

    fn into_request(self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt,
            model: resolve_model(self.model.as_deref()),
            aspect_ratio: self.aspect_ratio,
            resolution: self.resolution,
            use_google_search: self.use_google_search.unwrap_or(false),
            reference_images: Vec::new(),
        }
    }
}

impl ToolContract for EditImageParams {
    const FIELDS: &'static [&'static str] = &[
        "prompt",
        "image",
        "model",
        "aspectRatio",
        "resolution",
        "useGoogleSearch",
    ];

    fn validate(&self) -> Result<(), ValidationError> {
        validate_prompt(&self.prompt)?;
        validate_image("image", &self.image)?;
        validate_model(self.model.as_deref())?;
        validate_options(self.aspect_ratio.as_deref(), self.resolution.as_deref())
    }

    fn into_request(self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt,
            model: resolve_model(self.model.as_deref()),
            aspect_ratio: self.aspect_ratio,
            resolution: self.resolution,
            use_google_search: self.use_google_search.unwrap_or(false),
            reference_images: vec![self.image.into()],
        }
    }
}

impl ToolContract for ComposeImagesParams {
    const FIELDS: &'static [&'static str] = &[
        "prompt",
        "images",
        "model",
        "aspectRatio",
        "resolution",
        "useGoogleSearch",
    ];

    fn validate(&self) -> Result<(), ValidationError> {
        validate_prompt(&self.prompt)?;

        let count = self.images.len();
        if !(MIN_COMPOSE_IMAGES..=MAX_COMPOSE_IMAGES).contains(&count) {
            return Err(ValidationError::new(
                "images",
                format!(
                    "Expected between {} and {} images, got {}",
                    MIN_COMPOSE_IMAGES, MAX_COMPOSE_IMAGES, count
                ),
            ));
        }
        for (i, image) in self.images.iter().enumerate() {
            validate_image(&format!("images[{}]", i), image)?;
        }

        match self.model.as_deref() {
            Some(id) if id != DEFAULT_IMAGE_MODEL.id => {
                return Err(ValidationError::new(
                    "model",
                    format!(
                        "compose_images only supports '{}', got '{}'",
                        DEFAULT_IMAGE_MODEL.id, id
                    ),
                ));
            }
            _ => {}
        }

        validate_options(self.aspect_ratio.as_deref(), self.resolution.as_deref())
    }

    fn into_request(self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt,
            model: DEFAULT_IMAGE_MODEL,
            aspect_ratio: self.aspect_ratio,
            resolution: self.resolution,
            use_google_search: self.use_google_search.unwrap_or(false),
            reference_images: self.images.into_iter().map(ReferenceImage::from).collect(),
        }
    }
}

/// Run all three gates and produce the semantic request.
pub fn parse_request<T: ToolContract>(args: &JsonObject) -> Result<GenerationRequest, Error> {
    reject_unknown_fields(args, T::FIELDS)?;

    let params: T = serde_json::from_value(serde_json::Value::Object(args.clone()))
        .map_err(|e| Error::validation(format!("Invalid parameters: {}", e)))?;
    params.validate()?;

    Ok(params.into_request())
}

/// Reject any top-level key outside `allowed`.
pub fn reject_unknown_fields(args: &JsonObject, allowed: &[&str]) -> Result<(), ValidationError> {
    let unknown: Vec<&str> = args
        .keys()
        .map(String::as_str)
        .filter(|key| !allowed.contains(key))
        .collect();

    match unknown.first() {
        None => Ok(()),
        Some(first) => Err(ValidationError::new(
            *first,
            format!(
                "Unrecognized key(s) {}. Valid keys: {}",
                unknown
                    .iter()
                    .map(|k| format!("'{}'", k))
                    .collect::<Vec<_>>()
                    .join(", "),
                allowed.join(", ")
            ),
        )),
    }
}

fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.is_empty() {
        return Err(ValidationError::new("prompt", "Prompt cannot be empty"));
    }

    let chars = prompt.chars().count();
    if chars > MAX_PROMPT_CHARS {
        return Err(ValidationError::new(
            "prompt",
            format!(
                "Prompt length {} exceeds maximum {} characters",
                chars, MAX_PROMPT_CHARS
            ),
        ));
    }
    Ok(())
}

fn validate_model(model: Option<&str>) -> Result<(), ValidationError> {
    match model {
        Some(id) if ModelRegistry::resolve(id).is_none() => Err(ValidationError::new(
            "model",
            format!(
                "Unknown model '{}'. Valid models: {}",
                id,
                ModelRegistry::ids().join(", ")
            ),
        )),
        _ => Ok(()),
    }
}

fn validate_options(
    aspect_ratio: Option<&str>,
    resolution: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(ratio) = aspect_ratio {
        if !SUPPORTED_ASPECT_RATIOS.contains(&ratio) {
            return Err(ValidationError::new(
                "aspectRatio",
                format!(
                    "Invalid aspect ratio '{}'. Valid options: {}",
                    ratio,
                    SUPPORTED_ASPECT_RATIOS.join(", ")
                ),
            ));
        }
    }

    if let Some(resolution) = resolution {
        if !SUPPORTED_RESOLUTIONS.contains(&resolution) {
            return Err(ValidationError::new(
                "resolution",
                format!(
                    "Invalid resolution '{}'. Valid options: {}",
                    resolution,
                    SUPPORTED_RESOLUTIONS.join(", ")
                ),
            ));
        }
    }
    Ok(())
}

fn validate_image(field: &str, image: &ImagePayload) -> Result<(), ValidationError> {
    if image.base64.is_empty() {
        return Err(ValidationError::new(
            format!("{}.base64", field),
            "Image data cannot be empty",
        ));
    }
    if !VALID_IMAGE_MIME_TYPES.contains(&image.mime_type.as_str()) {
        return Err(ValidationError::new(
            format!("{}.mimeType", field),
            format!(
                "Invalid MIME type '{}'. Valid options: {}",
                image.mime_type,
                VALID_IMAGE_MIME_TYPES.join(", ")
            ),
        ));
    }
    Ok(())
}

/// Schema for the compose `model` field: a string fixed to the Pro id.
fn compose_model_schema(_: &mut SchemaGenerator) -> Schema {
    SchemaObject {
        instance_type: Some(InstanceType::String.into()),
        enum_values: Some(vec![DEFAULT_IMAGE_MODEL.id.into()]),
        ..Default::default()
    }
    .into()
}

fn resolve_model(model: Option<&str>) -> &'static ImageModel {
    model
        .and_then(ModelRegistry::resolve)
        .unwrap_or(DEFAULT_IMAGE_MODEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini_image_mcp_common::models::GEMINI_2_5_FLASH_IMAGE;
    use serde_json::json;

    fn args(value: serde_json::Value) -> JsonObject {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    fn png(data: &str) -> serde_json::Value {
        json!({"base64": data, "mimeType": "image/png"})
    }

    fn validation_message(result: Result<GenerationRequest, Error>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_defaults_to_pro_model() {
        let request =
            parse_request::<GenerateImageParams>(&args(json!({"prompt": "a cat"}))).unwrap();
        assert_eq!(request.model, DEFAULT_IMAGE_MODEL);
        assert!(request.aspect_ratio.is_none());
        assert!(request.resolution.is_none());
        assert!(!request.use_google_search);
        assert!(request.reference_images.is_empty());
    }

    #[test]
    fn test_generate_with_all_options() {
        let request = parse_request::<GenerateImageParams>(&args(json!({
            "prompt": "a cat",
            "model": "gemini-2.5-flash-image",
            "aspectRatio": "21:9",
            "resolution": "2K",
            "useGoogleSearch": true
        })))
        .unwrap();

        assert_eq!(request.model, &GEMINI_2_5_FLASH_IMAGE);
        assert_eq!(request.aspect_ratio.as_deref(), Some("21:9"));
        assert_eq!(request.resolution.as_deref(), Some("2K"));
        assert!(request.use_google_search);
    }

    #[test]
    fn test_prompt_boundaries() {
        let empty = parse_request::<GenerateImageParams>(&args(json!({"prompt": ""})));
        assert!(validation_message(empty).contains("prompt"));

        let max = "a".repeat(MAX_PROMPT_CHARS);
        assert!(parse_request::<GenerateImageParams>(&args(json!({"prompt": max}))).is_ok());

        let over = "a".repeat(MAX_PROMPT_CHARS + 1);
        let msg = validation_message(parse_request::<GenerateImageParams>(&args(
            json!({"prompt": over}),
        )));
        assert!(msg.contains("exceeds maximum 10000"), "{}", msg);
    }

    #[test]
    fn test_prompt_length_counts_characters_not_bytes() {
        // 10000 multi-byte characters is still within the limit.
        let prompt = "é".repeat(MAX_PROMPT_CHARS);
        assert!(prompt.len() > MAX_PROMPT_CHARS);
        assert!(parse_request::<GenerateImageParams>(&args(json!({"prompt": prompt}))).is_ok());
    }

    #[test]
    fn test_missing_prompt_is_rejected() {
        let msg = validation_message(parse_request::<GenerateImageParams>(&args(json!({}))));
        assert!(msg.contains("prompt"), "{}", msg);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let msg = validation_message(parse_request::<GenerateImageParams>(&args(json!({
            "prompt": "a cat",
            "model": "imagen-4"
        }))));
        assert!(msg.starts_with("model: Unknown model 'imagen-4'"), "{}", msg);
        assert!(msg.contains("gemini-3-pro-image-preview"));
    }

    #[test]
    fn test_all_aspect_ratios_accepted() {
        for ratio in SUPPORTED_ASPECT_RATIOS {
            let result = parse_request::<GenerateImageParams>(&args(json!({
                "prompt": "a cat",
                "aspectRatio": ratio
            })));
            assert!(result.is_ok(), "Aspect ratio {} should be valid", ratio);
        }
    }

    #[test]
    fn test_invalid_aspect_ratio() {
        let msg = validation_message(parse_request::<GenerateImageParams>(&args(json!({
            "prompt": "a cat",
            "aspectRatio": "2:1"
        }))));
        assert!(msg.starts_with("aspectRatio:"), "{}", msg);
        assert!(msg.contains("Valid options"));
    }

    #[test]
    fn test_resolution_is_case_sensitive() {
        for bad in ["1k", "4k", "8K", ""] {
            let msg = validation_message(parse_request::<GenerateImageParams>(&args(json!({
                "prompt": "a cat",
                "resolution": bad
            }))));
            assert!(msg.starts_with("resolution:"), "{}", msg);
        }
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let msg = validation_message(parse_request::<GenerateImageParams>(&args(json!({
            "prompt": "a cat",
            "negativePrompt": "dogs"
        }))));
        assert!(msg.contains("'negativePrompt'"), "{}", msg);
        assert!(msg.contains("Unrecognized"));
    }

    #[test]
    fn test_compose_accepts_only_pro_model() {
        let request = parse_request::<ComposeImagesParams>(&args(json!({
            "prompt": "combine",
            "images": [png("AAAA")],
            "model": "gemini-3-pro-image-preview"
        })))
        .unwrap();
        assert_eq!(request.model, DEFAULT_IMAGE_MODEL);

        let msg = validation_message(parse_request::<ComposeImagesParams>(&args(json!({
            "prompt": "combine",
            "images": [png("AAAA")],
            "model": "gemini-2.5-flash-image"
        }))));
        assert!(msg.starts_with("model:"), "{}", msg);
        assert!(msg.contains("only supports 'gemini-3-pro-image-preview'"), "{}", msg);
    }

    #[test]
    fn test_compose_model_schema_allows_only_pro() {
        let schema = serde_json::to_value(schemars::schema_for!(ComposeImagesParams)).unwrap();
        let model = &schema["properties"]["model"];
        assert_eq!(model["enum"], json!(["gemini-3-pro-image-preview"]));
        assert_eq!(model["type"], "string");
        let required = schema["required"].as_array().cloned().unwrap_or_default();
        assert!(!required.contains(&json!("model")));
    }

    #[test]
    fn test_unknown_nested_key_is_rejected() {
        let msg = validation_message(parse_request::<EditImageParams>(&args(json!({
            "prompt": "make it blue",
            "image": {"base64": "AAAA", "mimeType": "image/png", "url": "http://x"}
        }))));
        assert!(msg.contains("url"), "{}", msg);
    }

    #[test]
    fn test_edit_builds_single_reference_image() {
        let request = parse_request::<EditImageParams>(&args(json!({
            "prompt": "make it blue",
            "image": {"base64": "AAAA", "mimeType": "image/webp"},
            "model": "gemini-2.5-flash-image"
        })))
        .unwrap();

        assert_eq!(request.model.id, "gemini-2.5-flash-image");
        assert_eq!(
            request.reference_images,
            vec![ReferenceImage {
                data: "AAAA".to_string(),
                mime_type: "image/webp".to_string()
            }]
        );
    }

    #[test]
    fn test_edit_rejects_empty_base64() {
        let msg = validation_message(parse_request::<EditImageParams>(&args(json!({
            "prompt": "make it blue",
            "image": {"base64": "", "mimeType": "image/png"}
        }))));
        assert!(msg.starts_with("image.base64:"), "{}", msg);
    }

    #[test]
    fn test_all_mime_types_accepted() {
        for mime in VALID_IMAGE_MIME_TYPES {
            let result = parse_request::<EditImageParams>(&args(json!({
                "prompt": "edit",
                "image": {"base64": "AAAA", "mimeType": mime}
            })));
            assert!(result.is_ok(), "MIME type {} should be valid", mime);
        }
    }

    #[test]
    fn test_compose_image_count_boundaries() {
        let images = |n: usize| (0..n).map(|i| png(&format!("IMG{}", i))).collect::<Vec<_>>();

        let compose = |n: usize| {
            parse_request::<ComposeImagesParams>(&args(json!({"prompt": "p", "images": images(n)})))
        };

        let zero = compose(0);
        assert!(validation_message(zero).starts_with("images:"));

        let fourteen = compose(14);
        assert_eq!(fourteen.unwrap().reference_images.len(), 14);

        let fifteen = compose(15);
        let msg = validation_message(fifteen);
        assert!(msg.contains("between 1 and 14"), "{}", msg);
        assert!(msg.contains("got 15"), "{}", msg);
    }

    #[test]
    fn test_compose_is_fixed_to_pro_and_keeps_order() {
        let request = parse_request::<ComposeImagesParams>(&args(json!({
            "prompt": "combine",
            "images": [png("A"), png("B"), png("C")]
        })))
        .unwrap();

        assert_eq!(request.model, DEFAULT_IMAGE_MODEL);
        let data: Vec<&str> = request.reference_images.iter().map(|i| i.data.as_str()).collect();
        assert_eq!(data, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_compose_reports_offending_image_index() {
        let msg = validation_message(parse_request::<ComposeImagesParams>(&args(json!({
            "prompt": "combine",
            "images": [png("A"), {"base64": "B", "mimeType": "image/bmp"}]
        }))));
        assert!(msg.starts_with("images[1].mimeType:"), "{}", msg);
    }

    #[test]
    fn test_first_failing_constraint_is_reported() {
        // Both prompt and aspect ratio are invalid; prompt is checked first.
        let msg = validation_message(parse_request::<GenerateImageParams>(&args(json!({
            "prompt": "",
            "aspectRatio": "bogus"
        }))));
        assert!(msg.starts_with("prompt:"), "{}", msg);
        assert!(!msg.contains("aspectRatio"));
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::new("prompt", "cannot be empty");
        assert_eq!(error.to_string(), "prompt: cannot be empty");
    }
}
