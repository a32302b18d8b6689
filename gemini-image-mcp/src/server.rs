//! MCP Server implementation for the Gemini image server.
//!
//! This module provides the MCP server handler that exposes:
//! - `generate_image` tool for text-to-image generation
//! - `edit_image` tool for editing a single image
//! - `compose_images` tool for combining up to 14 reference images
//! - `list_models` tool describing the available models
//! - Resources for models and aspect ratios

use crate::contracts::{
    ComposeImagesParams, EditImageParams, GenerateImageParams, JsonObject, reject_unknown_fields,
};
use crate::handler::{ImageHandler, ImageTool, ToolOutcome};
use crate::resources::{self, ASPECT_RATIOS_URI, MODELS_URI};
use gemini_image_mcp_common::config::Config;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, ListResourcesResult, ListToolsResult, RawResource,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    },
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the model listing tool.
pub const LIST_MODELS_TOOL: &str = "list_models";

/// Parameters of `list_models` (none).
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListModelsParams {}

/// MCP Server for Gemini image generation.
#[derive(Clone, Debug)]
pub struct ImageServer {
    handler: ImageHandler,
}

impl ImageServer {
    /// Create a new ImageServer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self::with_handler(ImageHandler::new(config))
    }

    /// Create a server around an existing handler.
    pub fn with_handler(handler: ImageHandler) -> Self {
        Self { handler }
    }

    /// Tool definitions advertised by `tools/list`.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool(
                ImageTool::Generate.name(),
                "Generate an image from a text prompt with Gemini. \
                 Defaults to gemini-3-pro-image-preview; gemini-2.5-flash-image is faster \
                 but ignores resolution and Google Search grounding. \
                 Returns the image as base64 data.",
                input_schema::<GenerateImageParams>(),
            ),
            tool(
                ImageTool::Edit.name(),
                "Edit an existing image following text instructions. \
                 The image is supplied as base64 data with its MIME type. \
                 Returns the edited image as base64 data.",
                input_schema::<EditImageParams>(),
            ),
            tool(
                ImageTool::Compose.name(),
                "Combine 1 to 14 reference images into a new image following text \
                 instructions. Images are considered in the order given. \
                 Always uses gemini-3-pro-image-preview.",
                input_schema::<ComposeImagesParams>(),
            ),
            tool(
                LIST_MODELS_TOOL,
                "List the available Gemini image models and their capabilities.",
                input_schema::<ListModelsParams>(),
            ),
        ]
    }

    /// Dispatch a tool call by name.
    pub async fn call(&self, name: &str, args: JsonObject) -> Result<CallToolResult, McpError> {
        if name == LIST_MODELS_TOOL {
            return Ok(list_models_result(&args));
        }

        let tool = ImageTool::from_name(name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {}", name), None))?;

        info!(tool = %tool, "Calling image tool");
        let outcome = self.handler.invoke(tool, &args).await;
        Ok(outcome_result(tool, &outcome))
    }
}

fn tool(name: &'static str, description: &'static str, input_schema: Arc<JsonObject>) -> Tool {
    Tool {
        name: Cow::Borrowed(name),
        description: Some(Cow::Borrowed(description)),
        input_schema,
        annotations: None,
        icons: None,
        meta: None,
        output_schema: None,
        title: None,
    }
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema).unwrap_or_default() {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

/// Package a tool outcome as an MCP result.
///
/// Failures are tool errors (`is_error`), not protocol errors.
pub fn outcome_result(tool: ImageTool, outcome: &ToolOutcome) -> CallToolResult {
    let structured = serde_json::to_value(outcome).ok();

    let mut result = if outcome.success {
        let mut content = vec![Content::text(success_summary(outcome))];
        if let (Some(data), Some(mime_type)) = (&outcome.image_data, &outcome.mime_type) {
            content.push(Content::image(data.clone(), mime_type.clone()));
        }
        CallToolResult::success(content)
    } else {
        let message = outcome.error.as_deref().unwrap_or("Unknown error");
        CallToolResult::error(vec![Content::text(tool.failure_text(message))])
    };

    result.structured_content = structured;
    result
}

fn success_summary(outcome: &ToolOutcome) -> String {
    if outcome.is_empty() {
        return format!(
            "The model ({}) returned neither an image nor text for this prompt. \
             Try rephrasing it.",
            outcome.model
        );
    }

    let mut summary = match &outcome.mime_type {
        Some(mime_type) if outcome.image_data.is_some() => {
            format!("Image generated with {} ({}).", outcome.model, mime_type)
        }
        _ => format!("The model ({}) returned text but no image.", outcome.model),
    };
    if let Some(text) = &outcome.text {
        summary.push_str("\n\n");
        summary.push_str(text);
    }
    summary
}

fn list_models_result(args: &JsonObject) -> CallToolResult {
    if let Err(e) = reject_unknown_fields(args, &[]) {
        return CallToolResult::error(vec![Content::text(e.to_string())]);
    }

    let models = resources::list_models();
    let text = Content::text(resources::models_resource_json());
    let mut result = CallToolResult::success(vec![text]);
    result.structured_content = serde_json::to_value(&models).ok();
    result
}

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    Resource {
        raw: RawResource {
            uri: uri.to_string(),
            name: name.to_string(),
            title: None,
            description: Some(description.to_string()),
            mime_type: Some("application/json".to_string()),
            size: None,
            icons: None,
            meta: None,
        },
        annotations: None,
    }
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server using the Google Gemini API. \
                 Use generate_image to create images from text, edit_image to modify an image, \
                 compose_images to combine several reference images, \
                 and list_models to see model capabilities."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: Self::tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            self.call(params.name.as_ref(), params.arguments.unwrap_or_default())
                .await
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources");

            Ok(ListResourcesResult {
                resources: vec![
                    resource(
                        MODELS_URI,
                        "Available Image Models",
                        "Gemini image models and their capabilities",
                    ),
                    resource(
                        ASPECT_RATIOS_URI,
                        "Aspect Ratios",
                        "Aspect ratios accepted by the image tools",
                    ),
                ],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = match uri.as_str() {
                MODELS_URI => resources::models_resource_json(),
                ASPECT_RATIOS_URI => resources::aspect_ratios_resource_json(),
                _ => {
                    return Err(McpError::resource_not_found(
                        format!("Unknown resource: {}", uri),
                        None,
                    ));
                }
            };

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}
