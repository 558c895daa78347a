//! MCP Server implementation for the Nano Banana server.
//!
//! This module provides the MCP server handler that exposes:
//! - `generate_image` tool for text-to-image generation
//! - `edit_image` tool for instruction-driven edits of an existing image
//! - `compose_images` tool for combining up to 14 source images
//! - `describe_image` tool for describing or questioning an image
//! - Resources for model choices and generation options
//!
//! Tool failures are returned as error results, never as protocol errors;
//! only malformed arguments and unknown tools are rejected at the protocol
//! level.

use crate::envelope;
use crate::handler::{
    ComposeImagesParams, DescribeImageParams, EditImageParams, GenerateImageParams,
    NanoBananaHandler, Operation,
};
use crate::resources;
use nano_banana_mcp_common::config::Config;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, JsonObject, ListResourcesResult, ListToolsResult, ReadResourceResult,
        ResourceContents, ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
    },
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MCP Server for Nano Banana image tools.
#[derive(Clone)]
pub struct NanoBananaServer {
    handler: Arc<NanoBananaHandler>,
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema).unwrap_or_default() {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

fn annotations(read_only: bool) -> ToolAnnotations {
    ToolAnnotations::new()
        .read_only(read_only)
        .destructive(false)
        .idempotent(read_only)
        .open_world(true)
}

fn tool(
    operation: Operation,
    description: &'static str,
    input_schema: Arc<JsonObject>,
    read_only: bool,
) -> Tool {
    Tool {
        name: Cow::Borrowed(operation.tool_name()),
        description: Some(Cow::Borrowed(description)),
        input_schema,
        annotations: Some(annotations(read_only)),
        icons: None,
        meta: None,
        output_schema: None,
        title: None,
    }
}

/// Declarations of the four tools.
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        tool(
            Operation::Generate,
            "Generate an image from a text prompt with Gemini (Nano Banana). \
             Saves a PNG to output_dir and returns the image with its metadata.",
            input_schema::<GenerateImageParams>(),
            false,
        ),
        tool(
            Operation::Edit,
            "Edit an existing image file following a plain-language instruction. \
             Saves the edited PNG to output_dir and returns it with its metadata.",
            input_schema::<EditImageParams>(),
            false,
        ),
        tool(
            Operation::Compose,
            "Combine 1 to 14 source images into a new image following an instruction. \
             The pro model handles more reference images reliably than flash.",
            input_schema::<ComposeImagesParams>(),
            false,
        ),
        tool(
            Operation::Describe,
            "Describe an image file, or answer a question about it. \
             Returns text only; nothing is written to disk.",
            input_schema::<DescribeImageParams>(),
            true,
        ),
    ]
}

fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    // Omitted arguments behave like an empty object so that required fields
    // are reported by name.
    let args = arguments.unwrap_or_default();
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))
}

fn resource(uri: &str, name: &str, description: &str) -> rmcp::model::Resource {
    rmcp::model::Resource {
        raw: rmcp::model::RawResource {
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

impl NanoBananaServer {
    /// Create a new server from validated configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_handler(NanoBananaHandler::new(config))
    }

    /// Create a server around an existing handler.
    pub fn with_handler(handler: NanoBananaHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Generate an image from a text prompt.
    pub async fn generate_image(&self, params: GenerateImageParams) -> CallToolResult {
        info!(prompt_len = params.prompt.len(), "Generating image with Gemini");

        match self.handler.generate_image(params).await {
            Ok(outcome) => envelope::image_outcome_result(Operation::Generate, &outcome),
            Err(e) => {
                warn!(error = %e, "generate_image failed");
                envelope::failure_result(Operation::Generate, &e)
            }
        }
    }

    /// Edit an existing image.
    pub async fn edit_image(&self, params: EditImageParams) -> CallToolResult {
        info!(image_path = %params.image_path, "Editing image with Gemini");

        match self.handler.edit_image(params).await {
            Ok(outcome) => envelope::image_outcome_result(Operation::Edit, &outcome),
            Err(e) => {
                warn!(error = %e, "edit_image failed");
                envelope::failure_result(Operation::Edit, &e)
            }
        }
    }

    /// Compose several images into one.
    pub async fn compose_images(&self, params: ComposeImagesParams) -> CallToolResult {
        info!(images = params.image_paths.len(), "Composing images with Gemini");

        match self.handler.compose_images(params).await {
            Ok(outcome) => envelope::image_outcome_result(Operation::Compose, &outcome),
            Err(e) => {
                warn!(error = %e, "compose_images failed");
                envelope::failure_result(Operation::Compose, &e)
            }
        }
    }

    /// Describe an image.
    pub async fn describe_image(&self, params: DescribeImageParams) -> CallToolResult {
        info!(image_path = %params.image_path, "Describing image with Gemini");

        match self.handler.describe_image(params).await {
            Ok(outcome) => envelope::describe_outcome_result(&outcome),
            Err(e) => {
                warn!(error = %e, "describe_image failed");
                envelope::failure_result(Operation::Describe, &e)
            }
        }
    }

    /// Dispatch a tool call by name.
    ///
    /// # Errors
    /// Returns `invalid_params` for an unknown tool or arguments that do not
    /// match the tool's schema.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        match name {
            "generate_image" => Ok(self.generate_image(parse_arguments(arguments)?).await),
            "edit_image" => Ok(self.edit_image(parse_arguments(arguments)?).await),
            "compose_images" => Ok(self.compose_images(parse_arguments(arguments)?).await),
            "describe_image" => Ok(self.describe_image(parse_arguments(arguments)?).await),
            _ => Err(McpError::invalid_params(
                format!("Unknown tool: {}", name),
                None,
            )),
        }
    }

    /// Resource content by URI.
    ///
    /// # Errors
    /// Returns `resource_not_found` for an unknown URI.
    pub fn resource_content(uri: &str) -> Result<String, McpError> {
        match uri {
            resources::MODELS_URI => Ok(resources::models_resource_json()),
            resources::OPTIONS_URI => Ok(resources::options_resource_json()),
            _ => Err(McpError::resource_not_found(
                format!("Unknown resource: {}", uri),
                None,
            )),
        }
    }
}

impl ServerHandler for NanoBananaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server using Google Gemini (Nano Banana). \
                 Use generate_image to create images from text prompts, \
                 edit_image to change an existing image, \
                 compose_images to combine several images into one, \
                 and describe_image to get a text description of an image. \
                 Generated images are saved as PNG files in output_dir. \
                 The API allows only a few requests per minute."
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
        _params: Option<rmcp::model::PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: tool_definitions(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            debug!(tool = %params.name, "Tool call");
            self.dispatch(params.name.as_ref(), params.arguments).await
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources");

            Ok(ListResourcesResult {
                resources: vec![
                    resource(
                        resources::MODELS_URI,
                        "Available Models",
                        "Model choices with their Gemini identifiers and composition limits",
                    ),
                    resource(
                        resources::OPTIONS_URI,
                        "Generation Options",
                        "Supported aspect ratios, image sizes and default values",
                    ),
                ],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = Self::resource_content(uri)?;

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}
