//! Tool handlers for the Nano Banana MCP server.
//!
//! This module provides the `NanoBananaHandler` struct and parameter types for
//! image generation, editing, composition and description using the Gemini
//! `generateContent` API.

use crate::client::GeminiClient;
use crate::extract::{ExtractedResult, extract_result, extract_text};
use crate::files::read_image;
use crate::types::{AspectRatio, ImageSize, Modality, ModelChoice, Part};
use nano_banana_mcp_common::config::Config;
use nano_banana_mcp_common::error::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default output directory for written images.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Default prompt for `describe_image`.
pub const DEFAULT_DESCRIBE_PROMPT: &str = "Describe this image in detail.";

/// Minimum number of source images for composition.
pub const MIN_COMPOSE_IMAGES: usize = 1;

/// Maximum number of source images for composition, for every model.
pub const MAX_COMPOSE_IMAGES: usize = 14;

const IMAGE_MODALITIES: &[Modality] = &[Modality::Text, Modality::Image];
const TEXT_MODALITIES: &[Modality] = &[Modality::Text];

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_describe_prompt() -> String {
    DEFAULT_DESCRIBE_PROMPT.to_string()
}

fn default_aspect_ratio() -> AspectRatio {
    AspectRatio::default()
}

fn default_image_size() -> ImageSize {
    ImageSize::default()
}

// =============================================================================
// Parameters
// =============================================================================

/// Text-to-image generation parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GenerateImageParams {
    /// Text description of the image to generate.
    #[schemars(length(min = 1))]
    pub prompt: String,

    /// Model to use: "flash" (fast) or "pro" (higher quality).
    #[serde(default)]
    pub model: ModelChoice,

    /// Aspect ratio of the generated image.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: AspectRatio,

    /// Output resolution: "1K", "2K" or "4K".
    #[serde(default = "default_image_size")]
    pub image_size: ImageSize,

    /// Directory the generated image is written to.
    #[serde(default = "default_output_dir")]
    #[schemars(length(min = 1))]
    pub output_dir: String,
}

/// Image editing parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct EditImageParams {
    /// Path to the image to edit.
    #[schemars(length(min = 1))]
    pub image_path: String,

    /// What to change, in plain language.
    #[schemars(length(min = 1))]
    pub instruction: String,

    /// Model to use: "flash" (fast) or "pro" (higher quality).
    #[serde(default)]
    pub model: ModelChoice,

    /// Aspect ratio of the result. Keeps the service's choice when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,

    /// Output resolution: "1K", "2K" or "4K".
    #[serde(default = "default_image_size")]
    pub image_size: ImageSize,

    /// Directory the edited image is written to.
    #[serde(default = "default_output_dir")]
    #[schemars(length(min = 1))]
    pub output_dir: String,
}

/// Multi-image composition parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ComposeImagesParams {
    /// Paths of the source images, 1 to 14, in the order they are sent.
    #[schemars(length(min = 1, max = 14))]
    pub image_paths: Vec<String>,

    /// How to combine the source images.
    #[schemars(length(min = 1))]
    pub instruction: String,

    /// Model to use: "flash" (fast) or "pro" (higher quality, more reference images).
    #[serde(default)]
    pub model: ModelChoice,

    /// Aspect ratio of the composed image.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: AspectRatio,

    /// Output resolution: "1K", "2K" or "4K".
    #[serde(default = "default_image_size")]
    pub image_size: ImageSize,

    /// Directory the composed image is written to.
    #[serde(default = "default_output_dir")]
    #[schemars(length(min = 1))]
    pub output_dir: String,
}

/// Image description parameters.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DescribeImageParams {
    /// Path to the image to describe.
    #[schemars(length(min = 1))]
    pub image_path: String,

    /// Question or instruction about the image.
    #[serde(default = "default_describe_prompt")]
    #[schemars(length(min = 1))]
    pub prompt: String,

    /// Model to use: "flash" (fast) or "pro" (higher quality).
    #[serde(default)]
    pub model: ModelChoice,
}

/// Validation error details for tool parameters.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn require_non_empty(errors: &mut Vec<ValidationError>, field: &str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError {
            field: field.to_string(),
            message: format!("{} cannot be empty", label),
        });
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation_error(errors: Vec<ValidationError>) -> Error {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    Error::validation(messages.join("; "))
}

impl GenerateImageParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "prompt", "Prompt", &self.prompt);
        require_non_empty(&mut errors, "output_dir", "Output directory", &self.output_dir);
        into_result(errors)
    }
}

impl EditImageParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "image_path", "Image path", &self.image_path);
        require_non_empty(&mut errors, "instruction", "Instruction", &self.instruction);
        require_non_empty(&mut errors, "output_dir", "Output directory", &self.output_dir);
        into_result(errors)
    }
}

impl ComposeImagesParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let count = self.image_paths.len();
        if !(MIN_COMPOSE_IMAGES..=MAX_COMPOSE_IMAGES).contains(&count) {
            errors.push(ValidationError {
                field: "image_paths".to_string(),
                message: format!(
                    "Expected between {} and {} images, got {}",
                    MIN_COMPOSE_IMAGES, MAX_COMPOSE_IMAGES, count
                ),
            });
        }

        for (i, path) in self.image_paths.iter().enumerate() {
            if path.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("image_paths[{}]", i),
                    message: "Image path cannot be empty".to_string(),
                });
            }
        }

        require_non_empty(&mut errors, "instruction", "Instruction", &self.instruction);
        require_non_empty(&mut errors, "output_dir", "Output directory", &self.output_dir);
        into_result(errors)
    }
}

impl DescribeImageParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "image_path", "Image path", &self.image_path);
        require_non_empty(&mut errors, "prompt", "Prompt", &self.prompt);
        into_result(errors)
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Tool operation, used to pick result messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Edit,
    Compose,
    Describe,
}

impl Operation {
    /// Tool name as exposed over MCP.
    pub fn tool_name(self) -> &'static str {
        match self {
            Operation::Generate => "generate_image",
            Operation::Edit => "edit_image",
            Operation::Compose => "compose_images",
            Operation::Describe => "describe_image",
        }
    }

    /// Prefix for failure messages.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Generate => "Failed to generate image",
            Operation::Edit => "Failed to edit image",
            Operation::Compose => "Failed to compose images",
            Operation::Describe => "Failed to describe image",
        }
    }

    /// Message reported when the service returned nothing usable.
    pub fn empty_result_message(self) -> &'static str {
        match self {
            Operation::Generate => {
                "No image was generated. The prompt may have been blocked by safety \
                 filters; try rephrasing it."
            }
            Operation::Edit => {
                "No image was generated. The edit may have been blocked by safety filters, \
                 or the instruction could not be applied to the source image; try a more \
                 specific instruction."
            }
            Operation::Compose => {
                "No image was generated. The composition may have been blocked by safety \
                 filters, or the source images could not be combined; try fewer images or \
                 a clearer instruction."
            }
            Operation::Describe => {
                "No description was generated. The image may have been blocked by safety \
                 filters, or the file may not be a supported image."
            }
        }
    }
}

/// Metadata reported alongside a generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub image_path: String,
    pub model: ModelChoice,
    pub model_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    pub image_size: ImageSize,
    /// Text the service returned with the image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ImageMetadata {
    fn new(model: ModelChoice, image_size: ImageSize, rendered: &RenderedImage) -> Self {
        Self {
            image_path: rendered.path.display().to_string(),
            model,
            model_id: model.model_id(),
            prompt: None,
            instruction: None,
            source_image: None,
            source_images: Vec::new(),
            aspect_ratio: None,
            image_size,
            description: rendered.text.clone(),
        }
    }
}

/// A generated image and its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64-encoded image data
    pub data: String,
    pub metadata: ImageMetadata,
}

/// Result of an image-producing tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Generated(GeneratedImage),
    /// The service answered but returned no image.
    NoImage,
}

/// Metadata reported for an image description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionMetadata {
    pub image_path: String,
    pub model: ModelChoice,
    pub model_id: &'static str,
    pub description: String,
}

/// Result of `describe_image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeOutcome {
    Described(DescriptionMetadata),
    /// The service answered but returned no text.
    NoDescription,
}

struct RenderedImage {
    path: PathBuf,
    data: String,
    text: Option<String>,
}

impl RenderedImage {
    fn from_extracted(extracted: ExtractedResult) -> Option<Self> {
        match (extracted.image_path, extracted.image_data) {
            (Some(path), Some(data)) => Some(Self {
                path,
                data,
                text: extracted.text,
            }),
            _ => None,
        }
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Nano Banana tool handler.
///
/// Validates parameters, reads source images, calls Gemini and saves results.
#[derive(Debug, Clone)]
pub struct NanoBananaHandler {
    client: GeminiClient,
}

impl NanoBananaHandler {
    /// Create a handler from validated configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_client(GeminiClient::new(config))
    }

    /// Create a handler around an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Generate an image from a text prompt.
    ///
    /// # Errors
    /// Returns `Error::Validation` for bad parameters, or the client's or
    /// extractor's error.
    #[instrument(level = "info", name = "generate_image", skip(self, params))]
    pub async fn generate_image(&self, params: GenerateImageParams) -> Result<ImageOutcome, Error> {
        params.validate().map_err(validation_error)?;

        info!(
            model = %params.model,
            aspect_ratio = %params.aspect_ratio,
            image_size = %params.image_size,
            "Generating image"
        );

        let parts = vec![Part::text(params.prompt.as_str())];
        let rendered = self
            .render(
                params.model,
                parts,
                Some(params.aspect_ratio),
                params.image_size,
                &params.output_dir,
            )
            .await?;

        Ok(match rendered {
            Some(rendered) => ImageOutcome::Generated(GeneratedImage {
                metadata: ImageMetadata {
                    prompt: Some(params.prompt),
                    aspect_ratio: Some(params.aspect_ratio),
                    ..ImageMetadata::new(params.model, params.image_size, &rendered)
                },
                data: rendered.data,
            }),
            None => ImageOutcome::NoImage,
        })
    }

    /// Edit an existing image according to an instruction.
    ///
    /// # Errors
    /// Returns `Error::Validation` for bad parameters or a missing source
    /// file, or the client's or extractor's error.
    #[instrument(level = "info", name = "edit_image", skip(self, params))]
    pub async fn edit_image(&self, params: EditImageParams) -> Result<ImageOutcome, Error> {
        params.validate().map_err(validation_error)?;

        info!(model = %params.model, image_path = %params.image_path, "Editing image");

        let source = read_image(Path::new(&params.image_path)).await?;
        let parts = vec![
            Part::image(source.mime_type, source.data),
            Part::text(params.instruction.as_str()),
        ];

        let rendered = self
            .render(
                params.model,
                parts,
                params.aspect_ratio,
                params.image_size,
                &params.output_dir,
            )
            .await?;

        Ok(match rendered {
            Some(rendered) => ImageOutcome::Generated(GeneratedImage {
                metadata: ImageMetadata {
                    instruction: Some(params.instruction),
                    source_image: Some(params.image_path),
                    aspect_ratio: params.aspect_ratio,
                    ..ImageMetadata::new(params.model, params.image_size, &rendered)
                },
                data: rendered.data,
            }),
            None => ImageOutcome::NoImage,
        })
    }

    /// Compose several source images into one.
    ///
    /// All images are read before the request is sent, in the given order.
    ///
    /// # Errors
    /// Returns `Error::Validation` for bad parameters (including an image
    /// count outside 1..=14) or a missing source file, or the client's or
    /// extractor's error.
    #[instrument(level = "info", name = "compose_images", skip(self, params))]
    pub async fn compose_images(&self, params: ComposeImagesParams) -> Result<ImageOutcome, Error> {
        params.validate().map_err(validation_error)?;

        info!(model = %params.model, images = params.image_paths.len(), "Composing images");

        let mut parts = Vec::with_capacity(params.image_paths.len() + 1);
        for path in &params.image_paths {
            let source = read_image(Path::new(path)).await?;
            parts.push(Part::image(source.mime_type, source.data));
        }
        parts.push(Part::text(params.instruction.as_str()));

        let rendered = self
            .render(
                params.model,
                parts,
                Some(params.aspect_ratio),
                params.image_size,
                &params.output_dir,
            )
            .await?;

        Ok(match rendered {
            Some(rendered) => ImageOutcome::Generated(GeneratedImage {
                metadata: ImageMetadata {
                    instruction: Some(params.instruction),
                    source_images: params.image_paths,
                    aspect_ratio: Some(params.aspect_ratio),
                    ..ImageMetadata::new(params.model, params.image_size, &rendered)
                },
                data: rendered.data,
            }),
            None => ImageOutcome::NoImage,
        })
    }

    /// Describe or answer a question about an image.
    ///
    /// # Errors
    /// Returns `Error::Validation` for bad parameters or a missing source
    /// file, or the client's or extractor's error.
    #[instrument(level = "info", name = "describe_image", skip(self, params))]
    pub async fn describe_image(&self, params: DescribeImageParams) -> Result<DescribeOutcome, Error> {
        params.validate().map_err(validation_error)?;

        info!(model = %params.model, image_path = %params.image_path, "Describing image");

        let source = read_image(Path::new(&params.image_path)).await?;
        let parts = vec![
            Part::image(source.mime_type, source.data),
            Part::text(params.prompt.as_str()),
        ];

        let response = self
            .client
            .send(params.model, parts, TEXT_MODALITIES, None, None)
            .await?;

        Ok(match extract_text(&response)? {
            Some(description) => DescribeOutcome::Described(DescriptionMetadata {
                image_path: params.image_path,
                model: params.model,
                model_id: params.model.model_id(),
                description,
            }),
            None => {
                debug!("Gemini returned no text for the image");
                DescribeOutcome::NoDescription
            }
        })
    }

    async fn render(
        &self,
        model: ModelChoice,
        parts: Vec<Part>,
        aspect_ratio: Option<AspectRatio>,
        image_size: ImageSize,
        output_dir: &str,
    ) -> Result<Option<RenderedImage>, Error> {
        let response = self
            .client
            .send(model, parts, IMAGE_MODALITIES, aspect_ratio, Some(image_size))
            .await?;
        let extracted = extract_result(&response, Path::new(output_dir)).await?;

        let rendered = RenderedImage::from_extracted(extracted);
        match &rendered {
            Some(image) => info!(path = %image.path.display(), "Image saved"),
            None => debug!("Gemini returned no image"),
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_handler() -> NanoBananaHandler {
        // Port 9 (discard) is never listening; any request would fail with status 0.
        NanoBananaHandler::new(&Config {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        })
    }

    #[test]
    fn test_generate_params_defaults() {
        let params: GenerateImageParams = serde_json::from_value(json!({"prompt": "a cat"})).unwrap();
        assert_eq!(params.model, ModelChoice::Flash);
        assert_eq!(params.aspect_ratio, AspectRatio::Square);
        assert_eq!(params.image_size, ImageSize::Size1K);
        assert_eq!(params.output_dir, ".");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_edit_params_defaults() {
        let params: EditImageParams =
            serde_json::from_value(json!({"image_path": "in.png", "instruction": "add a hat"}))
                .unwrap();
        assert_eq!(params.aspect_ratio, None);
        assert_eq!(params.image_size, ImageSize::Size1K);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_describe_params_default_prompt() {
        let params: DescribeImageParams =
            serde_json::from_value(json!({"image_path": "in.png"})).unwrap();
        assert_eq!(params.prompt, DEFAULT_DESCRIBE_PROMPT);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_unknown_model_rejected_at_deserialization() {
        let result: Result<GenerateImageParams, _> =
            serde_json::from_value(json!({"prompt": "a cat", "model": "ultra"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_aspect_ratio_rejected_at_deserialization() {
        let result: Result<ComposeImagesParams, _> = serde_json::from_value(json!({
            "image_paths": ["a.png"],
            "instruction": "merge",
            "aspect_ratio": "7:3"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let params: GenerateImageParams = serde_json::from_value(json!({"prompt": "  "})).unwrap();
        let errors = params.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "prompt");
    }

    #[test]
    fn test_edit_collects_all_errors() {
        let params: EditImageParams =
            serde_json::from_value(json!({"image_path": "", "instruction": ""})).unwrap();
        let errors = params.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["image_path", "instruction"]);
    }

    #[test]
    fn test_compose_image_count_bounds() {
        let make = |n: usize| ComposeImagesParams {
            image_paths: (0..n).map(|i| format!("img{}.png", i)).collect(),
            instruction: "merge".to_string(),
            model: ModelChoice::Pro,
            aspect_ratio: AspectRatio::Square,
            image_size: ImageSize::Size1K,
            output_dir: ".".to_string(),
        };

        assert!(make(0).validate().is_err());
        assert!(make(1).validate().is_ok());
        assert!(make(14).validate().is_ok());

        let errors = make(15).validate().unwrap_err();
        assert_eq!(errors[0].field, "image_paths");
        assert!(errors[0].message.contains("got 15"));
    }

    #[test]
    fn test_compose_blank_path_rejected() {
        let params = ComposeImagesParams {
            image_paths: vec!["a.png".to_string(), " ".to_string()],
            instruction: "merge".to_string(),
            model: ModelChoice::Flash,
            aspect_ratio: AspectRatio::Square,
            image_size: ImageSize::Size1K,
            output_dir: ".".to_string(),
        };
        let errors = params.validate().unwrap_err();
        assert_eq!(errors[0].field, "image_paths[1]");
    }

    #[test]
    fn test_validation_errors_joined() {
        let errors = vec![
            ValidationError {
                field: "a".to_string(),
                message: "first".to_string(),
            },
            ValidationError {
                field: "b".to_string(),
                message: "second".to_string(),
            },
        ];
        let err = validation_error(errors);
        assert_eq!(err.to_string(), "Validation error: a: first; b: second");
    }

    #[test]
    fn test_operation_messages() {
        for op in [Operation::Generate, Operation::Edit, Operation::Compose] {
            assert!(op.empty_result_message().starts_with("No image was generated."));
        }
        assert!(
            Operation::Describe
                .empty_result_message()
                .starts_with("No description was generated.")
        );
        assert_eq!(Operation::Compose.failure_prefix(), "Failed to compose images");
        assert_eq!(Operation::Describe.tool_name(), "describe_image");
    }

    #[test]
    fn test_image_metadata_serialization() {
        let metadata = ImageMetadata {
            image_path: "./nano-banana-1.png".to_string(),
            model: ModelChoice::Pro,
            model_id: ModelChoice::Pro.model_id(),
            prompt: None,
            instruction: Some("merge".to_string()),
            source_image: None,
            source_images: vec!["a.png".to_string(), "b.png".to_string()],
            aspect_ratio: Some(AspectRatio::Landscape16x9),
            image_size: ImageSize::Size2K,
            description: None,
        };

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            json,
            json!({
                "imagePath": "./nano-banana-1.png",
                "model": "pro",
                "modelId": "gemini-3-pro-image-preview",
                "instruction": "merge",
                "sourceImages": ["a.png", "b.png"],
                "aspectRatio": "16:9",
                "imageSize": "2K"
            })
        );
    }

    #[tokio::test]
    async fn test_generate_validation_precedes_network() {
        let err = offline_handler()
            .generate_image(GenerateImageParams {
                prompt: String::new(),
                model: ModelChoice::Flash,
                aspect_ratio: AspectRatio::Square,
                image_size: ImageSize::Size1K,
                output_dir: ".".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_edit_missing_file_precedes_network() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");

        let err = offline_handler()
            .edit_image(EditImageParams {
                image_path: missing.display().to_string(),
                instruction: "add a hat".to_string(),
                model: ModelChoice::Flash,
                aspect_ratio: None,
                image_size: ImageSize::Size1K,
                output_dir: dir.path().display().to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("missing.png"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_status_zero() {
        let dir = tempfile::tempdir().unwrap();
        let err = offline_handler()
            .generate_image(GenerateImageParams {
                prompt: "a cat".to_string(),
                model: ModelChoice::Flash,
                aspect_ratio: AspectRatio::Square,
                image_size: ImageSize::Size1K,
                output_dir: dir.path().display().to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(0));
        assert!(err.to_string().contains("Request failed"));
    }
}
