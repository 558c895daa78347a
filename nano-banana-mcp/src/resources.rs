//! MCP Resources for the Nano Banana server.
//!
//! This module provides resource content for:
//! - `nano-banana://models` - Model choices and their Gemini identifiers
//! - `nano-banana://options` - Aspect ratios, image sizes and defaults

use crate::handler::{DEFAULT_DESCRIBE_PROMPT, DEFAULT_OUTPUT_DIR, MAX_COMPOSE_IMAGES};
use crate::types::{AspectRatio, ImageSize, ModelChoice};
use serde::{Deserialize, Serialize};

/// URI of the models resource.
pub const MODELS_URI: &str = "nano-banana://models";

/// URI of the options resource.
pub const OPTIONS_URI: &str = "nano-banana://options";

/// Model entry for the resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Key accepted in tool arguments (e.g., "flash")
    pub choice: String,
    /// Gemini model identifier
    pub id: String,
    pub description: String,
    /// Hard limit on source images for compose_images
    pub max_compose_images: usize,
    /// Source images the model handles reliably
    pub recommended_max_images: usize,
}

/// Defaults applied when a tool argument is omitted.
#[derive(Debug, Serialize, Deserialize)]
pub struct OptionDefaults {
    pub model: String,
    pub aspect_ratio: String,
    pub image_size: String,
    pub output_dir: String,
    pub describe_prompt: String,
}

/// Generation options for the resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct OptionsEntry {
    pub aspect_ratios: Vec<String>,
    pub image_sizes: Vec<String>,
    pub defaults: OptionDefaults,
}

/// Get the models resource as JSON.
pub fn models_resource_json() -> String {
    let models: Vec<ModelEntry> = ModelChoice::ALL
        .iter()
        .map(|&model| ModelEntry {
            choice: model.as_str().to_string(),
            id: model.model_id().to_string(),
            description: model.description().to_string(),
            max_compose_images: MAX_COMPOSE_IMAGES,
            recommended_max_images: model.recommended_max_images(),
        })
        .collect();

    serde_json::to_string_pretty(&models).unwrap_or_else(|_| "[]".to_string())
}

/// Get the options resource as JSON.
pub fn options_resource_json() -> String {
    let options = OptionsEntry {
        aspect_ratios: AspectRatio::ALL.iter().map(|r| r.to_string()).collect(),
        image_sizes: ImageSize::ALL.iter().map(|s| s.to_string()).collect(),
        defaults: OptionDefaults {
            model: ModelChoice::default().to_string(),
            aspect_ratio: AspectRatio::default().to_string(),
            image_size: ImageSize::default().to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            describe_prompt: DEFAULT_DESCRIBE_PROMPT.to_string(),
        },
    };

    serde_json::to_string_pretty(&options).unwrap_or_else(|_| "{}".to_string())
}
