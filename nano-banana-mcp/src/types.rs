//! Gemini `generateContent` wire types and the closed option enumerations
//! exposed through the tool schemas.

use nano_banana_mcp_common::error::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Option Enumerations
// =============================================================================

/// Model tier used for a request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// Gemini 2.5 Flash Image: fast, good for most requests
    #[default]
    Flash,
    /// Gemini 3 Pro Image: higher fidelity, better text rendering, up to 4K output
    Pro,
}

impl ModelChoice {
    /// All model choices, in schema order.
    pub const ALL: &'static [ModelChoice] = &[ModelChoice::Flash, ModelChoice::Pro];

    /// Remote model identifier for this choice.
    pub fn model_id(self) -> &'static str {
        match self {
            ModelChoice::Flash => "gemini-2.5-flash-image",
            ModelChoice::Pro => "gemini-3-pro-image-preview",
        }
    }

    /// Key used in tool arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelChoice::Flash => "flash",
            ModelChoice::Pro => "pro",
        }
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ModelChoice::Flash => "Gemini 2.5 Flash Image (Nano Banana): fast generation and editing",
            ModelChoice::Pro => {
                "Gemini 3 Pro Image (Nano Banana Pro): higher fidelity, sharper text, up to 4K"
            }
        }
    }

    /// Number of reference images the model handles reliably in one composition.
    ///
    /// Informational only; requests are bounded by `MAX_COMPOSE_IMAGES`.
    pub fn recommended_max_images(self) -> usize {
        match self {
            ModelChoice::Flash => 9,
            ModelChoice::Pro => 14,
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelChoice::ALL
            .iter()
            .copied()
            .find(|choice| choice.as_str() == s)
            .ok_or_else(|| {
                Error::validation(format!(
                    "Unknown model '{}'. Valid models: {}",
                    s,
                    ModelChoice::ALL
                        .iter()
                        .map(|m| m.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Output aspect ratio.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "5:4")]
    Landscape5x4,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "21:9")]
    Ultrawide21x9,
}

impl AspectRatio {
    /// All aspect ratios, in schema order.
    pub const ALL: &'static [AspectRatio] = &[
        AspectRatio::Square,
        AspectRatio::Portrait2x3,
        AspectRatio::Landscape3x2,
        AspectRatio::Portrait3x4,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait4x5,
        AspectRatio::Landscape5x4,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape16x9,
        AspectRatio::Ultrawide21x9,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait2x3 => "2:3",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait4x5 => "4:5",
            AspectRatio::Landscape5x4 => "5:4",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Ultrawide21x9 => "21:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output resolution tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    Size1K,
    #[serde(rename = "2K")]
    Size2K,
    #[serde(rename = "4K")]
    Size4K,
}

impl ImageSize {
    /// All sizes, in schema order.
    pub const ALL: &'static [ImageSize] = &[ImageSize::Size1K, ImageSize::Size2K, ImageSize::Size4K];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Size1K => "1K",
            ImageSize::Size2K => "2K",
            ImageSize::Size4K => "4K",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested output kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Image,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Gemini `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; always a single user turn here
    pub contents: Vec<RequestContent>,
    /// Generation configuration
    pub generation_config: GenerationConfig,
}

/// A single conversation turn.
#[derive(Debug, Serialize)]
pub struct RequestContent {
    /// Role (always "user")
    pub role: String,
    /// Ordered content parts
    pub parts: Vec<Part>,
}

/// Request content part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Part {
    /// Inline text
    Text { text: String },
    /// Inline base64 payload
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    /// Build a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Build an inline image part.
    pub fn image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type
    #[serde(default)]
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

/// Generation configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested output modalities
    pub response_modalities: Vec<Modality>,
    /// Image options; omitted unless images were requested with at least one option
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Image output options. Only supplied fields are serialized.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Gemini `generateContent` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    /// Response candidates; the first one is the service's preferred output
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Error descriptor, present on some failed generations
    #[serde(default)]
    pub error: Option<ResponseError>,
}

/// Response candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Candidate content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Response part. Either field may be absent; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

/// Error descriptor embedded in a response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_are_distinct_and_stable() {
        assert_eq!(ModelChoice::Flash.model_id(), "gemini-2.5-flash-image");
        assert_eq!(ModelChoice::Pro.model_id(), "gemini-3-pro-image-preview");
        assert_ne!(ModelChoice::Flash.model_id(), ModelChoice::Pro.model_id());
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("flash".parse::<ModelChoice>().unwrap(), ModelChoice::Flash);
        assert_eq!("pro".parse::<ModelChoice>().unwrap(), ModelChoice::Pro);

        let err = "ultra".parse::<ModelChoice>().unwrap_err();
        assert!(err.to_string().contains("Unknown model 'ultra'"));
        assert!(err.to_string().contains("flash, pro"));
    }

    #[test]
    fn test_model_deserialization_rejects_unknown() {
        assert_eq!(
            serde_json::from_str::<ModelChoice>(r#""pro""#).unwrap(),
            ModelChoice::Pro
        );
        assert!(serde_json::from_str::<ModelChoice>(r#""gemini-2.5-flash-image""#).is_err());
        assert!(serde_json::from_str::<ModelChoice>(r#""Flash""#).is_err());
    }

    #[test]
    fn test_aspect_ratio_serde_matches_as_str() {
        for ratio in AspectRatio::ALL {
            let json = serde_json::to_value(ratio).unwrap();
            assert_eq!(json, ratio.as_str());
            let parsed: AspectRatio = serde_json::from_value(json).unwrap();
            assert_eq!(parsed, *ratio);
        }
        assert!(serde_json::from_str::<AspectRatio>(r#""2:1""#).is_err());
    }

    #[test]
    fn test_image_size_serde_matches_as_str() {
        for size in ImageSize::ALL {
            assert_eq!(serde_json::to_value(size).unwrap(), size.as_str());
        }
        assert!(serde_json::from_str::<ImageSize>(r#""8K""#).is_err());
        assert!(serde_json::from_str::<ImageSize>(r#""1k""#).is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ModelChoice::default(), ModelChoice::Flash);
        assert_eq!(AspectRatio::default(), AspectRatio::Square);
        assert_eq!(ImageSize::default(), ImageSize::Size1K);
    }

    #[test]
    fn test_part_serialization() {
        let text = serde_json::to_value(Part::text("hello")).unwrap();
        assert_eq!(text, serde_json::json!({"text": "hello"}));

        let image = serde_json::to_value(Part::image("image/jpeg", "AAAA")).unwrap();
        assert_eq!(
            image,
            serde_json::json!({"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}})
        );
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"totalTokenCount": 12}
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates.len(), 1);
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Here you go"));
        assert_eq!(parts[1].inline_data.as_ref().unwrap().mime_type, "image/png");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_response_with_error_only() {
        let json = r#"{"error": {"code": 403, "message": "blocked", "status": "PERMISSION_DENIED"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(response.candidates.is_empty());
        let error = response.error.unwrap();
        assert_eq!(error.code, Some(403));
        assert_eq!(error.message.as_deref(), Some("blocked"));
    }

    #[test]
    fn test_empty_response_deserializes() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert!(response.error.is_none());
    }
}
