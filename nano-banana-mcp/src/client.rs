//! Gemini `generateContent` client.
//!
//! Every call is a single authenticated POST. Non-success responses are
//! normalized into [`Error`]: HTTP 429 becomes `Error::RateLimited`, anything
//! else becomes `Error::Api` with the best message the body offers.

use crate::types::{
    AspectRatio, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    ImageSize, Modality, ModelChoice, Part, RequestContent,
};
use nano_banana_mcp_common::config::Config;
use nano_banana_mcp_common::error::Error;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Maximum number of characters of a raw body echoed into logs and errors.
const RAW_BODY_PREVIEW_CHARS: usize = 1000;

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: Config,
}

impl GeminiClient {
    /// Create a client from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    /// Create a client with a caller-supplied HTTP client.
    pub fn with_http(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            config: config.clone(),
        }
    }

    /// Endpoint URL for the given model.
    pub fn endpoint(&self, model: ModelChoice) -> String {
        self.config.generate_content_endpoint(model.model_id())
    }

    /// Build a request body.
    ///
    /// `imageConfig` is only attached when `IMAGE` output is requested and at
    /// least one image option is given; it carries only the given options.
    pub fn build_request(
        parts: Vec<Part>,
        modalities: &[Modality],
        aspect_ratio: Option<AspectRatio>,
        image_size: Option<ImageSize>,
    ) -> GenerateContentRequest {
        let wants_image = modalities.contains(&Modality::Image);
        let image_config = if wants_image && (aspect_ratio.is_some() || image_size.is_some()) {
            Some(ImageConfig {
                aspect_ratio,
                image_size,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: modalities.to_vec(),
                image_config,
            },
        }
    }

    /// Send a `generateContent` request.
    ///
    /// # Errors
    /// - `Error::RateLimited` on HTTP 429
    /// - `Error::Api` on any other non-success status, on transport failure
    ///   (status 0), or when the body cannot be parsed
    #[instrument(level = "debug", skip(self, parts), fields(model = %model, parts = parts.len()))]
    pub async fn send(
        &self,
        model: ModelChoice,
        parts: Vec<Part>,
        modalities: &[Modality],
        aspect_ratio: Option<AspectRatio>,
        image_size: Option<ImageSize>,
    ) -> Result<GenerateContentResponse, Error> {
        let request = Self::build_request(parts, modalities, aspect_ratio, image_size);
        let endpoint = self.endpoint(model);

        debug!(endpoint = %endpoint, "Calling Gemini API");

        let response = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::api(0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Gemini API returned an error");
            return Err(error_from_response(status, &body));
        }

        let response_text = response.text().await.map_err(|e| {
            Error::api(status.as_u16(), format!("Failed to read response: {}", e))
        })?;

        debug!(
            response = %preview(&response_text),
            "Raw Gemini API response"
        );

        serde_json::from_str(&response_text).map_err(|e| {
            Error::api(
                status.as_u16(),
                format!(
                    "Failed to parse response: {}. Raw: {}",
                    e,
                    preview(&response_text)
                ),
            )
        })
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map a non-success response to an error.
///
/// The message is the first non-empty of: top-level `message`,
/// `error.message`, then the status reason phrase. Unparsable bodies are
/// treated as empty objects.
pub(crate) fn error_from_response(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Error::RateLimited;
    }

    let value: Value = serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()));

    let message = non_empty_str(value.get("message"))
        .or_else(|| non_empty_str(value.get("error").and_then(|e| e.get("message"))))
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    Error::api(status.as_u16(), message)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn preview(text: &str) -> String {
    text.chars().take(RAW_BODY_PREVIEW_CHARS).collect()
}
