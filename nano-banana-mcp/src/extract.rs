//! Turns a `generateContent` response into text and a saved image.

use crate::files::write_image;
use crate::types::{GenerateContentResponse, ResponsePart};
use nano_banana_mcp_common::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Code used when an embedded error descriptor carries none.
const DEFAULT_ERROR_CODE: u16 = 500;

/// What a response yielded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedResult {
    /// Text parts of the first candidate, joined with newlines
    pub text: Option<String>,
    /// Path of the last image written
    pub image_path: Option<PathBuf>,
    /// Base64 data of the last image
    pub image_data: Option<String>,
}

/// Parts of the first candidate, or `None` when there are no candidates.
///
/// A response with no candidates but an `error` descriptor is an error.
fn first_candidate_parts(
    response: &GenerateContentResponse,
) -> Result<Option<&[ResponsePart]>, Error> {
    let Some(candidate) = response.candidates.first() else {
        if let Some(error) = &response.error {
            let code = error.code.unwrap_or(DEFAULT_ERROR_CODE);
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!(code, message = %message, "Gemini response carried an error");
            return Err(Error::api(code, message));
        }
        debug!("Gemini response had no candidates");
        return Ok(None);
    };

    if response.candidates.len() > 1 {
        debug!(
            count = response.candidates.len(),
            "Ignoring all but the first candidate"
        );
    }
    if let Some(reason) = &candidate.finish_reason {
        debug!(finish_reason = %reason, "Candidate finished");
    }

    Ok(Some(
        candidate
            .content
            .as_ref()
            .map(|content| content.parts.as_slice())
            .unwrap_or_default(),
    ))
}

fn join_texts(parts: &[ResponsePart]) -> Option<String> {
    let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

/// Extract text and images from the first candidate.
///
/// Every inline image is written to `output_dir`; the last one is reported.
/// A response with no candidates but an `error` descriptor is an error;
/// one with neither is an empty result.
///
/// # Errors
/// Returns `Error::Api` for an embedded error descriptor, or the file writer's
/// error if an image cannot be saved.
pub async fn extract_result(
    response: &GenerateContentResponse,
    output_dir: &Path,
) -> Result<ExtractedResult, Error> {
    let Some(parts) = first_candidate_parts(response)? else {
        return Ok(ExtractedResult::default());
    };

    let mut result = ExtractedResult {
        text: join_texts(parts),
        ..ExtractedResult::default()
    };

    for inline in parts.iter().filter_map(|p| p.inline_data.as_ref()) {
        let path = write_image(&inline.data, output_dir).await?;
        result.image_path = Some(path);
        result.image_data = Some(inline.data.clone());
    }

    Ok(result)
}

/// Extract only the text of the first candidate, touching no files.
///
/// Inline images in the response are ignored.
///
/// # Errors
/// Returns `Error::Api` for an embedded error descriptor.
pub fn extract_text(response: &GenerateContentResponse) -> Result<Option<String>, Error> {
    let Some(parts) = first_candidate_parts(response)? else {
        return Ok(None);
    };

    let skipped = parts.iter().filter(|p| p.inline_data.is_some()).count();
    if skipped > 0 {
        debug!(skipped, "Ignoring inline images in a text-only response");
    }

    Ok(join_texts(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
    use serde_json::json;
    use tempfile::tempdir;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    fn image_part(bytes: &[u8]) -> serde_json::Value {
        json!({"inlineData": {"mimeType": "image/png", "data": BASE64.encode(bytes)}})
    }

    #[tokio::test]
    async fn test_text_only() {
        let dir = tempdir().unwrap();
        let resp = response(json!({
            "candidates": [{"content": {"parts": [{"text": "A red apple."}]}}]
        }));

        let result = extract_result(&resp, dir.path()).await.unwrap();
        assert_eq!(result.text.as_deref(), Some("A red apple."));
        assert!(result.image_path.is_none());
        assert!(result.image_data.is_none());
    }

    #[tokio::test]
    async fn test_texts_joined_with_newline() {
        let dir = tempdir().unwrap();
        let resp = response(json!({
            "candidates": [{"content": {"parts": [
                {"text": "first"},
                image_part(b"img"),
                {"text": "second"}
            ]}}]
        }));

        let result = extract_result(&resp, dir.path()).await.unwrap();
        assert_eq!(result.text.as_deref(), Some("first\nsecond"));
        assert!(result.image_path.is_some());
    }

    #[tokio::test]
    async fn test_image_written_to_output_dir() {
        let dir = tempdir().unwrap();
        let resp = response(json!({
            "candidates": [{"content": {"parts": [image_part(b"pixels")]}}]
        }));

        let result = extract_result(&resp, dir.path()).await.unwrap();
        let path = result.image_path.unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert_eq!(std::fs::read(&path).unwrap(), b"pixels");
        assert_eq!(result.image_data, Some(BASE64.encode(b"pixels")));
        assert!(result.text.is_none());
    }

    #[tokio::test]
    async fn test_last_image_wins() {
        let dir = tempdir().unwrap();
        let resp = response(json!({
            "candidates": [{"content": {"parts": [image_part(b"one"), image_part(b"two")]}}]
        }));

        let result = extract_result(&resp, dir.path()).await.unwrap();
        assert_eq!(result.image_data, Some(BASE64.encode(b"two")));
        assert_eq!(std::fs::read(result.image_path.unwrap()).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_only_first_candidate_is_read() {
        let dir = tempdir().unwrap();
        let resp = response(json!({
            "candidates": [
                {"content": {"parts": [{"text": "kept"}]}},
                {"content": {"parts": [{"text": "ignored"}, image_part(b"ignored")]}}
            ]
        }));

        let result = extract_result(&resp, dir.path()).await.unwrap();
        assert_eq!(result.text.as_deref(), Some("kept"));
        assert!(result.image_path.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty() {
        let dir = tempdir().unwrap();
        let result = extract_result(&response(json!({})), dir.path())
            .await
            .unwrap();
        assert_eq!(result, ExtractedResult::default());
    }

    #[tokio::test]
    async fn test_candidate_without_content_is_empty() {
        let dir = tempdir().unwrap();
        let resp = response(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        let result = extract_result(&resp, dir.path()).await.unwrap();
        assert_eq!(result, ExtractedResult::default());
    }

    #[tokio::test]
    async fn test_error_descriptor_becomes_api_error() {
        let dir = tempdir().unwrap();
        let resp = response(json!({"error": {"code": 400, "message": "Prompt blocked"}}));

        let err = extract_result(&resp, dir.path()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Api { status_code: 400, ref message } if message == "Prompt blocked"
        ));
    }

    #[tokio::test]
    async fn test_error_descriptor_defaults_to_500() {
        let dir = tempdir().unwrap();
        let resp = response(json!({"error": {"message": "boom"}}));

        let err = extract_result(&resp, dir.path()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_repeated_extraction_writes_distinct_files() {
        let dir = tempdir().unwrap();
        let resp = response(json!({
            "candidates": [{"content": {"parts": [image_part(b"same")]}}]
        }));

        let first = extract_result(&resp, dir.path()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = extract_result(&resp, dir.path()).await.unwrap();

        assert_ne!(first.image_path, second.image_path);
        assert_eq!(first.image_data, second.image_data);
    }

    #[test]
    fn test_extract_text_ignores_images() {
        let resp = response(json!({
            "candidates": [{"content": {"parts": [
                {"text": "A red apple."},
                image_part(b"unexpected"),
                {"text": "On a table."}
            ]}}]
        }));

        let text = extract_text(&resp).unwrap();
        assert_eq!(text.as_deref(), Some("A red apple.\nOn a table."));
    }

    #[test]
    fn test_extract_text_image_only_is_none() {
        let resp = response(json!({
            "candidates": [{"content": {"parts": [image_part(b"pixels")]}}]
        }));
        assert_eq!(extract_text(&resp).unwrap(), None);
    }

    #[test]
    fn test_extract_text_error_descriptor() {
        let resp = response(json!({"error": {"code": 403, "message": "blocked"}}));
        let err = extract_text(&resp).unwrap_err();
        assert_eq!(err.status_code(), Some(403));
        assert!(err.to_string().contains("blocked"));
    }
}
