//! Tool result envelopes.
//!
//! Successful image tools return an inline image followed by JSON metadata;
//! `describe_image` returns JSON metadata only. Every failure is a single
//! text item flagged as an error.

use crate::handler::{DescribeOutcome, GeneratedImage, ImageOutcome, Operation};
use nano_banana_mcp_common::error::Error;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// MIME type reported for inline images. Written files are always PNG.
pub const IMAGE_MIME_TYPE: &str = "image/png";

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Envelope for a generated image.
pub fn image_result(image: &GeneratedImage) -> CallToolResult {
    CallToolResult::success(vec![
        Content::image(image.data.clone(), IMAGE_MIME_TYPE),
        Content::text(to_json(&image.metadata)),
    ])
}

/// Envelope for an image tool outcome.
pub fn image_outcome_result(operation: Operation, outcome: &ImageOutcome) -> CallToolResult {
    match outcome {
        ImageOutcome::Generated(image) => image_result(image),
        ImageOutcome::NoImage => empty_result(operation),
    }
}

/// Envelope for a `describe_image` outcome.
pub fn describe_outcome_result(outcome: &DescribeOutcome) -> CallToolResult {
    match outcome {
        DescribeOutcome::Described(metadata) => {
            CallToolResult::success(vec![Content::text(to_json(metadata))])
        }
        DescribeOutcome::NoDescription => empty_result(Operation::Describe),
    }
}

/// Error envelope for a response that carried nothing usable.
pub fn empty_result(operation: Operation) -> CallToolResult {
    error_result(operation.empty_result_message())
}

/// Error envelope for a failed operation.
pub fn failure_result(operation: Operation, error: &Error) -> CallToolResult {
    error_result(format!("{}: {}", operation.failure_prefix(), error))
}

/// Single-item error envelope.
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}
