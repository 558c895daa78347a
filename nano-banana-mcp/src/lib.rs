//! Nano Banana MCP Server Library
//!
//! This library exposes Google's Gemini image models ("Nano Banana") as MCP
//! tools: text-to-image generation, image editing, multi-image composition
//! and image description.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;
pub mod envelope;
pub mod extract;
pub mod files;
pub mod handler;
pub mod resources;
pub mod server;
pub mod types;

pub use client::GeminiClient;
pub use extract::{ExtractedResult, extract_result, extract_text};
pub use handler::{
    ComposeImagesParams, DescribeImageParams, DescribeOutcome, DescriptionMetadata,
    EditImageParams, GenerateImageParams, GeneratedImage, ImageMetadata, ImageOutcome,
    NanoBananaHandler, Operation,
};
pub use server::{NanoBananaServer, tool_definitions};
pub use types::{AspectRatio, ImageSize, ModelChoice};
