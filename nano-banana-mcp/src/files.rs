//! Local image file I/O.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use nano_banana_mcp_common::error::Error;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Prefix of every generated file name.
pub const FILE_PREFIX: &str = "nano-banana-";

/// MIME type used for unknown extensions.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Image read from disk, ready to inline into a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Base64-encoded file contents
    pub data: String,
    /// MIME type inferred from the file extension
    pub mime_type: &'static str,
}

/// Infer an image MIME type from a path's extension (case-insensitive).
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// File name for an image written at `timestamp_ms`.
///
/// The extension is always `.png`, whatever the payload's real format.
pub fn image_file_name(timestamp_ms: u128) -> String {
    format!("{}{}.png", FILE_PREFIX, timestamp_ms)
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Decode `data` and write it under `output_dir`, creating the directory if needed.
///
/// # Errors
/// Returns `Error::Validation` if `data` is not valid base64, or `Error::Io`
/// if the directory or file cannot be written.
pub async fn write_image(data: &str, output_dir: &Path) -> Result<PathBuf, Error> {
    let bytes = BASE64
        .decode(data)
        .map_err(|e| Error::validation(format!("Invalid base64 image data: {}", e)))?;

    tokio::fs::create_dir_all(output_dir).await?;

    let path = output_dir.join(image_file_name(now_millis()));
    tokio::fs::write(&path, &bytes).await?;

    info!(path = %path.display(), bytes = bytes.len(), "Saved image to local file");
    Ok(path)
}

/// Read an image file and base64-encode it.
///
/// # Errors
/// Returns `Error::Validation` naming the path if the file does not exist,
/// or `Error::Io` for other read failures.
pub async fn read_image(path: &Path) -> Result<ImageData, Error> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::validation(format!(
                "Image file not found: {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let mime_type = mime_type_for_path(path);
    debug!(path = %path.display(), mime_type, bytes = bytes.len(), "Read source image");

    Ok(ImageData {
        data: BASE64.encode(&bytes),
        mime_type,
    })
}
