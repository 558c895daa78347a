//! Error types for the common library.
//!
//! This module provides the error types, built on `thiserror`, for the
//! configuration layer and the tool handlers.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration (startup-fatal)
//! - `Error::Api`: Non-success responses from the Gemini API, transport
//!   failures, and error descriptors embedded in a response body
//! - `Error::RateLimited`: HTTP 429 from the Gemini API
//! - `Error::Validation`: Input validation failures
//! - `Error::Io`: File system operations

use thiserror::Error;

/// Fixed message returned when the Gemini API rejects a call with HTTP 429.
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. The image generation API allows \
     roughly 2-5 requests per minute; wait a minute before trying again.";

/// Unified error type for the Nano Banana MCP crates.
#[derive(Debug, Error)]
pub enum Error {
    /// API errors with HTTP status context.
    ///
    /// A status code of 0 means the request never produced an HTTP response.
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        /// HTTP status code, or the code carried by a response error descriptor
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// The API rejected the call with HTTP 429.
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new API error with status code and message.
    ///
    /// # Example
    ///
    /// ```
    /// use nano_banana_mcp_common::error::Error;
    ///
    /// let err = Error::api(503, "Service unavailable");
    /// assert!(err.to_string().contains("503"));
    /// assert!(err.to_string().contains("Service unavailable"));
    /// ```
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use nano_banana_mcp_common::error::Error;
    ///
    /// let err = Error::validation("prompt cannot be empty");
    /// assert!(err.to_string().contains("prompt cannot be empty"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            Error::RateLimited => Some(429),
            _ => None,
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables. They abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_includes_status() {
        let err = Error::api(500, "Internal error");
        let msg = err.to_string();
        assert!(msg.contains("500"), "Should contain status code");
        assert!(msg.contains("Internal error"), "Should contain message");
    }

    #[test]
    fn test_rate_limited_message_is_fixed() {
        let err = Error::RateLimited;
        assert_eq!(err.to_string(), RATE_LIMIT_MESSAGE);
        assert_eq!(err.status_code(), Some(429));
    }

    #[test]
    fn test_config_error_includes_var_name() {
        let err = ConfigError::missing_env_var("GEMINI_API_KEY");
        let msg = err.to_string();
        assert!(msg.contains("GEMINI_API_KEY"), "Should contain variable name");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_validation_error() {
        let err = Error::validation("prompt too long");
        let msg = err.to_string();
        assert!(msg.contains("Validation"), "Should mention validation");
        assert!(msg.contains("prompt too long"), "Should contain message");
    }
}
