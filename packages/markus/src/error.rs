//! Error types for the Markus client.
//!
//! Every failure surfaces as a `MarkusError`. Absent optional response
//! fields are not errors; they are simply omitted from the result.

use thiserror::Error;

/// Main error type for the Markus client library.
#[derive(Debug, Error)]
pub enum MarkusError {
    /// The operation name is not registered.
    #[error("Unknown operation: '{0}'")]
    UnknownOperation(String),

    /// A call-time argument could not be converted to its wire format.
    #[error("Invalid argument '{key}': {message}")]
    InvalidArgument { key: String, message: String },

    /// The configured base URL is unusable.
    #[error("Invalid base URL: '{0}'. Expected an absolute http(s) URL")]
    InvalidBaseUrl(String),

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request could not be completed at the network level.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The XML is missing a structurally required node or holds an invalid value.
    #[error("Malformed response: {message} (in {context})")]
    MalformedResponse { context: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl MarkusError {
    /// Shorthand for a `MalformedResponse` error.
    pub(crate) fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidArgument` error.
    pub(crate) fn invalid_argument(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Whether the failure happened while talking to the server.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Status { .. } | Self::Http(_)
        )
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, MarkusError>;
