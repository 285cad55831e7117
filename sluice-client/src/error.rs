//! Error types for the Sluice client

use sluice_core::dto::error::{ErrorResponse, UNKNOWN_PIPELINE_NAME};
use sluice_core::dto::pipeline::DefinitionError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the control plane
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The pipeline name does not resolve on the service
    #[error("Unknown pipeline: {0}")]
    UnknownPipeline(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Service-defined error code, when the body carried one
        code: Option<String>,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The base URL cannot have path segments appended
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// The service did not reach the expected state in time
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    /// Classify a non-2xx response
    ///
    /// JSON error bodies are decoded so the unknown-pipeline code becomes
    /// [`ClientError::UnknownPipeline`]. Anything else keeps the raw text.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(err) if err.is_unknown_pipeline() => Self::UnknownPipeline(err.message),
            Ok(err) => Self::api_error(status, Some(err.error_code), err.message),
            Err(_) => Self::api_error(status, None, body),
        }
    }

    /// Service-defined error code, if any
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::UnknownPipeline(_) => Some(UNKNOWN_PIPELINE_NAME),
            Self::ApiError { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownPipeline(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

/// Errors returned by the provisioning workflows
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Name or SQL missing; raised before any request is sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] DefinitionError),

    /// `create` found a pipeline with the same name
    #[error("Pipeline with name {0} already exists")]
    AlreadyExists(String),

    /// The control plane rejected a request
    #[error(transparent)]
    Remote(#[from] ClientError),
}
