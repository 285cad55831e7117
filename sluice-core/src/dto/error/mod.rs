//! Error body returned by the control plane

use serde::{Deserialize, Serialize};

/// Error code the service uses when a pipeline name does not resolve
pub const UNKNOWN_PIPELINE_NAME: &str = "UnknownPipelineName";

/// Body of every non-2xx response from the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description
    pub message: String,

    /// Machine-readable error code (e.g. "UnknownPipelineName")
    pub error_code: String,

    /// Code-specific details
    #[serde(default)]
    pub details: serde_json::Value,
}

impl ErrorResponse {
    /// Whether the error reports an unknown pipeline name
    pub fn is_unknown_pipeline(&self) -> bool {
        self.error_code == UNKNOWN_PIPELINE_NAME
    }
}
