//! Pipeline domain types

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::pipeline::ProgramConfig;

/// Pipeline descriptor
///
/// The service's representation of a registered pipeline. Returned by every
/// call that creates, updates or fetches a pipeline, and used as the handle
/// for later lifecycle operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDescriptor {
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: u64,
    #[serde(default, alias = "program_code")]
    pub sql: String,
    #[serde(default)]
    pub udf_rust: String,
    #[serde(default)]
    pub udf_toml: String,
    #[serde(default)]
    pub program_config: ProgramConfig,
    /// Runtime configuration as stored by the service, defaults included
    #[serde(default)]
    pub runtime_config: serde_json::Value,
    #[serde(default)]
    pub program_status: ProgramStatus,
    #[serde(default)]
    pub deployment_status: DeploymentStatus,
    #[serde(default)]
    pub deployment_error: Option<serde_json::Value>,
    #[serde(default)]
    pub storage_status: StorageStatus,
}

/// Deployment status of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeploymentStatus {
    /// Not running; no compute resources are held.
    #[default]
    #[serde(alias = "Shutdown")]
    Stopped,
    /// Compute resources are being provisioned.
    Provisioning,
    /// Query engine and connectors are initializing.
    Initializing,
    /// Fully initialized, processing is paused.
    Paused,
    /// Processing data.
    Running,
    /// Was initialized, but the latest status check could not reach it.
    Unavailable,
    /// Shutting down.
    #[serde(alias = "ShuttingDown")]
    Stopping,
    /// Suspended to storage.
    Suspended,
    /// Failed; stays here until stopped.
    Failed,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl DeploymentStatus {
    pub fn is_stopped(&self) -> bool {
        matches!(self, DeploymentStatus::Stopped)
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Compilation status of a pipeline's program
///
/// The error variants carry the service's diagnostic verbatim. Statuses this
/// client does not know, with or without a payload, decode as `Unknown`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "LenientProgramStatus")]
pub enum ProgramStatus {
    #[default]
    Pending,
    CompilingSql,
    SqlCompiled,
    CompilingRust,
    Success,
    SqlError(serde_json::Value),
    RustError(serde_json::Value),
    SystemError(serde_json::Value),
    Unknown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientProgramStatus {
    Known(KnownProgramStatus),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
enum KnownProgramStatus {
    Pending,
    CompilingSql,
    SqlCompiled,
    CompilingRust,
    Success,
    SqlError(serde_json::Value),
    RustError(serde_json::Value),
    SystemError(serde_json::Value),
}

impl From<LenientProgramStatus> for ProgramStatus {
    fn from(status: LenientProgramStatus) -> Self {
        match status {
            LenientProgramStatus::Known(known) => match known {
                KnownProgramStatus::Pending => ProgramStatus::Pending,
                KnownProgramStatus::CompilingSql => ProgramStatus::CompilingSql,
                KnownProgramStatus::SqlCompiled => ProgramStatus::SqlCompiled,
                KnownProgramStatus::CompilingRust => ProgramStatus::CompilingRust,
                KnownProgramStatus::Success => ProgramStatus::Success,
                KnownProgramStatus::SqlError(e) => ProgramStatus::SqlError(e),
                KnownProgramStatus::RustError(e) => ProgramStatus::RustError(e),
                KnownProgramStatus::SystemError(e) => ProgramStatus::SystemError(e),
            },
            LenientProgramStatus::Other(_) => ProgramStatus::Unknown,
        }
    }
}

impl ProgramStatus {
    /// Whether compilation failed
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// The compilation diagnostic, if compilation failed
    pub fn error(&self) -> Option<&serde_json::Value> {
        match self {
            ProgramStatus::SqlError(e) | ProgramStatus::RustError(e) | ProgramStatus::SystemError(e) => {
                Some(e)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramStatus::Pending => write!(f, "Pending"),
            ProgramStatus::CompilingSql => write!(f, "CompilingSql"),
            ProgramStatus::SqlCompiled => write!(f, "SqlCompiled"),
            ProgramStatus::CompilingRust => write!(f, "CompilingRust"),
            ProgramStatus::Success => write!(f, "Success"),
            ProgramStatus::SqlError(e) => write!(f, "SqlError: ({})", e),
            ProgramStatus::RustError(e) => write!(f, "RustError: ({})", e),
            ProgramStatus::SystemError(e) => write!(f, "SystemError: ({})", e),
            ProgramStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Status of a pipeline's persisted storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageStatus {
    #[default]
    Cleared,
    InUse,
    Clearing,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl StorageStatus {
    pub fn is_cleared(&self) -> bool {
        matches!(self, StorageStatus::Cleared)
    }
}
