//! Pipeline DTOs
//!
//! The definition payload sent to the control plane when creating or
//! replacing a pipeline, and the parameters it is assembled from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::profile::CompilationProfile;
use crate::domain::runtime::RuntimeConfig;

/// Errors raised while assembling a pipeline definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("a pipeline name is required")]
    MissingName,

    #[error("SQL is required to create a pipeline")]
    MissingSql,
}

/// Program configuration sent alongside the SQL
///
/// Wraps the compilation profile in its own object so the service can add
/// more program options later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// `None` lets the compiler server choose
    #[serde(default)]
    profile: Option<CompilationProfile>,
}

impl ProgramConfig {
    pub fn profile(&self) -> Option<CompilationProfile> {
        self.profile
    }
}

impl From<CompilationProfile> for ProgramConfig {
    fn from(profile: CompilationProfile) -> Self {
        match profile {
            CompilationProfile::ServerDefault => ProgramConfig { profile: None },
            profile => ProgramConfig {
                profile: Some(profile),
            },
        }
    }
}

/// Request to create or replace a pipeline
///
/// Built only through [`DefinitionParams::assemble`], which guarantees the
/// name and SQL are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    name: String,
    description: String,
    sql: String,
    udf_rust: String,
    udf_toml: String,
    program_config: ProgramConfig,
    runtime_config: RuntimeConfig,
}

impl PipelineDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn udf_rust(&self) -> &str {
        &self.udf_rust
    }

    pub fn udf_toml(&self) -> &str {
        &self.udf_toml
    }

    pub fn program_config(&self) -> &ProgramConfig {
        &self.program_config
    }

    pub fn runtime_config(&self) -> &RuntimeConfig {
        &self.runtime_config
    }
}

/// Everything a pipeline definition is assembled from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionParams {
    pub name: Option<String>,
    pub sql: Option<String>,
    pub description: String,
    /// Rust source implementing user-defined functions
    pub udf_rust: String,
    /// Cargo dependencies of `udf_rust`, in TOML
    pub udf_toml: String,
    pub compilation_profile: CompilationProfile,
    pub runtime_config: RuntimeConfig,
}

impl DefinitionParams {
    /// Build the definition payload
    ///
    /// Pure: no I/O, the parameters are left untouched.
    pub fn assemble(&self) -> Result<PipelineDefinition, DefinitionError> {
        let (name, sql) = self.required()?;

        Ok(PipelineDefinition {
            name: name.to_string(),
            description: self.description.clone(),
            sql: sql.to_string(),
            udf_rust: self.udf_rust.clone(),
            udf_toml: self.udf_toml.clone(),
            program_config: ProgramConfig::from(self.compilation_profile),
            runtime_config: self.runtime_config.clone(),
        })
    }

    /// Name and SQL, both present and non-blank; the name is checked first
    fn required(&self) -> Result<(&str, &str), DefinitionError> {
        let name = non_blank(&self.name).ok_or(DefinitionError::MissingName)?;
        let sql = non_blank(&self.sql).ok_or(DefinitionError::MissingSql)?;
        Ok((name, sql))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
