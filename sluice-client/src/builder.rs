//! Pipeline provisioning
//!
//! [`PipelineBuilder`] collects the definition parameters and runs one of two
//! workflows against the control plane:
//!
//! - `create` refuses to touch an existing pipeline and fails with
//!   [`ProvisionError::AlreadyExists`].
//! - `create_or_replace` force-stops and clears an existing pipeline, then
//!   overwrites its definition. Failures while tearing down the old pipeline
//!   are logged and ignored.
//!
//! Both validate the name and SQL before any request is sent.

use sluice_core::domain::profile::CompilationProfile;
use sluice_core::domain::runtime::RuntimeConfig;
use sluice_core::dto::pipeline::{DefinitionError, DefinitionParams, PipelineDefinition};
use tracing::{debug, info, warn};

use crate::api::PipelineApi;
use crate::error::{ClientError, ProvisionError};
use crate::pipeline::Pipeline;

/// Result type alias for provisioning workflows
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Builder for creating or replacing a pipeline
///
/// # Example
/// ```no_run
/// # use sluice_client::{ControlPlaneClient, PipelineBuilder};
/// # use sluice_core::domain::profile::CompilationProfile;
/// # use sluice_core::domain::runtime::RuntimeConfig;
/// # async fn example() -> anyhow::Result<()> {
/// let client = ControlPlaneClient::new("http://localhost:8080");
/// let pipeline = PipelineBuilder::new(client)
///     .name("orders")
///     .sql("CREATE TABLE orders (id INT);")
///     .compilation_profile(CompilationProfile::Unoptimized)
///     .runtime_config(RuntimeConfig::default().with_workers(4))
///     .create()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder<C> {
    client: C,
    params: DefinitionParams,
}

impl<C: PipelineApi + Clone> PipelineBuilder<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            params: DefinitionParams::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.params.name = Some(name.into());
        self
    }

    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.params.sql = Some(sql.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.params.description = description.into();
        self
    }

    /// Rust code implementing user-defined functions
    pub fn udf_rust(mut self, udf_rust: impl Into<String>) -> Self {
        self.params.udf_rust = udf_rust.into();
        self
    }

    /// Dependencies of the UDF code, in Cargo TOML format
    pub fn udf_toml(mut self, udf_toml: impl Into<String>) -> Self {
        self.params.udf_toml = udf_toml.into();
        self
    }

    pub fn compilation_profile(mut self, profile: CompilationProfile) -> Self {
        self.params.compilation_profile = profile;
        self
    }

    pub fn runtime_config(mut self, runtime_config: RuntimeConfig) -> Self {
        self.params.runtime_config = runtime_config;
        self
    }

    /// Assemble the definition payload without contacting the control plane
    pub fn definition(&self) -> std::result::Result<PipelineDefinition, DefinitionError> {
        self.params.assemble()
    }

    /// Create the pipeline if it does not exist
    ///
    /// # Errors
    /// - [`ProvisionError::InvalidArgument`] if the name or SQL is missing
    /// - [`ProvisionError::AlreadyExists`] if a pipeline with this name exists
    /// - [`ProvisionError::Remote`] for any other control-plane failure
    pub async fn create(&self) -> Result<Pipeline<C>> {
        let definition = self.definition()?;
        let name = definition.name();

        match self.client.get_pipeline(name).await {
            Ok(_) => return Err(ProvisionError::AlreadyExists(name.to_string())),
            Err(ClientError::UnknownPipeline(_)) => {
                debug!(pipeline = name, "no existing pipeline, creating");
            }
            Err(e) => return Err(e.into()),
        }

        let descriptor = self.client.create_pipeline(&definition).await?;
        info!(pipeline = name, id = %descriptor.id, "pipeline created");

        Ok(Pipeline::new(self.client.clone(), descriptor))
    }

    /// Create the pipeline, replacing any existing pipeline with this name
    ///
    /// An existing pipeline is force-stopped and its storage cleared before
    /// the new definition is written. Control-plane errors during that
    /// teardown are logged and otherwise ignored, so an unreachable or
    /// misbehaving service can look like "no existing pipeline" here; the
    /// final create-or-update call still reports its own failure.
    ///
    /// # Errors
    /// - [`ProvisionError::InvalidArgument`] if the name or SQL is missing
    /// - [`ProvisionError::Remote`] if the create-or-update call fails
    pub async fn create_or_replace(&self) -> Result<Pipeline<C>> {
        let definition = self.definition()?;
        let name = definition.name();

        if let Err(e) = self.tear_down(name).await {
            if e.is_not_found() {
                debug!(pipeline = name, "no existing pipeline to replace");
            } else {
                warn!(
                    pipeline = name,
                    error = %e,
                    "teardown of existing pipeline failed, replacing anyway"
                );
            }
        }

        let descriptor = self.client.create_or_update_pipeline(&definition).await?;
        info!(
            pipeline = name,
            id = %descriptor.id,
            version = descriptor.version,
            "pipeline created or replaced"
        );

        Ok(Pipeline::new(self.client.clone(), descriptor))
    }

    /// Force-stop an existing pipeline and clear its storage
    async fn tear_down(&self, name: &str) -> std::result::Result<(), ClientError> {
        let existing = self.client.get_pipeline(name).await?;
        info!(
            pipeline = name,
            status = %existing.deployment_status,
            "stopping existing pipeline for replacement"
        );

        self.client.stop_pipeline(name, true).await?;
        self.client.clear_storage(name).await
    }
}
