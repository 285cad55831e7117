//! In-memory control plane for tests
//!
//! Records every call and lets tests make individual operations fail.

use async_trait::async_trait;
use sluice_core::domain::pipeline::{
    DeploymentStatus, PipelineDescriptor, ProgramStatus, StorageStatus,
};
use sluice_core::dto::pipeline::PipelineDefinition;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::api::PipelineApi;
use crate::error::{ClientError, Result};

/// A call received by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Create(String),
    CreateOrUpdate(String),
    Start(String),
    Stop { name: String, force: bool },
    Clear(String),
    Delete(String),
}

/// Operations a test can make fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Create,
    CreateOrUpdate,
    Stop,
    Clear,
}

#[derive(Debug, Default)]
struct State {
    pipelines: HashMap<String, PipelineDescriptor>,
    calls: Vec<Call>,
    failures: HashMap<Op, (u16, String)>,
    settling: HashMap<String, (usize, DeploymentStatus)>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeControlPlane {
    state: Arc<Mutex<State>>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pipeline in the given deployment state
    pub fn with_pipeline(self, name: &str, status: DeploymentStatus) -> Self {
        let descriptor = PipelineDescriptor {
            deployment_status: status,
            storage_status: StorageStatus::InUse,
            ..descriptor(name)
        };
        self.state
            .lock()
            .unwrap()
            .pipelines
            .insert(name.to_string(), descriptor);
        self
    }

    /// Make every call to `op` fail with the given status and error code
    pub fn failing(self, op: Op, status: u16, code: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op, (status, code.to_string()));
        self
    }

    /// Move the pipeline to `status` once it has been fetched `polls` times
    pub fn settling(self, name: &str, polls: usize, status: DeploymentStatus) -> Self {
        self.state
            .lock()
            .unwrap()
            .settling
            .insert(name.to_string(), (polls, status));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn pipeline(&self, name: &str) -> Option<PipelineDescriptor> {
        self.state.lock().unwrap().pipelines.get(name).cloned()
    }

    fn record(&self, call: Call, op: Option<Op>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match op.and_then(|op| state.failures.get(&op)) {
            Some((status, code)) => Err(ClientError::api_error(
                *status,
                Some(code.clone()),
                format!("injected {} failure", code),
            )),
            None => Ok(()),
        }
    }
}

fn descriptor(name: &str) -> PipelineDescriptor {
    PipelineDescriptor {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        created_at: None,
        version: 1,
        sql: String::new(),
        udf_rust: String::new(),
        udf_toml: String::new(),
        program_config: Default::default(),
        runtime_config: serde_json::Value::Null,
        program_status: ProgramStatus::Pending,
        deployment_status: DeploymentStatus::Stopped,
        deployment_error: None,
        storage_status: StorageStatus::Cleared,
    }
}

fn from_definition(definition: &PipelineDefinition, version: u64) -> PipelineDescriptor {
    PipelineDescriptor {
        description: definition.description().to_string(),
        version,
        sql: definition.sql().to_string(),
        udf_rust: definition.udf_rust().to_string(),
        udf_toml: definition.udf_toml().to_string(),
        program_config: definition.program_config().clone(),
        runtime_config: serde_json::to_value(definition.runtime_config()).unwrap(),
        ..descriptor(definition.name())
    }
}

fn unknown(name: &str) -> ClientError {
    ClientError::UnknownPipeline(format!("Unknown pipeline name '{}'", name))
}

#[async_trait]
impl PipelineApi for FakeControlPlane {
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDescriptor> {
        self.record(Call::Get(name.to_string()), Some(Op::Get))?;

        let mut state = self.state.lock().unwrap();
        let settled = match state.settling.get_mut(name) {
            Some((polls, status)) => {
                *polls = polls.saturating_sub(1);
                (*polls == 0).then_some(*status)
            }
            None => None,
        };
        if let Some(status) = settled {
            state.settling.remove(name);
            if let Some(pipeline) = state.pipelines.get_mut(name) {
                pipeline.deployment_status = status;
            }
        }
        state.pipelines.get(name).cloned().ok_or_else(|| unknown(name))
    }

    async fn create_pipeline(&self, definition: &PipelineDefinition) -> Result<PipelineDescriptor> {
        self.record(Call::Create(definition.name().to_string()), Some(Op::Create))?;

        let mut state = self.state.lock().unwrap();
        if state.pipelines.contains_key(definition.name()) {
            return Err(ClientError::api_error(
                409,
                Some("DuplicateName".to_string()),
                "An entity with this name already exists",
            ));
        }
        let created = from_definition(definition, 1);
        state
            .pipelines
            .insert(definition.name().to_string(), created.clone());
        Ok(created)
    }

    async fn create_or_update_pipeline(
        &self,
        definition: &PipelineDefinition,
    ) -> Result<PipelineDescriptor> {
        self.record(
            Call::CreateOrUpdate(definition.name().to_string()),
            Some(Op::CreateOrUpdate),
        )?;

        let mut state = self.state.lock().unwrap();
        let version = state
            .pipelines
            .get(definition.name())
            .map_or(1, |existing| existing.version + 1);
        let updated = from_definition(definition, version);
        state
            .pipelines
            .insert(definition.name().to_string(), updated.clone());
        Ok(updated)
    }

    async fn start_pipeline(&self, name: &str) -> Result<()> {
        self.record(Call::Start(name.to_string()), None)?;

        let mut state = self.state.lock().unwrap();
        let pipeline = state.pipelines.get_mut(name).ok_or_else(|| unknown(name))?;
        pipeline.deployment_status = DeploymentStatus::Running;
        pipeline.storage_status = StorageStatus::InUse;
        Ok(())
    }

    async fn stop_pipeline(&self, name: &str, force: bool) -> Result<()> {
        self.record(
            Call::Stop {
                name: name.to_string(),
                force,
            },
            Some(Op::Stop),
        )?;

        let mut state = self.state.lock().unwrap();
        let pipeline = state.pipelines.get_mut(name).ok_or_else(|| unknown(name))?;
        pipeline.deployment_status = DeploymentStatus::Stopped;
        Ok(())
    }

    async fn clear_storage(&self, name: &str) -> Result<()> {
        self.record(Call::Clear(name.to_string()), Some(Op::Clear))?;

        let mut state = self.state.lock().unwrap();
        let pipeline = state.pipelines.get_mut(name).ok_or_else(|| unknown(name))?;
        if !pipeline.deployment_status.is_stopped() {
            return Err(ClientError::api_error(
                400,
                Some("StorageStatusImmutableUnlessStopped".to_string()),
                "Storage can only be cleared when the pipeline is stopped",
            ));
        }
        pipeline.storage_status = StorageStatus::Cleared;
        Ok(())
    }

    async fn delete_pipeline(&self, name: &str) -> Result<()> {
        self.record(Call::Delete(name.to_string()), None)?;

        let mut state = self.state.lock().unwrap();
        state.pipelines.remove(name).map(|_| ()).ok_or_else(|| unknown(name))
    }
}
