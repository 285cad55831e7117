//! Runtime configuration
//!
//! Every option is modeled as an `Option`. Options left at `None` are never
//! serialized, so the service applies its own default for them.

use serde::{Deserialize, Serialize};

/// Operational options applied when a pipeline executes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Number of worker threads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<u16>,

    /// Storage settings; presence enables storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageOptions>,

    /// Fault tolerance settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_tolerance: Option<FaultToleranceConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_profiler: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracing: Option<bool>,

    /// Jaeger endpoint traces are sent to when `tracing` is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracing_endpoint_jaeger: Option<String>,

    /// Minimal input batch size before processing starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_batch_size_records: Option<u64>,

    /// Upper bound on how long input is buffered to reach `min_batch_size_records`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buffering_delay_usecs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_resolution_usecs: Option<u64>,

    /// Resource reservations and limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,

    /// How long the service waits for the pipeline to come up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_timeout_secs: Option<u64>,
}

impl RuntimeConfig {
    /// Set the number of workers
    pub fn with_workers(mut self, workers: u16) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Enable storage with the given options
    pub fn with_storage(mut self, storage: StorageOptions) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the fault tolerance configuration
    pub fn with_fault_tolerance(mut self, fault_tolerance: FaultToleranceConfig) -> Self {
        self.fault_tolerance = Some(fault_tolerance);
        self
    }

    pub fn with_cpu_profiler(mut self, enabled: bool) -> Self {
        self.cpu_profiler = Some(enabled);
        self
    }

    /// Enable or disable tracing, optionally pointing at a Jaeger endpoint
    pub fn with_tracing(mut self, enabled: bool, jaeger_endpoint: Option<String>) -> Self {
        self.tracing = Some(enabled);
        self.tracing_endpoint_jaeger = jaeger_endpoint;
        self
    }

    pub fn with_min_batch_size_records(mut self, records: u64) -> Self {
        self.min_batch_size_records = Some(records);
        self
    }

    pub fn with_max_buffering_delay_usecs(mut self, usecs: u64) -> Self {
        self.max_buffering_delay_usecs = Some(usecs);
        self
    }

    pub fn with_clock_resolution_usecs(mut self, usecs: u64) -> Self {
        self.clock_resolution_usecs = Some(usecs);
        self
    }

    /// Set resource reservations and limits
    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn with_provisioning_timeout_secs(mut self, secs: u64) -> Self {
        self.provisioning_timeout_secs = Some(secs);
        self
    }
}

/// Resource reservations and limits for a pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cores_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cores_max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mb_min: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mb_max: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_mb_max: Option<u64>,

    /// Kubernetes storage class of the pipeline's volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

/// Storage settings for a pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageOptions {
    /// Batches smaller than this stay in memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_storage_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<StorageCompression>,

    /// Size of the storage cache in MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_mib: Option<u64>,
}

/// Compression applied to data written to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageCompression {
    Default,
    None,
    Snappy,
}

/// Fault tolerance settings for a pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultToleranceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<FaultToleranceModel>,

    /// Interval between automatic checkpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_interval_secs: Option<u64>,
}

/// Delivery guarantee the pipeline provides across restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultToleranceModel {
    AtLeastOnce,
    ExactlyOnce,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_serializes_to_empty_object() {
        let value = serde_json::to_value(RuntimeConfig::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_only_present_options_are_serialized() {
        let config = RuntimeConfig::default()
            .with_workers(4)
            .with_storage(StorageOptions::default())
            .with_tracing(false, None);

        let value = serde_json::to_value(config).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(value["workers"], json!(4));
        assert_eq!(value["storage"], json!({}));
        assert_eq!(value["tracing"], json!(false));
        assert_eq!(keys.len(), 3);
        assert!(!keys.contains(&"tracing_endpoint_jaeger"));
    }

    #[test]
    fn test_nested_options_are_sparse() {
        let config = RuntimeConfig::default().with_resources(Resources {
            memory_mb_max: Some(2048),
            ..Default::default()
        });

        let value = serde_json::to_value(config).unwrap();
        assert_eq!(value, json!({ "resources": { "memory_mb_max": 2048 } }));
    }

    #[test]
    fn test_fault_tolerance_wire_format() {
        let config = RuntimeConfig::default().with_fault_tolerance(FaultToleranceConfig {
            model: Some(FaultToleranceModel::ExactlyOnce),
            checkpoint_interval_secs: Some(60),
        });

        let value = serde_json::to_value(config).unwrap();
        assert_eq!(
            value["fault_tolerance"],
            json!({ "model": "exactly_once", "checkpoint_interval_secs": 60 })
        );
    }

    #[test]
    fn test_deserialize_fills_missing_options_with_none() {
        let config: RuntimeConfig = serde_json::from_value(json!({ "workers": 8 })).unwrap();
        assert_eq!(config, RuntimeConfig::default().with_workers(8));
    }
}
