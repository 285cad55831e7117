//! Pipeline command handlers
//!
//! Handles all pipeline-related CLI commands: creation (optionally replacing
//! an existing pipeline), listing, viewing, lifecycle transitions and deletion.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use sluice_client::{ControlPlaneClient, PipelineApi, PipelineBuilder, ProvisionError};
use sluice_core::domain::pipeline::{DeploymentStatus, PipelineDescriptor};
use sluice_core::domain::profile::CompilationProfile;
use sluice_core::domain::runtime::{RuntimeConfig, StorageOptions};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Create a pipeline from a SQL file
    Create {
        /// Pipeline name
        name: String,

        /// Path to the SQL program
        #[arg(short, long)]
        sql: PathBuf,

        /// Path to Rust code implementing UDFs
        #[arg(long)]
        udf_rust: Option<PathBuf>,

        /// Path to the UDF dependencies (Cargo TOML)
        #[arg(long)]
        udf_toml: Option<PathBuf>,

        /// Pipeline description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Compilation profile (dev, unoptimized, optimized, server-default)
        #[arg(long, default_value = "optimized")]
        profile: CompilationProfile,

        /// Number of worker threads
        #[arg(long)]
        workers: Option<u16>,

        /// Enable storage
        #[arg(long)]
        storage: bool,

        /// Stop, clear and overwrite an existing pipeline with the same name
        #[arg(long)]
        replace: bool,
    },
    /// List all pipelines
    List,
    /// Get pipeline details
    Get {
        /// Pipeline name
        name: String,

        /// Print the raw descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a pipeline
    Start {
        /// Pipeline name
        name: String,
    },
    /// Stop a pipeline
    Stop {
        /// Pipeline name
        name: String,

        /// Terminate immediately instead of draining
        #[arg(short, long)]
        force: bool,
    },
    /// Clear a stopped pipeline's storage
    ClearStorage {
        /// Pipeline name
        name: String,
    },
    /// Delete a pipeline
    Delete {
        /// Pipeline name
        name: String,
    },
}

/// Handle pipeline commands
///
/// Routes pipeline subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The pipeline command to execute
/// * `config` - The CLI configuration
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        PipelineCommands::Create {
            name,
            sql,
            udf_rust,
            udf_toml,
            description,
            profile,
            workers,
            storage,
            replace,
        } => {
            let builder = PipelineBuilder::new(client)
                .name(name)
                .sql(read_source(&sql)?)
                .udf_rust(read_optional_source(udf_rust.as_deref())?)
                .udf_toml(read_optional_source(udf_toml.as_deref())?)
                .description(description)
                .compilation_profile(profile)
                .runtime_config(runtime_config(workers, storage));

            create_pipeline(builder, replace).await
        }
        PipelineCommands::List => list_pipelines(&client).await,
        PipelineCommands::Get { name, json } => get_pipeline(&client, &name, json).await,
        PipelineCommands::Start { name } => {
            client.start_pipeline(&name).await?;
            println!("{}", format!("✓ Pipeline {} started", name).green().bold());
            Ok(())
        }
        PipelineCommands::Stop { name, force } => {
            client.stop_pipeline(&name, force).await?;
            println!("{}", format!("✓ Pipeline {} stopped", name).green().bold());
            Ok(())
        }
        PipelineCommands::ClearStorage { name } => {
            client.clear_storage(&name).await?;
            println!(
                "{}",
                format!("✓ Storage of pipeline {} cleared", name)
                    .green()
                    .bold()
            );
            Ok(())
        }
        PipelineCommands::Delete { name } => {
            client.delete_pipeline(&name).await?;
            println!(
                "{}",
                format!("✓ Pipeline {} deleted successfully!", name)
                    .green()
                    .bold()
            );
            Ok(())
        }
    }
}

/// Read a source file
fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Read a source file if a path was given, empty otherwise
fn read_optional_source(path: Option<&Path>) -> Result<String> {
    path.map(read_source).transpose().map(Option::unwrap_or_default)
}

/// Runtime configuration from CLI flags; unset flags stay absent
fn runtime_config(workers: Option<u16>, storage: bool) -> RuntimeConfig {
    let config = RuntimeConfig {
        workers,
        ..Default::default()
    };
    if storage {
        config.with_storage(StorageOptions::default())
    } else {
        config
    }
}

/// Create (or replace) a pipeline and report the result
async fn create_pipeline(builder: PipelineBuilder<ControlPlaneClient>, replace: bool) -> Result<()> {
    let result = if replace {
        builder.create_or_replace().await
    } else {
        builder.create().await
    };

    let pipeline = match result {
        Ok(pipeline) => pipeline,
        Err(ProvisionError::AlreadyExists(name)) => {
            bail!(
                "Pipeline {} already exists (use --replace to overwrite it)",
                name
            )
        }
        Err(e) => return Err(e.into()),
    };

    let descriptor = pipeline.descriptor();
    let verb = if replace { "created or replaced" } else { "created" };
    println!("{}", format!("✓ Pipeline {}!", verb).green().bold());
    println!("  ID:      {}", descriptor.id.to_string().cyan());
    println!("  Name:    {}", descriptor.name.bold());
    println!("  Version: {}", descriptor.version.to_string().dimmed());
    println!(
        "  Profile: {}",
        descriptor
            .program_config
            .profile()
            .unwrap_or(CompilationProfile::ServerDefault)
            .to_string()
            .dimmed()
    );

    Ok(())
}

/// List all pipelines
async fn list_pipelines(client: &ControlPlaneClient) -> Result<()> {
    let pipelines = client.list_pipelines().await?;

    if pipelines.is_empty() {
        println!("{}", "No pipelines found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} pipeline(s):", pipelines.len()).bold()
        );
        println!();
        for pipeline in pipelines {
            print_pipeline_summary(&pipeline);
        }
    }

    Ok(())
}

/// Get and display a single pipeline
async fn get_pipeline(client: &ControlPlaneClient, name: &str, json: bool) -> Result<()> {
    let pipeline = client.get_pipeline(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
    } else {
        print_pipeline_details(&pipeline);
    }

    Ok(())
}

/// Colorize deployment status for display
fn colorize_status(status: DeploymentStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        DeploymentStatus::Running => status_str.green(),
        DeploymentStatus::Failed | DeploymentStatus::Unavailable => status_str.red(),
        DeploymentStatus::Stopped => status_str.dimmed(),
        _ => status_str.yellow(),
    }
}

/// Print a pipeline summary
fn print_pipeline_summary(pipeline: &PipelineDescriptor) {
    println!("  {} {}", "▸".cyan(), pipeline.name.bold());
    println!("    Status:  {}", colorize_status(pipeline.deployment_status));
    println!("    Program: {}", pipeline.program_status.to_string().dimmed());
    if !pipeline.description.is_empty() {
        println!("    Description: {}", pipeline.description.dimmed());
    }
    println!();
}

/// Print detailed pipeline information
fn print_pipeline_details(pipeline: &PipelineDescriptor) {
    println!("{}", "Pipeline Details:".bold());
    println!("  ID:          {}", pipeline.id.to_string().cyan());
    println!("  Name:        {}", pipeline.name.bold());
    if !pipeline.description.is_empty() {
        println!("  Description: {}", pipeline.description);
    }
    if let Some(created_at) = pipeline.created_at {
        println!("  Created:     {}", created_at.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("  Version:     {}", pipeline.version);
    println!("  Status:      {}", colorize_status(pipeline.deployment_status));
    println!("  Program:     {}", pipeline.program_status);
    println!("  Storage:     {:?}", pipeline.storage_status);
    if let Some(error) = &pipeline.deployment_error {
        println!("  Error:       {}", error.to_string().red());
    }

    println!("\n{}", "SQL:".bold());
    println!("{}", "─".repeat(80).dimmed());
    println!("{}", pipeline.sql);
    println!("{}", "─".repeat(80).dimmed());

    if !pipeline.udf_rust.is_empty() {
        println!("\n{}", "UDF (Rust):".bold());
        println!("{}", pipeline.udf_rust);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "CREATE TABLE t (x INT);").unwrap();

        assert_eq!(read_source(file.path()).unwrap(), "CREATE TABLE t (x INT);");
    }

    #[test]
    fn test_read_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(&dir.path().join("missing.sql")).unwrap_err();

        assert!(err.to_string().contains("missing.sql"));
    }

    #[test]
    fn test_read_optional_source_defaults_to_empty() {
        assert_eq!(read_optional_source(None).unwrap(), "");
    }

    #[test]
    fn test_runtime_config_from_flags() {
        assert_eq!(runtime_config(None, false), RuntimeConfig::default());

        let config = runtime_config(Some(4), true);
        assert_eq!(config.workers, Some(4));
        assert_eq!(config.storage, Some(StorageOptions::default()));
        assert!(config.resources.is_none());
    }

    #[test]
    fn test_parse_create_command() {
        use clap::Parser;

        #[derive(Parser)]
        struct TestCli {
            #[command(subcommand)]
            command: PipelineCommands,
        }

        let cli = TestCli::parse_from([
            "sluice", "create", "p1", "--sql", "p1.sql", "--profile", "dev", "--replace",
        ]);

        match cli.command {
            PipelineCommands::Create {
                name,
                profile,
                replace,
                storage,
                ..
            } => {
                assert_eq!(name, "p1");
                assert_eq!(profile, CompilationProfile::Dev);
                assert!(replace);
                assert!(!storage);
            }
            _ => panic!("expected create command"),
        }
    }
}
