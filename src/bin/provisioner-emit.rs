// Copyright (c) 2025 - Cowboy AI, Inc.

//! Provisioner Emit
//!
//! Runs a single lifecycle action outside of the lifecycle host and prints
//! the resulting response as JSON.
//!
//! Provider settings come from `--provider` (a JSON provider block) and fall
//! back to the `MASSDRIVER_*` environment variables.
//!
//! ```text
//! provisioner-emit --resource alarm --operation create --input alarm.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use provisioner_events::{
    AlarmResource, ArtifactResource, EnvSettings, Operation, Provider, ProviderConfig,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResourceKind {
    Artifact,
    Alarm,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OperationArg {
    Create,
    Update,
    Delete,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Create => Operation::Create,
            OperationArg::Update => Operation::Update,
            OperationArg::Delete => Operation::Delete,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "provisioner-emit", version, about = "Publish one lifecycle event")]
struct Args {
    /// Kind of resource described by --input
    #[arg(long, value_enum)]
    resource: ResourceKind,

    #[arg(long, value_enum)]
    operation: OperationArg,

    /// Resource state as JSON
    #[arg(long)]
    input: PathBuf,

    /// Provider block as JSON
    #[arg(long)]
    provider: Option<PathBuf>,

    /// Identity recorded by a previous create
    #[arg(long, env = "PROVISIONER_RESOURCE_ID")]
    resource_id: Option<String>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    debug!(?args, "Arguments parsed");

    let config = match &args.provider {
        Some(path) => read_json::<ProviderConfig>(path)?,
        None => ProviderConfig::default(),
    }
    .with_env_defaults(&EnvSettings::from_env());

    let provider = Provider::configure(config).context("Unable to create Massdriver client")?;
    info!(
        transport = provider.pipeline().transport().name(),
        "Provider configured"
    );

    let operation = Operation::from(args.operation);
    let resource_id = args.resource_id.as_deref();

    let response = match args.resource {
        ResourceKind::Artifact => {
            let resource: ArtifactResource = read_json(&args.input)?;
            provider.apply_artifact(operation, &resource, resource_id).await
        }
        ResourceKind::Alarm => {
            let resource: AlarmResource = read_json(&args.input)?;
            provider.apply_alarm(operation, &resource, resource_id).await
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to render response")?
    );

    Ok(if response.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
