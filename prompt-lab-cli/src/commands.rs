//! Subcommand execution

use anyhow::{Context as _, Result};
use prompt_lab_client::{build_client, LlmClient};
use prompt_lab_core::AppConfig;
use prompt_lab_workflow::{MethodKind, Pipeline, PipelineReport, StageContext};
use std::sync::Arc;
use tracing::info;

use crate::cli::Command;
use crate::config::{load_config, resolve_config_path, ConfigOverrides, CONFIG_ENV};

/// Resolve the configuration for a subcommand: file, then env, then flags
pub fn load_for(command: &Command) -> Result<AppConfig> {
    let args = command.args();
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let path = resolve_config_path(args.config.as_deref(), std::env::var(CONFIG_ENV).ok());
    let overrides = ConfigOverrides::from_env()?.merge(ConfigOverrides::from_args(args, &cwd));

    load_config(&path, &overrides)
}

fn client_for(config: &AppConfig) -> Result<Arc<dyn LlmClient>> {
    let client = build_client(&config.model).context("Failed to create LLM client")?;
    Ok(Arc::from(client))
}

/// The pipeline a subcommand runs
pub fn pipeline_for(command: &Command, config: &AppConfig) -> Result<Pipeline> {
    let pipeline = match command {
        Command::Full(_) => Pipeline::full(client_for(config)?),
        Command::RunAll(_) => Pipeline::run_all(client_for(config)?),
        Command::Baseline(_) => Pipeline::single(MethodKind::Baseline, client_for(config)?),
        Command::Cot(_) => Pipeline::single(MethodKind::Cot, client_for(config)?),
        Command::Fewshot(_) => Pipeline::single(MethodKind::FewShot, client_for(config)?),
        Command::Analyze(_) => Pipeline::analyze(),
        Command::Report(_) => Pipeline::report(),
    };
    Ok(pipeline)
}

pub async fn execute(command: &Command) -> Result<PipelineReport> {
    let config = load_for(command)?;
    let pipeline = pipeline_for(command, &config)?;

    info!(
        pipeline = pipeline.name(),
        experiment = %config.experiment.name,
        provider = %config.model.provider,
        "Starting"
    );

    let context = StageContext::new(config);
    Ok(pipeline.run(&context).await)
}
