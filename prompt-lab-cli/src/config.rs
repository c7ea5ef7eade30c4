//! Experiment configuration loading

use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, File, FileFormat};
use prompt_lab_core::{AppConfig, Provider};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::RunArgs;

pub const CONFIG_ENV: &str = "PROMPT_LAB_CONFIG";
pub const PROVIDER_ENV: &str = "PROMPT_LAB_PROVIDER";
pub const DATASET_PATH_ENV: &str = "PROMPT_LAB_DATASET_PATH";
pub const OUTPUT_DIR_ENV: &str = "PROMPT_LAB_OUTPUT_DIR";

pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid value for {name}: {message}")]
    InvalidEnv { name: &'static str, message: String },
}

/// Config file to load: the explicit path, else `$PROMPT_LAB_CONFIG`, else the default
pub fn resolve_config_path(explicit: Option<&Path>, env_value: Option<String>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Values that replace what the config file says
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub provider: Option<Provider>,
    pub dataset_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Overrides from the `PROMPT_LAB_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = get(PROVIDER_ENV)
            .map(|v| {
                v.parse::<Provider>().map_err(|e| ConfigError::InvalidEnv {
                    name: PROVIDER_ENV,
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            provider,
            dataset_path: get(DATASET_PATH_ENV).map(PathBuf::from),
            output_dir: get(OUTPUT_DIR_ENV).map(PathBuf::from),
        })
    }

    /// Overrides from command-line flags. Relative paths are anchored at `cwd`.
    pub fn from_args(args: &RunArgs, cwd: &Path) -> Self {
        Self {
            provider: args.provider,
            dataset_path: args.dataset_path.as_ref().map(|p| cwd.join(p)),
            output_dir: args.output_dir.as_ref().map(|p| cwd.join(p)),
        }
    }

    /// Combine with `other`, whose values win where both are set
    pub fn merge(self, other: ConfigOverrides) -> Self {
        Self {
            provider: other.provider.or(self.provider),
            dataset_path: other.dataset_path.or(self.dataset_path),
            output_dir: other.output_dir.or(self.output_dir),
        }
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Load, override and validate the configuration at `path`
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<AppConfig> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }

    let dataset = overrides.dataset_path.as_ref().map(|_| "file".to_string());

    let config: AppConfig = ConfigLoader::builder()
        .add_source(File::from(path).format(FileFormat::Yaml).required(true))
        .set_override_option("model.provider", overrides.provider.map(|p| p.as_str().to_string()))?
        .set_override_option("experiment.dataset", dataset)?
        .set_override_option(
            "experiment.dataset_path",
            overrides.dataset_path.as_deref().map(path_string),
        )?
        .set_override_option(
            "experiment.output_dir",
            overrides.output_dir.as_deref().map(path_string),
        )?
        .build()
        .with_context(|| format!("Failed to read config from {}", path.display()))?
        .try_deserialize()
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    let config = config
        .validated()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        provider = %config.model.provider,
        output_dir = %config.experiment.output_dir.display(),
        "Configuration loaded"
    );
    Ok(config)
}
