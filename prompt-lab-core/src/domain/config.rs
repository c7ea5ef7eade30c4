use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::error::CoreError;

// ===== Model Configuration =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Dummy,
    Azure,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Dummy => "dummy",
            Provider::Azure => "azure",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dummy" => Ok(Provider::Dummy),
            "azure" => Ok(Provider::Azure),
            other => Err(CoreError::Configuration(format!("Unknown provider: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct ModelSettings {
    #[serde(default)]
    pub provider: Provider,
    #[validate(length(min = 1, max = 255))]
    pub model_name: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    /// Deployment profile for the remote provider: `primary`, `secondary` or a deployment name.
    #[serde(default = "default_deployment")]
    pub deployment: String,
}

fn default_max_tokens() -> u32 {
    256
}

fn default_deployment() -> String {
    "primary".to_string()
}

// ===== Experiment Configuration =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSource {
    #[default]
    Dummy,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[validate(schema(function = "validate_dataset_source"))]
pub struct ExperimentSettings {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub dataset: DatasetSource,
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    #[validate(custom(function = "validate_non_empty_path"))]
    pub output_dir: PathBuf,
    #[serde(default = "default_analysis_dir")]
    pub analysis_dir: PathBuf,
}

fn default_methods() -> Vec<String> {
    vec!["baseline".to_string(), "cot".to_string(), "fewshot".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_analysis_dir() -> PathBuf {
    PathBuf::from("analysis_results")
}

fn validate_non_empty_path(path: &PathBuf) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_path"));
    }
    Ok(())
}

fn validate_dataset_source(settings: &ExperimentSettings) -> Result<(), ValidationError> {
    if settings.dataset == DatasetSource::File && settings.dataset_path.is_none() {
        let mut err = ValidationError::new("dataset_path_required");
        err.message = Some("dataset 'file' requires experiment.dataset_path".into());
        return Err(err);
    }
    Ok(())
}

// ===== Method Configuration =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CotSettings {
    #[serde(default = "default_true")]
    pub add_prefix: bool,
    #[serde(default = "default_true")]
    pub add_suffix: bool,
}

impl Default for CotSettings {
    fn default() -> Self {
        Self {
            add_prefix: true,
            add_suffix: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FewShotSettings {
    #[serde(default = "default_true")]
    pub add_instruction: bool,
}

impl Default for FewShotSettings {
    fn default() -> Self {
        Self {
            add_instruction: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FewShotExample {
    pub input: String,
    pub output: String,
}

impl FewShotExample {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

// ===== Application Configuration =====

/// Fully resolved experiment configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub model: ModelSettings,
    #[validate(nested)]
    pub experiment: ExperimentSettings,
    #[serde(default)]
    pub cot: CotSettings,
    #[serde(default)]
    pub fewshot: FewShotSettings,
    #[serde(default)]
    pub fewshot_examples: Vec<FewShotExample>,
}

impl AppConfig {
    /// Validates and returns the config, mapping failures to `CoreError::Validation`.
    pub fn validated(self) -> crate::error::Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        r#"
model:
  model_name: gpt-test
experiment:
  name: demo
"#
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config: AppConfig = serde_yaml::from_str(minimal_yaml()).unwrap();

        assert_eq!(config.model.provider, Provider::Dummy);
        assert_eq!(config.model.temperature, 0.0);
        assert_eq!(config.model.max_tokens, 256);
        assert_eq!(config.model.deployment, "primary");
        assert_eq!(config.experiment.output_dir, PathBuf::from("results"));
        assert_eq!(config.experiment.analysis_dir, PathBuf::from("analysis_results"));
        assert_eq!(config.experiment.methods, vec!["baseline", "cot", "fewshot"]);
        assert!(config.cot.add_prefix && config.cot.add_suffix);
        assert!(config.fewshot.add_instruction);
        assert!(config.fewshot_examples.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_temperature_out_of_range_is_rejected() {
        let mut config: AppConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        config.model.temperature = 2.5;

        assert!(config.validated().is_err());
    }

    #[test]
    fn test_file_dataset_requires_path() {
        let mut config: AppConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        config.experiment.dataset = DatasetSource::File;
        assert!(config.clone().validated().is_err());

        config.experiment.dataset_path = Some(PathBuf::from("tasks.json"));
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("Azure".parse::<Provider>().unwrap(), Provider::Azure);
        assert!("openai".parse::<Provider>().is_err());
    }
}
