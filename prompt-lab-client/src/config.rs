//! Azure OpenAI configuration
//!
//! Credentials are gathered into explicit structs up front. The adapter never
//! reads the process environment itself; [`AzureConfig::from_env`] is the one
//! place that does.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_DEPLOYMENT_NAME: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_ENDPOINT_SECONDARY: &str = "AZURE_OPENAI_ENDPOINT_SECONDARY";
pub const ENV_API_KEY_SECONDARY: &str = "AZURE_OPENAI_API_KEY_SECONDARY";
pub const ENV_DEPLOYMENT_NAME_SECONDARY: &str = "AZURE_OPENAI_DEPLOYMENT_NAME_SECONDARY";

/// One endpoint/key/deployment triple
#[derive(Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment_name: String,
}

impl fmt::Debug for DeploymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("deployment_name", &self.deployment_name)
            .finish()
    }
}

/// Configuration for the Azure OpenAI adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureConfig {
    pub primary: DeploymentConfig,
    /// Present only when the full secondary triple is configured
    pub secondary: Option<DeploymentConfig>,
    pub api_version: String,
    /// Request timeout
    pub timeout: Duration,
}

impl AzureConfig {
    pub fn new(primary: DeploymentConfig, api_version: impl Into<String>) -> Self {
        Self {
            primary,
            secondary: None,
            api_version: api_version.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_secondary(mut self, secondary: DeploymentConfig) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the process environment
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as missing. The error lists every missing
    /// required variable at once.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENV_ENDPOINT);
        let api_key = get(ENV_API_KEY);
        let deployment_name = get(ENV_DEPLOYMENT_NAME);
        let api_version = get(ENV_API_VERSION);

        let missing: Vec<&str> = [
            (ENV_ENDPOINT, endpoint.is_none()),
            (ENV_API_KEY, api_key.is_none()),
            (ENV_DEPLOYMENT_NAME, deployment_name.is_none()),
            (ENV_API_VERSION, api_version.is_none()),
        ]
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| *name)
        .collect();

        let (Some(endpoint), Some(api_key), Some(deployment_name), Some(api_version)) =
            (endpoint, api_key, deployment_name, api_version)
        else {
            return Err(ClientError::Configuration(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        };

        let mut config = Self::new(
            DeploymentConfig {
                endpoint,
                api_key,
                deployment_name,
            },
            api_version,
        );

        if let (Some(endpoint), Some(api_key), Some(deployment_name)) = (
            get(ENV_ENDPOINT_SECONDARY),
            get(ENV_API_KEY_SECONDARY),
            get(ENV_DEPLOYMENT_NAME_SECONDARY),
        ) {
            config = config.with_secondary(DeploymentConfig {
                endpoint,
                api_key,
                deployment_name,
            });
        }

        Ok(config)
    }

    /// Resolve a deployment profile to concrete credentials
    pub fn resolve(&self, profile: &DeploymentProfile) -> ClientResult<DeploymentConfig> {
        match profile {
            DeploymentProfile::Primary => Ok(self.primary.clone()),
            DeploymentProfile::Secondary => {
                let secondary = self.secondary.as_ref().ok_or_else(|| {
                    ClientError::Configuration(
                        "Secondary deployment requested but not configured".to_string(),
                    )
                })?;
                Ok(DeploymentConfig {
                    endpoint: strip_models_suffix(&secondary.endpoint).to_string(),
                    ..secondary.clone()
                })
            }
            DeploymentProfile::Named(name) => match &self.secondary {
                Some(secondary) if secondary.deployment_name == *name => Ok(DeploymentConfig {
                    endpoint: strip_models_suffix(&secondary.endpoint).to_string(),
                    ..secondary.clone()
                }),
                _ => Ok(DeploymentConfig {
                    deployment_name: name.clone(),
                    ..self.primary.clone()
                }),
            },
        }
    }
}

fn strip_models_suffix(endpoint: &str) -> &str {
    endpoint
        .strip_suffix("/models/")
        .or_else(|| endpoint.strip_suffix("/models"))
        .unwrap_or(endpoint)
}

/// Which deployment a client talks to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeploymentProfile {
    #[default]
    Primary,
    Secondary,
    /// A specific deployment name
    Named(String),
}

impl FromStr for DeploymentProfile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "primary" => DeploymentProfile::Primary,
            "secondary" => DeploymentProfile::Secondary,
            other => DeploymentProfile::Named(other.to_string()),
        })
    }
}

impl fmt::Display for DeploymentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentProfile::Primary => f.write_str("primary"),
            DeploymentProfile::Secondary => f.write_str("secondary"),
            DeploymentProfile::Named(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn primary_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_ENDPOINT, "https://primary.example.com"),
            (ENV_API_KEY, "primary-key"),
            (ENV_DEPLOYMENT_NAME, "gpt-4o"),
            (ENV_API_VERSION, "2024-06-01"),
        ]
    }

    #[test]
    fn test_missing_variables_are_all_named() {
        let err = AzureConfig::from_lookup(lookup(&[(ENV_ENDPOINT, "https://x")])).unwrap_err();

        assert!(matches!(err, ClientError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variables: \
             AZURE_OPENAI_API_KEY, AZURE_OPENAI_DEPLOYMENT_NAME, AZURE_OPENAI_API_VERSION"
        );
    }

    #[test]
    fn test_partial_secondary_is_ignored() {
        let mut vars = primary_vars();
        vars.push((ENV_ENDPOINT_SECONDARY, "https://secondary.example.com"));
        vars.push((ENV_API_KEY_SECONDARY, "secondary-key"));

        let config = AzureConfig::from_lookup(lookup(&vars)).unwrap();
        assert!(config.secondary.is_none());
        assert!(config.resolve(&DeploymentProfile::Secondary).is_err());
    }

    #[test]
    fn test_secondary_endpoint_strips_models_path() {
        let mut vars = primary_vars();
        vars.push((ENV_ENDPOINT_SECONDARY, "https://foundry.example.com/models/"));
        vars.push((ENV_API_KEY_SECONDARY, "secondary-key"));
        vars.push((ENV_DEPLOYMENT_NAME_SECONDARY, "phi-4-mini"));

        let config = AzureConfig::from_lookup(lookup(&vars)).unwrap();
        let resolved = config.resolve(&DeploymentProfile::Secondary).unwrap();

        assert_eq!(resolved.endpoint, "https://foundry.example.com");
        assert_eq!(resolved.api_key, "secondary-key");
        assert_eq!(resolved.deployment_name, "phi-4-mini");
    }

    #[test]
    fn test_named_profile_picks_credentials() {
        let mut vars = primary_vars();
        vars.push((ENV_ENDPOINT_SECONDARY, "https://foundry.example.com/models"));
        vars.push((ENV_API_KEY_SECONDARY, "secondary-key"));
        vars.push((ENV_DEPLOYMENT_NAME_SECONDARY, "phi-4-mini"));
        let config = AzureConfig::from_lookup(lookup(&vars)).unwrap();

        let named_secondary = config
            .resolve(&DeploymentProfile::Named("phi-4-mini".into()))
            .unwrap();
        assert_eq!(named_secondary.api_key, "secondary-key");
        assert_eq!(named_secondary.endpoint, "https://foundry.example.com");

        let named_other = config
            .resolve(&DeploymentProfile::Named("gpt-4o-mini".into()))
            .unwrap();
        assert_eq!(named_other.api_key, "primary-key");
        assert_eq!(named_other.deployment_name, "gpt-4o-mini");
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("primary".parse::<DeploymentProfile>().unwrap(), DeploymentProfile::Primary);
        assert_eq!("secondary".parse::<DeploymentProfile>().unwrap(), DeploymentProfile::Secondary);
        assert_eq!(
            "gpt-4o".parse::<DeploymentProfile>().unwrap(),
            DeploymentProfile::Named("gpt-4o".into())
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AzureConfig::from_lookup(lookup(&primary_vars())).unwrap();
        assert!(!format!("{:?}", config).contains("primary-key"));
    }
}
