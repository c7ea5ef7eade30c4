//! Prompt Lab language-model clients
//!
//! This crate defines the [`LlmClient`] contract used by every prompting
//! method, together with two implementations:
//!
//! - [`FakeLlmClient`]: a deterministic, offline client for pipeline testing
//! - [`AzureOpenAiClient`]: an adapter for Azure OpenAI chat completions
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use prompt_lab_client::{FakeLlmClient, LlmClient};
//! use prompt_lab_core::CompletionRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FakeLlmClient::new();
//!     let response = client
//!         .complete(&CompletionRequest::new("gpt-4o", "What is 7 + 5?"))
//!         .await?;
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```
//!
//! # Azure configuration
//!
//! [`AzureConfig::from_env`] reads the `AZURE_OPENAI_*` variables. The
//! deployment is chosen with a [`DeploymentProfile`]:
//!
//! ```rust,no_run
//! use prompt_lab_client::{AzureConfig, AzureOpenAiClient, DeploymentProfile};
//!
//! # fn main() -> Result<(), prompt_lab_client::ClientError> {
//! let config = AzureConfig::from_env()?;
//! let client = AzureOpenAiClient::new(config, &DeploymentProfile::Secondary)?;
//! # Ok(())
//! # }
//! ```

pub mod azure;
pub mod config;
pub mod error;
pub mod fake;

pub use azure::AzureOpenAiClient;
pub use config::{AzureConfig, DeploymentConfig, DeploymentProfile};
pub use error::{ClientError, ClientResult};
pub use fake::FakeLlmClient;

use async_trait::async_trait;
use prompt_lab_core::{CompletionRequest, CompletionResponse, ModelSettings, Provider};
use tracing::info;

/// A language-model backend that turns one request into one response
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<CompletionResponse>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

/// Build the client selected by the model settings.
///
/// Azure credentials come from the process environment.
pub fn build_client(settings: &ModelSettings) -> ClientResult<Box<dyn LlmClient>> {
    build_client_with(settings, |key| std::env::var(key).ok())
}

/// Like [`build_client`], with Azure settings read through `lookup`
pub fn build_client_with<F>(settings: &ModelSettings, lookup: F) -> ClientResult<Box<dyn LlmClient>>
where
    F: Fn(&str) -> Option<String>,
{
    match settings.provider {
        Provider::Dummy => {
            info!("Using fake LLM client");
            Ok(Box::new(FakeLlmClient::new()))
        }
        Provider::Azure => {
            let config = AzureConfig::from_lookup(lookup)?;
            let profile: DeploymentProfile = settings
                .deployment
                .parse()
                .unwrap_or_default();
            let client = AzureOpenAiClient::new(config, &profile)?;
            info!(deployment = client.deployment_name(), "Using Azure OpenAI client");
            Ok(Box::new(client))
        }
    }
}
