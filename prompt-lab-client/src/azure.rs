//! Azure OpenAI chat-completion adapter
//!
//! Sends a single user message per request. There is no retry loop: a
//! rate-limited or failed call surfaces immediately as a [`ClientError`].

use async_trait::async_trait;
use prompt_lab_core::{CompletionRequest, CompletionResponse};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use url::Url;

use crate::config::{AzureConfig, DeploymentConfig, DeploymentProfile};
use crate::error::{ClientError, ClientResult};
use crate::LlmClient;

/// Client bound to one resolved Azure deployment
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    client: Client,
    deployment: DeploymentConfig,
    api_version: String,
    url: Url,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

impl AzureOpenAiClient {
    /// Create a client for the given deployment profile.
    ///
    /// The profile is resolved here, so a missing secondary deployment fails
    /// at construction rather than on the first request.
    pub fn new(config: AzureConfig, profile: &DeploymentProfile) -> ClientResult<Self> {
        let deployment = config.resolve(profile)?;
        let url = Self::completions_url(&deployment.endpoint, &deployment.deployment_name)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            deployment,
            api_version: config.api_version,
            url,
        })
    }

    /// Build the chat-completions URL for a deployment
    fn completions_url(endpoint: &str, deployment: &str) -> ClientResult<Url> {
        let base = endpoint.trim_end_matches('/');
        let url = Url::parse(&format!(
            "{}/openai/deployments/{}/chat/completions",
            base, deployment
        ))?;
        Ok(url)
    }

    pub fn deployment_name(&self) -> &str {
        &self.deployment.deployment_name
    }

    fn validate(request: &CompletionRequest) -> ClientResult<()> {
        if request.prompt.trim().is_empty() {
            return Err(ClientError::Validation("Prompt cannot be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&request.temperature) {
            return Err(ClientError::Validation(
                "Temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if request.max_tokens == 0 {
            return Err(ClientError::Validation(
                "max_tokens must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LlmClient for AzureOpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<CompletionResponse> {
        Self::validate(request)?;

        let body = ChatRequest {
            model: &self.deployment.deployment_name,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            deployment = %self.deployment.deployment_name,
            prompt_chars = request.prompt.len(),
            "Request: POST {}",
            self.url
        );

        let response = self
            .client
            .post(self.url.clone())
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.deployment.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Request failed: {}", e);
                ClientError::Connection(e.to_string())
            })?;

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by deployment {}", self.deployment.deployment_name);
            return Err(ClientError::RateLimited(text));
        }

        if !status.is_success() {
            return Err(ClientError::Api {
                status: Some(status.as_u16()),
                message: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| ClientError::Api {
            status: Some(status.as_u16()),
            message: format!("Malformed response body: {}", e),
        })?;

        let first = parsed.choices.into_iter().next().ok_or_else(|| ClientError::Api {
            status: None,
            message: "No response choices returned from the API".to_string(),
        })?;

        let content = first.message.and_then(|m| m.content).unwrap_or_default();
        let (tokens_input, tokens_output) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((None, None));

        Ok(CompletionResponse::new(content).with_usage(tokens_input, tokens_output))
    }

    fn name(&self) -> &str {
        "azure"
    }
}
