//! Prompting methods and the runner that sends their prompts to a client

pub mod baseline;
pub mod cot;
pub mod fewshot;

pub use baseline::BaselineStrategy;
pub use cot::CotStrategy;
pub use fewshot::FewShotStrategy;

use prompt_lab_client::LlmClient;
use prompt_lab_core::{AppConfig, GenerationParams, MethodResult, ModelSettings, PromptVariant};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{WorkflowError, WorkflowResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Baseline,
    Cot,
    FewShot,
}

impl MethodKind {
    pub const ALL: [MethodKind; 3] = [MethodKind::Baseline, MethodKind::Cot, MethodKind::FewShot];

    /// Method name, also the stem of its CSV files
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Baseline => "baseline",
            MethodKind::Cot => "cot",
            MethodKind::FewShot => "fewshot",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Ok(MethodKind::Baseline),
            "cot" => Ok(MethodKind::Cot),
            "fewshot" => Ok(MethodKind::FewShot),
            other => Err(WorkflowError::Validation(format!("Unknown method: {}", other))),
        }
    }
}

/// Turns a prompt variant's text into the text a method actually sends
pub trait PromptStrategy: Send + Sync {
    fn kind(&self) -> MethodKind;

    fn render(&self, prompt: &str) -> String;
}

/// The strategy for `kind`, configured from the application settings
pub fn strategy_for(kind: MethodKind, config: &AppConfig) -> Box<dyn PromptStrategy> {
    match kind {
        MethodKind::Baseline => Box::new(BaselineStrategy),
        MethodKind::Cot => Box::new(CotStrategy::from_settings(&config.cot)),
        MethodKind::FewShot => Box::new(FewShotStrategy::from_settings(
            &config.fewshot,
            config.fewshot_examples.clone(),
        )),
    }
}

/// Sends rendered prompts to a client one at a time
#[derive(Clone)]
pub struct MethodRunner {
    client: Arc<dyn LlmClient>,
    params: GenerationParams,
}

impl MethodRunner {
    pub fn new(client: Arc<dyn LlmClient>, params: GenerationParams) -> Self {
        Self { client, params }
    }

    pub fn from_settings(client: Arc<dyn LlmClient>, settings: &ModelSettings) -> Self {
        Self::new(
            client,
            GenerationParams {
                model_name: settings.model_name.clone(),
                temperature: settings.temperature,
                max_tokens: settings.max_tokens,
            },
        )
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// One result per variant, in input order.
    ///
    /// The first client failure aborts the run.
    pub async fn run(
        &self,
        strategy: &dyn PromptStrategy,
        variants: &[PromptVariant],
    ) -> WorkflowResult<Vec<MethodResult>> {
        info!(
            method = %strategy.kind(),
            client = self.client.name(),
            variants = variants.len(),
            "Running method"
        );

        let mut results = Vec::with_capacity(variants.len());
        for variant in variants {
            let prompt = strategy.render(&variant.prompt_text);
            let request = self.params.request(prompt.clone());

            debug!(task_id = %variant.task_id, length = %variant.length, "Sending prompt");
            let response = self.client.complete(&request).await?;

            results.push(MethodResult {
                task_id: variant.task_id.clone(),
                prompt_length: variant.length,
                prompt_text: prompt,
                predicted_answer: response.text,
                tokens_input: response.tokens_input,
                tokens_output: response.tokens_output,
            });
        }

        Ok(results)
    }
}
