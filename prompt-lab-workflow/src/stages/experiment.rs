use async_trait::async_trait;
use prompt_lab_client::LlmClient;
use prompt_lab_core::{AppConfig, MetricsRow};
use prompt_lab_metrics::AccuracyCalculator;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use super::{Stage, StageContext, StageOutcome};
use crate::dataset::{build_prompt_variants, load_dataset};
use crate::error::WorkflowResult;
use crate::methods::{strategy_for, MethodKind, MethodRunner};
use crate::results::{prediction_rows, ResultStore};

/// What one method run produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentSummary {
    pub method: MethodKind,
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub predictions_path: PathBuf,
    pub metrics_path: PathBuf,
}

/// Run one method over the configured dataset, score it and persist both CSVs
pub async fn run_experiment(
    kind: MethodKind,
    client: Arc<dyn LlmClient>,
    config: &AppConfig,
) -> WorkflowResult<ExperimentSummary> {
    let tasks = load_dataset(&config.experiment)?;
    let variants = build_prompt_variants(&tasks);

    let strategy = strategy_for(kind, config);
    let runner = MethodRunner::from_settings(client, &config.model);
    let results = runner.run(strategy.as_ref(), &variants).await?;

    let calculator = AccuracyCalculator::from_tasks(&tasks);
    let evaluation = calculator.evaluate(&results);
    let rows = prediction_rows(&calculator, &results);

    let store = ResultStore::new(&config.experiment.output_dir);
    let predictions_path = store.write_predictions(kind.as_str(), &rows)?;
    let metrics_path = store.write_metrics(kind.as_str(), &MetricsRow::from(evaluation))?;

    info!(
        method = %kind,
        total = evaluation.total,
        correct = evaluation.correct,
        accuracy = evaluation.accuracy,
        "Experiment finished"
    );

    Ok(ExperimentSummary {
        method: kind,
        total: evaluation.total,
        correct: evaluation.correct,
        accuracy: evaluation.accuracy,
        predictions_path,
        metrics_path,
    })
}

/// A single method experiment
pub struct ExperimentStage {
    kind: MethodKind,
    client: Arc<dyn LlmClient>,
    name: String,
}

impl ExperimentStage {
    pub fn new(kind: MethodKind, client: Arc<dyn LlmClient>) -> Self {
        Self {
            kind,
            client,
            name: format!("experiment:{}", kind),
        }
    }
}

#[async_trait]
impl Stage for ExperimentStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let summary = run_experiment(self.kind, self.client.clone(), &context.config).await?;
        Ok(StageOutcome::success(&self.name, serde_json::to_value(summary)?))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Every configured method, one after another.
///
/// A failing method is logged and the next one still runs. The stage fails
/// only when every attempted method failed.
pub struct RunAllStage {
    client: Arc<dyn LlmClient>,
}

impl RunAllStage {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Stage for RunAllStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let kinds = context.methods();

        let mut completed = Vec::new();
        let mut failed = Vec::new();
        for kind in &kinds {
            match run_experiment(*kind, self.client.clone(), &context.config).await {
                Ok(summary) => completed.push(summary),
                Err(e) => {
                    error!(method = %kind, error = %e, "Method failed");
                    failed.push(json!({"method": kind, "error": e.to_string()}));
                }
            }
        }

        if !kinds.is_empty() && completed.is_empty() {
            return Ok(StageOutcome::failure(
                self.name(),
                format!("All {} attempted methods failed", kinds.len()),
            ));
        }

        Ok(StageOutcome::success(
            self.name(),
            json!({"completed": completed, "failed": failed}),
        ))
    }

    fn name(&self) -> &str {
        "run_all"
    }
}
