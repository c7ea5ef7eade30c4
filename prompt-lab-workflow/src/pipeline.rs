use prompt_lab_client::LlmClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::methods::MethodKind;
use crate::stages::{
    CotOverthinkingStage, ExperimentStage, FewShotEffectStage, LengthCorrelationStage,
    MethodComparisonStage, PromptVariationStage, ReportStage, RunAllStage, Stage, StageContext,
    StageOutcome, SummarizeStage,
};

/// An ordered list of stages run one after another, stopping at the first failure
pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn Stage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub pipeline: String,
    pub success: bool,
    /// Outcomes of the stages that ran, in order
    pub outcomes: Vec<StageOutcome>,
}

impl PipelineReport {
    pub fn failed_stage(&self) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|o| !o.success)
    }
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Experiments, every analysis and the HTML report
    pub fn full(client: Arc<dyn LlmClient>) -> Self {
        Self::new("full")
            .with_stage(RunAllStage::new(client))
            .with_stage(SummarizeStage)
            .with_stage(PromptVariationStage)
            .with_stage(MethodComparisonStage)
            .with_stage(CotOverthinkingStage)
            .with_stage(FewShotEffectStage)
            .with_stage(LengthCorrelationStage)
            .with_stage(ReportStage)
    }

    pub fn run_all(client: Arc<dyn LlmClient>) -> Self {
        Self::new("run-all").with_stage(RunAllStage::new(client))
    }

    pub fn single(kind: MethodKind, client: Arc<dyn LlmClient>) -> Self {
        Self::new(kind.as_str()).with_stage(ExperimentStage::new(kind, client))
    }

    /// Analyses over results already on disk
    pub fn analyze() -> Self {
        Self::new("analyze")
            .with_stage(PromptVariationStage)
            .with_stage(MethodComparisonStage)
            .with_stage(CotOverthinkingStage)
            .with_stage(FewShotEffectStage)
    }

    pub fn report() -> Self {
        Self::new("report").with_stage(ReportStage)
    }

    pub async fn run(&self, context: &StageContext) -> PipelineReport {
        info!(run_id = %context.run_id, "Running pipeline: {}", self.name);

        let mut outcomes = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            info!("Executing stage: {}", stage.name());
            let started = Instant::now();

            let outcome = match stage.execute(context).await {
                Ok(outcome) => outcome,
                Err(e) => StageOutcome::failure(stage.name(), e.to_string()),
            };
            let failed = !outcome.success;

            if failed {
                error!(
                    stage = stage.name(),
                    error = outcome.error.as_deref().unwrap_or_default(),
                    "Stage failed, stopping pipeline"
                );
            } else {
                info!(
                    stage = stage.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Stage completed"
                );
            }

            outcomes.push(outcome);
            if failed {
                break;
            }
        }

        let success = outcomes.iter().all(|o| o.success);
        info!(run_id = %context.run_id, success, "Pipeline finished: {}", self.name);

        PipelineReport {
            run_id: context.run_id,
            pipeline: self.name.clone(),
            success,
            outcomes,
        }
    }
}
