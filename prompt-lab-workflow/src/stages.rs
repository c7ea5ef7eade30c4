pub mod analysis;
pub mod experiment;
pub mod reporting;

pub use analysis::*;
pub use experiment::*;
pub use reporting::*;

use async_trait::async_trait;
use prompt_lab_core::AppConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::WorkflowResult;
use crate::methods::MethodKind;

/// Everything a stage needs to know about the current run
#[derive(Debug, Clone)]
pub struct StageContext {
    pub run_id: Uuid,
    pub config: AppConfig,
}

impl StageContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config,
        }
    }

    /// Configured methods that name a known method, in order, without repeats
    pub fn methods(&self) -> Vec<MethodKind> {
        let mut kinds = Vec::new();
        for name in &self.config.experiment.methods {
            match name.parse::<MethodKind>() {
                Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Ok(_) => {}
                Err(_) => warn!(method = %name, "Unknown method in configuration, skipping"),
            }
        }
        kinds
    }
}

#[async_trait]
pub trait Stage: Send + Sync {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome>;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageOutcome {
    pub name: String,
    pub success: bool,
    pub output: serde_json::Value,
    pub error: Option<String>,
}

impl StageOutcome {
    pub fn success(name: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            success: true,
            output,
            error: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            output: serde_json::Value::Null,
            error: Some(error.into()),
        }
    }
}
