use async_trait::async_trait;
use serde_json::json;

use super::{Stage, StageContext, StageOutcome};
use crate::error::WorkflowResult;
use crate::report::write_report;

/// Renders `report.html` from the summaries in the analysis directory
pub struct ReportStage;

#[async_trait]
impl Stage for ReportStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let path = write_report(&context.config.experiment.analysis_dir)?;
        Ok(StageOutcome::success(
            self.name(),
            json!({"path": path.display().to_string()}),
        ))
    }

    fn name(&self) -> &str {
        "report"
    }
}
