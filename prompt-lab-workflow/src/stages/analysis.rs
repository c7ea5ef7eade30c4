//! Analysis stages over the persisted per-method CSVs
//!
//! Each stage reads `<output_dir>/<method>_predictions.csv` (or the metrics
//! file) and writes one summary CSV into `analysis_dir`.

use async_trait::async_trait;
use prompt_lab_core::{PredictionRow, PromptLength};
use prompt_lab_metrics::{
    compare_by_length, compare_methods, flip_counts, length_correlation, prompt_variation,
    LengthCorrelation, MethodComparison, PromptVariation,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{Stage, StageContext, StageOutcome};
use crate::error::WorkflowResult;
use crate::methods::MethodKind;
use crate::report::METHOD_SUMMARY_FILE;
use crate::results::{write_csv, write_records, ResultStore};

pub const PROMPT_VARIATION_FILE: &str = "prompt_variation_summary.csv";
pub const METHOD_COMPARISON_FILE: &str = "method_comparison_summary.csv";
pub const DISAGREEMENT_MATRIX_FILE: &str = "method_disagreement_matrix.csv";
pub const COT_OVERTHINKING_FILE: &str = "cot_overthinking_summary.csv";
pub const FEWSHOT_EFFECT_FILE: &str = "fewshot_effect_summary.csv";
pub const LENGTH_CORRELATION_FILE: &str = "length_correlation_summary.csv";

pub const METHOD_SUMMARY_HEADER: &[&str] = &["method", "total", "correct", "accuracy"];
pub const PROMPT_VARIATION_HEADER: &[&str] = &["method", "short", "medium", "long", "sensitivity"];
pub const COT_OVERTHINKING_HEADER: &[&str] = &[
    "type",
    "prompt_length",
    "baseline_acc",
    "cot_acc",
    "delta_acc",
    "improved",
    "worsened",
    "same",
    "total",
    "improved_frac",
    "worsened_frac",
    "same_frac",
];
pub const FEWSHOT_EFFECT_HEADER: &[&str] = &["prompt_length", "baseline_acc", "fewshot_acc", "delta_acc"];
pub const LENGTH_CORRELATION_HEADER: &[&str] = &[
    "method",
    "avg_len_correct",
    "avg_len_incorrect",
    "diff_correct_minus_incorrect",
    "n_correct",
    "n_incorrect",
];

fn analysis_path(context: &StageContext, file_name: &str) -> PathBuf {
    context.config.experiment.analysis_dir.join(file_name)
}

fn store(context: &StageContext) -> ResultStore {
    ResultStore::new(&context.config.experiment.output_dir)
}

fn load_all_predictions(context: &StageContext) -> WorkflowResult<BTreeMap<String, Vec<PredictionRow>>> {
    let store = store(context);
    let mut data = BTreeMap::new();
    for kind in context.methods() {
        data.insert(kind.to_string(), store.read_predictions(kind.as_str())?);
    }
    Ok(data)
}

fn path_value(path: &Path) -> serde_json::Value {
    json!(path.display().to_string())
}

// ===== Summary =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodSummaryRow {
    pub method: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

/// Collects every method's metrics row into `method_summary.csv`
pub struct SummarizeStage;

#[async_trait]
impl Stage for SummarizeStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let store = store(context);

        let mut rows = Vec::new();
        for kind in context.methods() {
            let metrics = store.read_metrics(kind.as_str())?;
            rows.push(MethodSummaryRow {
                method: kind.to_string(),
                total: metrics.total,
                correct: metrics.correct,
                accuracy: metrics.accuracy,
            });
        }

        let path = analysis_path(context, METHOD_SUMMARY_FILE);
        write_csv(&path, METHOD_SUMMARY_HEADER, &rows)?;
        info!(path = %path.display(), methods = rows.len(), "Saved method summary");

        Ok(StageOutcome::success(
            self.name(),
            json!({"path": path_value(&path), "rows": rows}),
        ))
    }

    fn name(&self) -> &str {
        "summarize"
    }
}

// ===== Prompt Variation =====

/// Accuracy per prompt length and sensitivity for each method
pub struct PromptVariationStage;

#[async_trait]
impl Stage for PromptVariationStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let data = load_all_predictions(context)?;

        let rows: Vec<PromptVariation> = data
            .iter()
            .filter_map(|(method, predictions)| {
                let row = prompt_variation(method, predictions);
                if row.is_none() {
                    warn!(method = %method, "No predictions to analyze");
                }
                row
            })
            .collect();

        let path = analysis_path(context, PROMPT_VARIATION_FILE);
        write_csv(&path, PROMPT_VARIATION_HEADER, &rows)?;
        info!(path = %path.display(), "Saved prompt variation summary");

        Ok(StageOutcome::success(
            self.name(),
            json!({"path": path_value(&path), "rows": rows}),
        ))
    }

    fn name(&self) -> &str {
        "prompt_variation"
    }
}

// ===== Method Comparison =====

/// Header and rows of the per (task, length) comparison table
pub fn comparison_records(comparison: &MethodComparison) -> Vec<Vec<String>> {
    let mut header = vec!["task_id".to_string(), "prompt_length".to_string()];
    header.extend(comparison.methods.iter().cloned());
    header.extend(["num_correct", "winners", "agreement_type"].map(String::from));

    let mut records = vec![header];
    for row in &comparison.rows {
        let mut record = vec![row.task_id.clone(), row.prompt_length.to_string()];
        record.extend(row.scores.iter().map(|s| s.to_string()));
        record.push(row.num_correct.to_string());
        record.push(row.winners.join("|"));
        record.push(row.agreement.to_string());
        records.push(record);
    }
    records
}

/// The disagreement matrix with three-decimal cells and an empty corner header
pub fn disagreement_records(comparison: &MethodComparison) -> Vec<Vec<String>> {
    let mut header = vec![String::new()];
    header.extend(comparison.methods.iter().cloned());

    let mut records = vec![header];
    for (method, rates) in comparison.methods.iter().zip(&comparison.disagreement) {
        let mut record = vec![method.clone()];
        record.extend(rates.iter().map(|rate| format!("{:.3}", rate)));
        records.push(record);
    }
    records
}

/// Per-task agreement between methods plus their pairwise disagreement
pub struct MethodComparisonStage;

#[async_trait]
impl Stage for MethodComparisonStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let data = load_all_predictions(context)?;
        let comparison = compare_methods(&data);

        let summary_path = analysis_path(context, METHOD_COMPARISON_FILE);
        write_records(&summary_path, &comparison_records(&comparison))?;
        let matrix_path = analysis_path(context, DISAGREEMENT_MATRIX_FILE);
        write_records(&matrix_path, &disagreement_records(&comparison))?;

        info!(
            rows = comparison.rows.len(),
            methods = comparison.methods.len(),
            "Saved method comparison"
        );

        Ok(StageOutcome::success(
            self.name(),
            json!({
                "summary_path": path_value(&summary_path),
                "matrix_path": path_value(&matrix_path),
                "methods": comparison.methods,
                "disagreement": comparison.disagreement,
            }),
        ))
    }

    fn name(&self) -> &str {
        "method_comparison"
    }
}

// ===== CoT Overthinking =====

/// One line of `cot_overthinking_summary.csv`.
///
/// `per_length` rows fill the accuracy columns, the `flip_counts` row fills
/// the flip columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CotOverthinkingRow {
    #[serde(rename = "type")]
    pub row_type: String,
    pub prompt_length: Option<PromptLength>,
    pub baseline_acc: Option<f64>,
    pub cot_acc: Option<f64>,
    pub delta_acc: Option<f64>,
    pub improved: Option<usize>,
    pub worsened: Option<usize>,
    pub same: Option<usize>,
    pub total: Option<usize>,
    pub improved_frac: Option<f64>,
    pub worsened_frac: Option<f64>,
    pub same_frac: Option<f64>,
}

/// Per-length accuracy change from baseline to CoT and the per-item flips
pub fn cot_overthinking_rows(baseline: &[PredictionRow], cot: &[PredictionRow]) -> Vec<CotOverthinkingRow> {
    let mut rows: Vec<CotOverthinkingRow> = compare_by_length(baseline, cot)
        .into_iter()
        .map(|delta| CotOverthinkingRow {
            row_type: "per_length".to_string(),
            prompt_length: Some(delta.prompt_length),
            baseline_acc: Some(delta.baseline_acc),
            cot_acc: Some(delta.other_acc),
            delta_acc: Some(delta.delta_acc),
            ..Default::default()
        })
        .collect();

    let flips = flip_counts(baseline, cot);
    rows.push(CotOverthinkingRow {
        row_type: "flip_counts".to_string(),
        improved: Some(flips.improved),
        worsened: Some(flips.worsened),
        same: Some(flips.same),
        total: Some(flips.total()),
        improved_frac: Some(flips.improved_frac()),
        worsened_frac: Some(flips.worsened_frac()),
        same_frac: Some(flips.same_frac()),
        ..Default::default()
    });
    rows
}

pub struct CotOverthinkingStage;

#[async_trait]
impl Stage for CotOverthinkingStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let store = store(context);
        let baseline = store.read_predictions(MethodKind::Baseline.as_str())?;
        let cot = store.read_predictions(MethodKind::Cot.as_str())?;

        let rows = cot_overthinking_rows(&baseline, &cot);
        let path = analysis_path(context, COT_OVERTHINKING_FILE);
        write_csv(&path, COT_OVERTHINKING_HEADER, &rows)?;
        info!(path = %path.display(), "Saved CoT overthinking summary");

        Ok(StageOutcome::success(
            self.name(),
            json!({"path": path_value(&path), "rows": rows}),
        ))
    }

    fn name(&self) -> &str {
        "cot_overthinking"
    }
}

// ===== Few-shot Effect =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FewShotEffectRow {
    pub prompt_length: PromptLength,
    pub baseline_acc: f64,
    pub fewshot_acc: f64,
    pub delta_acc: f64,
}

pub fn fewshot_effect_rows(baseline: &[PredictionRow], fewshot: &[PredictionRow]) -> Vec<FewShotEffectRow> {
    compare_by_length(baseline, fewshot)
        .into_iter()
        .map(|delta| FewShotEffectRow {
            prompt_length: delta.prompt_length,
            baseline_acc: delta.baseline_acc,
            fewshot_acc: delta.other_acc,
            delta_acc: delta.delta_acc,
        })
        .collect()
}

pub struct FewShotEffectStage;

#[async_trait]
impl Stage for FewShotEffectStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let store = store(context);
        let baseline = store.read_predictions(MethodKind::Baseline.as_str())?;
        let fewshot = store.read_predictions(MethodKind::FewShot.as_str())?;

        let rows = fewshot_effect_rows(&baseline, &fewshot);
        let path = analysis_path(context, FEWSHOT_EFFECT_FILE);
        write_csv(&path, FEWSHOT_EFFECT_HEADER, &rows)?;
        info!(path = %path.display(), "Saved few-shot effect summary");

        Ok(StageOutcome::success(
            self.name(),
            json!({"path": path_value(&path), "rows": rows}),
        ))
    }

    fn name(&self) -> &str {
        "fewshot_effect"
    }
}

// ===== Answer Length =====

/// Answer word counts of correct vs incorrect predictions per method
pub struct LengthCorrelationStage;

#[async_trait]
impl Stage for LengthCorrelationStage {
    async fn execute(&self, context: &StageContext) -> WorkflowResult<StageOutcome> {
        let data = load_all_predictions(context)?;

        let rows: Vec<LengthCorrelation> = data
            .iter()
            .filter_map(|(method, predictions)| {
                let row = length_correlation(method, predictions);
                if row.is_none() {
                    warn!(method = %method, "Correct or incorrect set is empty, skipping");
                }
                row
            })
            .collect();

        let path = analysis_path(context, LENGTH_CORRELATION_FILE);
        write_csv(&path, LENGTH_CORRELATION_HEADER, &rows)?;
        info!(path = %path.display(), methods = rows.len(), "Saved length correlation summary");

        Ok(StageOutcome::success(
            self.name(),
            json!({"path": path_value(&path), "rows": rows}),
        ))
    }

    fn name(&self) -> &str {
        "length_correlation"
    }
}
