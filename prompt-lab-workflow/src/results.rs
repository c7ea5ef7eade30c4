//! Flat CSV persistence of predictions, metrics and analysis summaries

use prompt_lab_core::{MethodResult, MetricsRow, PredictionRow};
use prompt_lab_metrics::AccuracyCalculator;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{WorkflowError, WorkflowResult};

pub const PREDICTIONS_HEADER: &[&str] = &[
    "task_id",
    "prompt_length",
    "prompt_text",
    "predicted_answer",
    "ground_truth",
    "is_correct",
];
pub const METRICS_HEADER: &[&str] = &["total", "correct", "accuracy"];

/// Serialize `rows` to a CSV file, creating parent directories.
///
/// `header` is written even when there are no rows and must name the
/// serialized fields in order.
pub fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> WorkflowResult<()> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}

/// Write pre-formatted records, the first one being the header
pub fn write_records(path: &Path, records: &[Vec<String>]) -> WorkflowResult<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = records.len().saturating_sub(1), "Wrote CSV");
    Ok(())
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> WorkflowResult<Vec<T>> {
    if !path.exists() {
        return Err(WorkflowError::NotFound(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Header and string records of any CSV file
pub fn read_records(path: &Path) -> WorkflowResult<(Vec<String>, Vec<Vec<String>>)> {
    if !path.exists() {
        return Err(WorkflowError::NotFound(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}

fn ensure_parent(path: &Path) -> WorkflowResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Score method results into persisted rows.
///
/// Unknown task ids get an empty ground truth and are never correct.
pub fn prediction_rows(calculator: &AccuracyCalculator, results: &[MethodResult]) -> Vec<PredictionRow> {
    results
        .iter()
        .map(|result| PredictionRow {
            task_id: result.task_id.clone(),
            prompt_length: result.prompt_length,
            prompt_text: result.prompt_text.clone(),
            predicted_answer: result.predicted_answer.clone(),
            ground_truth: calculator
                .ground_truth_for(&result.task_id)
                .unwrap_or_default()
                .to_string(),
            is_correct: u8::from(calculator.score(result).unwrap_or(false)),
        })
        .collect()
}

/// The per-method files under an experiment's output directory
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn predictions_path(&self, method: &str) -> PathBuf {
        self.root.join(format!("{}_predictions.csv", method))
    }

    pub fn metrics_path(&self, method: &str) -> PathBuf {
        self.root.join(format!("{}_metrics.csv", method))
    }

    pub fn write_predictions(&self, method: &str, rows: &[PredictionRow]) -> WorkflowResult<PathBuf> {
        let path = self.predictions_path(method);
        write_csv(&path, PREDICTIONS_HEADER, rows)?;
        Ok(path)
    }

    pub fn write_metrics(&self, method: &str, metrics: &MetricsRow) -> WorkflowResult<PathBuf> {
        let path = self.metrics_path(method);
        write_csv(&path, METRICS_HEADER, std::slice::from_ref(metrics))?;
        Ok(path)
    }

    pub fn read_predictions(&self, method: &str) -> WorkflowResult<Vec<PredictionRow>> {
        read_csv(&self.predictions_path(method))
    }

    /// The single metrics row of a method. A file without a data row is an error.
    pub fn read_metrics(&self, method: &str) -> WorkflowResult<MetricsRow> {
        let path = self.metrics_path(method);
        read_csv::<MetricsRow>(&path)?
            .into_iter()
            .next()
            .ok_or_else(|| WorkflowError::Validation(format!("Metrics file is empty: {}", path.display())))
    }
}
