use serde::{Deserialize, Serialize};

use super::prompt::PromptLength;

/// Outcome of sending one prompt variant through a method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodResult {
    pub task_id: String,
    pub prompt_length: PromptLength,
    /// The text actually sent, after the method's transformation.
    pub prompt_text: String,
    pub predicted_answer: String,
    pub tokens_input: Option<u32>,
    pub tokens_output: Option<u32>,
}

impl MethodResult {
    pub fn new(
        task_id: impl Into<String>,
        prompt_length: PromptLength,
        prompt_text: impl Into<String>,
        predicted_answer: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            prompt_length,
            prompt_text: prompt_text.into(),
            predicted_answer: predicted_answer.into(),
            tokens_input: None,
            tokens_output: None,
        }
    }
}

/// Aggregate accuracy over a set of method results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

impl EvaluationResult {
    pub fn from_counts(total: usize, correct: usize) -> Self {
        let accuracy = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };

        Self {
            total,
            correct,
            accuracy,
        }
    }
}

/// One persisted prediction, as written to `<method>_predictions.csv`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionRow {
    pub task_id: String,
    pub prompt_length: PromptLength,
    pub prompt_text: String,
    pub predicted_answer: String,
    /// Empty when the task id was not found.
    pub ground_truth: String,
    /// 0 or 1.
    pub is_correct: u8,
}

impl PredictionRow {
    pub fn correct(&self) -> bool {
        self.is_correct == 1
    }
}

/// One persisted metrics row, as written to `<method>_metrics.csv`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricsRow {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

impl From<EvaluationResult> for MetricsRow {
    fn from(result: EvaluationResult) -> Self {
        Self {
            total: result.total,
            correct: result.correct,
            accuracy: result.accuracy,
        }
    }
}
