use once_cell::sync::Lazy;
use prompt_lab_core::{EvaluationResult, MethodResult, MetricCalculator, Result, Task};
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

static TRAILING_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\-]+$").expect("trailing punctuation pattern is valid"));

/// Trim, lowercase and strip a trailing run of non-word, non-hyphen characters.
///
/// ```
/// use prompt_lab_metrics::normalize_answer;
///
/// assert_eq!(normalize_answer("POSITIVE."), "positive");
/// assert_eq!(normalize_answer("well-formed"), "well-formed");
/// ```
pub fn normalize_answer(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    TRAILING_PUNCTUATION
        .replace(&lowered, "")
        .trim()
        .to_string()
}

/// Compare a prediction against ground truth after normalizing both
pub fn is_correct_answer(predicted: &str, ground_truth: &str) -> bool {
    normalize_answer(predicted) == normalize_answer(ground_truth)
}

/// Accuracy over method results, scored against task ground truth by id.
///
/// A result whose task id is unknown still counts toward `total` but can
/// never count as correct.
#[derive(Debug, Clone, Default)]
pub struct AccuracyCalculator {
    ground_truth: HashMap<String, String>,
}

impl AccuracyCalculator {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            ground_truth: tasks
                .iter()
                .map(|t| (t.id.clone(), t.ground_truth.clone()))
                .collect(),
        }
    }

    pub fn ground_truth_for(&self, task_id: &str) -> Option<&str> {
        self.ground_truth.get(task_id).map(String::as_str)
    }

    /// Score a single prediction. `None` when the task id is unknown.
    pub fn score(&self, result: &MethodResult) -> Option<bool> {
        self.ground_truth_for(&result.task_id)
            .map(|truth| is_correct_answer(&result.predicted_answer, truth))
    }

    pub fn evaluate(&self, predictions: &[MethodResult]) -> EvaluationResult {
        let mut total = 0;
        let mut correct = 0;

        for prediction in predictions {
            total += 1;
            match self.score(prediction) {
                Some(true) => correct += 1,
                Some(false) => {}
                None => warn!(task_id = %prediction.task_id, "No ground truth for prediction"),
            }
        }

        EvaluationResult::from_counts(total, correct)
    }
}

impl MetricCalculator for AccuracyCalculator {
    type Input = [MethodResult];
    type Output = EvaluationResult;

    fn calculate(&self, input: &Self::Input) -> Result<Self::Output> {
        Ok(self.evaluate(input))
    }
}

/// Accuracy of `predictions` against `tasks`
pub fn compute_accuracy(tasks: &[Task], predictions: &[MethodResult]) -> EvaluationResult {
    AccuracyCalculator::from_tasks(tasks).evaluate(predictions)
}
