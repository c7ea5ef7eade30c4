//! Cross-method analysis over persisted predictions
//!
//! Everything here is pure: callers load the prediction rows and hand them
//! in, and get plain summary structs back.

use prompt_lab_core::{PredictionRow, PromptLength};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::statistical::StatisticalAnalyzer;

/// Accuracy per prompt length. Lengths with no rows are absent.
pub fn accuracy_by_length(rows: &[PredictionRow]) -> BTreeMap<PromptLength, f64> {
    PromptLength::ALL
        .iter()
        .filter_map(|&length| {
            let subset: Vec<&PredictionRow> =
                rows.iter().filter(|r| r.prompt_length == length).collect();
            if subset.is_empty() {
                return None;
            }
            let correct = subset.iter().filter(|r| r.correct()).count();
            Some((length, StatisticalAnalyzer::fraction(correct, subset.len())))
        })
        .collect()
}

// ===== Prompt Variation =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptVariation {
    pub method: String,
    pub short: Option<f64>,
    pub medium: Option<f64>,
    pub long: Option<f64>,
    /// Sample standard deviation of the per-length accuracies
    pub sensitivity: f64,
}

/// Per-length accuracy and sensitivity for one method, `None` without data
pub fn prompt_variation(method: &str, rows: &[PredictionRow]) -> Option<PromptVariation> {
    let by_length = accuracy_by_length(rows);
    if by_length.is_empty() {
        return None;
    }

    let accuracies: Vec<f64> = by_length.values().copied().collect();

    Some(PromptVariation {
        method: method.to_string(),
        short: by_length.get(&PromptLength::Short).copied(),
        medium: by_length.get(&PromptLength::Medium).copied(),
        long: by_length.get(&PromptLength::Long).copied(),
        sensitivity: StatisticalAnalyzer::sample_std_dev(&accuracies),
    })
}

// ===== Method Comparison =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgreementType {
    AllCorrect,
    AllWrong,
    SingleWinner,
    MixedMulti,
}

impl AgreementType {
    pub fn classify(num_correct: usize, num_methods: usize) -> Self {
        if num_correct == num_methods {
            AgreementType::AllCorrect
        } else if num_correct == 0 {
            AgreementType::AllWrong
        } else if num_correct == 1 {
            AgreementType::SingleWinner
        } else {
            AgreementType::MixedMulti
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementType::AllCorrect => "all_correct",
            AgreementType::AllWrong => "all_wrong",
            AgreementType::SingleWinner => "single_winner",
            AgreementType::MixedMulti => "mixed_multi",
        }
    }
}

impl fmt::Display for AgreementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of every method on one (task, length) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonRow {
    pub task_id: String,
    pub prompt_length: PromptLength,
    /// Aligned with [`MethodComparison::methods`]; a missing row counts as 0
    pub scores: Vec<u8>,
    pub num_correct: usize,
    pub winners: Vec<String>,
    pub agreement: AgreementType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodComparison {
    /// Sorted method names
    pub methods: Vec<String>,
    pub rows: Vec<ComparisonRow>,
    /// Pairwise disagreement rates, symmetric with a zero diagonal
    pub disagreement: Vec<Vec<f64>>,
}

/// Compare methods per (task, length) and compute their pairwise disagreement
pub fn compare_methods(data: &BTreeMap<String, Vec<PredictionRow>>) -> MethodComparison {
    let methods: Vec<String> = data.keys().cloned().collect();

    let mut table: BTreeMap<(String, PromptLength), HashMap<&str, u8>> = BTreeMap::new();
    for (method, rows) in data {
        for row in rows {
            table
                .entry((row.task_id.clone(), row.prompt_length))
                .or_default()
                .insert(method.as_str(), row.is_correct);
        }
    }

    let n = methods.len();
    let mut mismatches = vec![vec![0usize; n]; n];

    let rows: Vec<ComparisonRow> = table
        .into_iter()
        .map(|((task_id, prompt_length), by_method)| {
            let scores: Vec<u8> = methods
                .iter()
                .map(|m| by_method.get(m.as_str()).copied().unwrap_or(0))
                .collect();

            for i in 0..n {
                for j in (i + 1)..n {
                    if scores[i] != scores[j] {
                        mismatches[i][j] += 1;
                    }
                }
            }

            let winners: Vec<String> = methods
                .iter()
                .zip(&scores)
                .filter(|(_, score)| **score == 1)
                .map(|(m, _)| m.clone())
                .collect();
            let num_correct = winners.len();

            ComparisonRow {
                task_id,
                prompt_length,
                scores,
                num_correct,
                winners,
                agreement: AgreementType::classify(num_correct, n),
            }
        })
        .collect();

    let total = rows.len();
    let mut disagreement = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let rate = StatisticalAnalyzer::fraction(mismatches[i][j], total);
            disagreement[i][j] = rate;
            disagreement[j][i] = rate;
        }
    }

    MethodComparison {
        methods,
        rows,
        disagreement,
    }
}

// ===== Pairwise Method Effects =====

/// Baseline vs. another method at one prompt length
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LengthDelta {
    pub prompt_length: PromptLength,
    pub baseline_acc: f64,
    pub other_acc: f64,
    /// `other_acc - baseline_acc`
    pub delta_acc: f64,
}

/// Per-length accuracy deltas. Lengths missing from either side are skipped.
pub fn compare_by_length(baseline: &[PredictionRow], other: &[PredictionRow]) -> Vec<LengthDelta> {
    let base = accuracy_by_length(baseline);
    let other = accuracy_by_length(other);

    PromptLength::ALL
        .iter()
        .filter_map(|length| {
            let b = *base.get(length)?;
            let o = *other.get(length)?;
            Some(LengthDelta {
                prompt_length: *length,
                baseline_acc: b,
                other_acc: o,
                delta_acc: o - b,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlipCounts {
    /// Baseline wrong, other right
    pub improved: usize,
    /// Baseline right, other wrong
    pub worsened: usize,
    pub same: usize,
}

impl FlipCounts {
    pub fn total(&self) -> usize {
        self.improved + self.worsened + self.same
    }

    pub fn improved_frac(&self) -> f64 {
        StatisticalAnalyzer::fraction(self.improved, self.total())
    }

    pub fn worsened_frac(&self) -> f64 {
        StatisticalAnalyzer::fraction(self.worsened, self.total())
    }

    pub fn same_frac(&self) -> f64 {
        StatisticalAnalyzer::fraction(self.same, self.total())
    }
}

/// Count outcome flips between baseline and another method over shared (task, length) keys
pub fn flip_counts(baseline: &[PredictionRow], other: &[PredictionRow]) -> FlipCounts {
    let other_map: HashMap<(&str, PromptLength), u8> = other
        .iter()
        .map(|r| ((r.task_id.as_str(), r.prompt_length), r.is_correct))
        .collect();
    let base_map: HashMap<(&str, PromptLength), u8> = baseline
        .iter()
        .map(|r| ((r.task_id.as_str(), r.prompt_length), r.is_correct))
        .collect();

    let mut counts = FlipCounts::default();
    for (key, b) in base_map {
        let Some(&o) = other_map.get(&key) else {
            continue;
        };
        match (b, o) {
            (b, o) if b == o => counts.same += 1,
            (0, 1) => counts.improved += 1,
            (1, 0) => counts.worsened += 1,
            _ => {}
        }
    }
    counts
}

// ===== Answer Length =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LengthCorrelation {
    pub method: String,
    pub avg_len_correct: f64,
    pub avg_len_incorrect: f64,
    pub diff_correct_minus_incorrect: f64,
    pub n_correct: usize,
    pub n_incorrect: usize,
}

/// Mean answer word count for correct vs. incorrect rows.
///
/// `None` unless both groups are non-empty.
pub fn length_correlation(method: &str, rows: &[PredictionRow]) -> Option<LengthCorrelation> {
    let (correct, incorrect): (Vec<&PredictionRow>, Vec<&PredictionRow>) =
        rows.iter().partition(|r| r.correct());

    let word_counts = |group: &[&PredictionRow]| -> Vec<f64> {
        group
            .iter()
            .map(|r| r.predicted_answer.split_whitespace().count() as f64)
            .collect()
    };

    let avg_len_correct = StatisticalAnalyzer::mean(&word_counts(&correct))?;
    let avg_len_incorrect = StatisticalAnalyzer::mean(&word_counts(&incorrect))?;

    Some(LengthCorrelation {
        method: method.to_string(),
        avg_len_correct,
        avg_len_incorrect,
        diff_correct_minus_incorrect: avg_len_correct - avg_len_incorrect,
        n_correct: correct.len(),
        n_incorrect: incorrect.len(),
    })
}
