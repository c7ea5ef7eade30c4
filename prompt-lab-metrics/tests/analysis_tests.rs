use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use prompt_lab_core::{PredictionRow, PromptLength};
use prompt_lab_metrics::*;
use std::collections::BTreeMap;

fn row(task_id: &str, length: PromptLength, answer: &str, is_correct: u8) -> PredictionRow {
    PredictionRow {
        task_id: task_id.to_string(),
        prompt_length: length,
        prompt_text: format!("{} prompt", task_id),
        predicted_answer: answer.to_string(),
        ground_truth: "yes".to_string(),
        is_correct,
    }
}

fn rows(scores: &[(&str, PromptLength, u8)]) -> Vec<PredictionRow> {
    scores
        .iter()
        .map(|(id, length, correct)| row(id, *length, "yes", *correct))
        .collect()
}

use PromptLength::{Long, Medium, Short};

#[test]
fn test_accuracy_by_length() {
    let data = rows(&[("a", Short, 1), ("b", Short, 0), ("a", Medium, 1), ("b", Medium, 1)]);

    let by_length = accuracy_by_length(&data);

    assert_eq!(by_length.len(), 2);
    assert_relative_eq!(by_length[&Short], 0.5);
    assert_relative_eq!(by_length[&Medium], 1.0);
    assert!(!by_length.contains_key(&Long));
}

#[test]
fn test_prompt_variation_sensitivity() {
    let data = rows(&[("a", Short, 0), ("a", Medium, 1), ("a", Long, 1)]);

    let variation = prompt_variation("baseline", &data).unwrap();

    assert_eq!(variation.short, Some(0.0));
    assert_eq!(variation.long, Some(1.0));
    // stdev of [0, 1, 1]
    assert_relative_eq!(variation.sensitivity, 0.5773502691896258, epsilon = 1e-12);
}

#[test]
fn test_prompt_variation_single_length_has_zero_sensitivity() {
    let variation = prompt_variation("cot", &rows(&[("a", Long, 1)])).unwrap();
    assert_eq!(variation.sensitivity, 0.0);
    assert_eq!(variation.short, None);

    assert!(prompt_variation("cot", &[]).is_none());
}

#[test]
fn test_compare_methods() {
    let mut data = BTreeMap::new();
    data.insert("cot".to_string(), rows(&[("a", Short, 1), ("b", Short, 0)]));
    data.insert("baseline".to_string(), rows(&[("a", Short, 0), ("b", Short, 0)]));
    data.insert("fewshot".to_string(), rows(&[("a", Short, 1)]));

    let comparison = compare_methods(&data);

    assert_eq!(comparison.methods, vec!["baseline", "cot", "fewshot"]);
    assert_eq!(comparison.rows.len(), 2);

    let first = &comparison.rows[0];
    assert_eq!(first.task_id, "a");
    assert_eq!(first.scores, vec![0, 1, 1]);
    assert_eq!(first.winners, vec!["cot", "fewshot"]);
    assert_eq!(first.agreement, AgreementType::MixedMulti);

    let second = &comparison.rows[1];
    assert_eq!(second.scores, vec![0, 0, 0]);
    assert!(second.winners.is_empty());
    assert_eq!(second.agreement, AgreementType::AllWrong);

    // baseline vs cot differ on "a" only
    assert_relative_eq!(comparison.disagreement[0][1], 0.5);
    assert_relative_eq!(comparison.disagreement[1][0], 0.5);
    // cot vs fewshot agree everywhere (missing fewshot row counts as 0)
    assert_relative_eq!(comparison.disagreement[1][2], 0.0);
    for i in 0..3 {
        assert_eq!(comparison.disagreement[i][i], 0.0);
    }
}

#[test]
fn test_rows_are_ordered_by_task_then_length() {
    let mut data = BTreeMap::new();
    data.insert(
        "baseline".to_string(),
        rows(&[("b", Short, 1), ("a", Long, 1), ("a", Short, 1)]),
    );

    let comparison = compare_methods(&data);
    let keys: Vec<(String, PromptLength)> = comparison
        .rows
        .iter()
        .map(|r| (r.task_id.clone(), r.prompt_length))
        .collect();

    assert_eq!(
        keys,
        vec![("a".to_string(), Short), ("a".to_string(), Long), ("b".to_string(), Short)]
    );
    assert_eq!(comparison.rows[0].agreement, AgreementType::AllCorrect);
}

#[test]
fn test_compare_by_length_skips_missing_lengths() {
    let baseline = rows(&[("a", Short, 0), ("a", Medium, 1)]);
    let cot = rows(&[("a", Short, 1), ("a", Long, 1)]);

    let deltas = compare_by_length(&baseline, &cot);

    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].prompt_length, Short);
    assert_relative_eq!(deltas[0].delta_acc, 1.0);
}

#[test]
fn test_flip_counts() {
    let baseline = rows(&[("a", Short, 0), ("b", Short, 1), ("c", Short, 1), ("d", Short, 0)]);
    let cot = rows(&[("a", Short, 1), ("b", Short, 0), ("c", Short, 1)]);

    let flips = flip_counts(&baseline, &cot);

    assert_eq!(flips, FlipCounts { improved: 1, worsened: 1, same: 1 });
    assert_eq!(flips.total(), 3);
    assert_relative_eq!(flips.same_frac(), 1.0 / 3.0);
}

#[test]
fn test_length_correlation() {
    let data = vec![
        row("a", Short, "yes", 1),
        row("b", Short, "no it is not", 0),
        row("c", Short, "I think the answer is no", 0),
    ];

    let summary = length_correlation("baseline", &data).unwrap();

    assert_eq!(summary.n_correct, 1);
    assert_eq!(summary.n_incorrect, 2);
    assert_relative_eq!(summary.avg_len_correct, 1.0);
    assert_relative_eq!(summary.avg_len_incorrect, 5.0);
    assert_relative_eq!(summary.diff_correct_minus_incorrect, -4.0);
}

#[test]
fn test_length_correlation_needs_both_groups() {
    let data = rows(&[("a", Short, 0), ("b", Short, 0)]);
    assert!(length_correlation("baseline", &data).is_none());
}
