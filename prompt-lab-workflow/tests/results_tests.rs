use pretty_assertions::assert_eq;
use prompt_lab_core::{MetricsRow, PredictionRow, PromptLength};
use prompt_lab_workflow::{html_escape, HtmlReport, ResultStore, WorkflowError};

fn row(task_id: &str, predicted: &str) -> PredictionRow {
    PredictionRow {
        task_id: task_id.to_string(),
        prompt_length: PromptLength::Medium,
        prompt_text: "Line one\nline two, with comma".to_string(),
        predicted_answer: predicted.to_string(),
        ground_truth: "12".to_string(),
        is_correct: 1,
    }
}

#[test]
fn test_predictions_csv_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("nested/results"));

    let path = store
        .write_predictions("baseline", &[row("math_1", "12"), row("math_2", "<b>7</b>")])
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents.lines().next(),
        Some("task_id,prompt_length,prompt_text,predicted_answer,ground_truth,is_correct")
    );
    assert_eq!(
        store.read_predictions("baseline").unwrap(),
        vec![row("math_1", "12"), row("math_2", "<b>7</b>")]
    );
}

#[test]
fn test_metrics_csv_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultStore::new(dir.path());
    let metrics = MetricsRow {
        total: 4,
        correct: 1,
        accuracy: 0.25,
    };

    store.write_metrics("cot", &metrics).unwrap();

    let contents = std::fs::read_to_string(store.metrics_path("cot")).unwrap();
    assert_eq!(contents, "total,correct,accuracy\n4,1,0.25\n");
    assert_eq!(store.read_metrics("cot").unwrap(), metrics);
}

#[test]
fn test_empty_metrics_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultStore::new(dir.path());
    std::fs::write(store.metrics_path("cot"), "total,correct,accuracy\n").unwrap();

    let err = store.read_metrics("cot").unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
}

#[test]
fn test_missing_predictions_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ResultStore::new(dir.path()).read_predictions("fewshot").unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[test]
fn test_report_escapes_cell_text() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("length_correlation_summary.csv"),
        "method,note\nbaseline,<script>alert('x')</script>\n",
    )
    .unwrap();

    let report = HtmlReport::collect(dir.path(), chrono::Local::now()).unwrap();
    let html = report.render();

    assert_eq!(report.sections.len(), 1);
    assert!(html.contains(&html_escape("<script>alert('x')</script>")));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_report_previews_first_ten_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = String::from("method,short\n");
    for i in 0..15 {
        csv.push_str(&format!("m{i},0.5\n"));
    }
    std::fs::write(dir.path().join("prompt_variation_summary.csv"), csv).unwrap();

    let report = HtmlReport::collect(dir.path(), chrono::Local::now()).unwrap();

    assert_eq!(report.sections[0].1.rows.len(), 10);
    assert_eq!(report.sections[0].0, "Prompt Variation: Accuracy vs Prompt Length");
}
