use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const CONFIG: &str = r#"
model:
  provider: dummy
  model_name: gpt-4o
  temperature: 0.0
  max_tokens: 64
experiment:
  name: cli-test
  methods: [baseline, cot, fewshot]
  dataset: dummy
  output_dir: results
  analysis_dir: analysis_results
fewshot_examples:
  - input: "What is 2 + 2?"
    output: "4"
"#;

const ENV_VARS: &[&str] = &[
    "PROMPT_LAB_CONFIG",
    "PROMPT_LAB_PROVIDER",
    "PROMPT_LAB_DATASET_PATH",
    "PROMPT_LAB_OUTPUT_DIR",
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_DEPLOYMENT_NAME",
    "AZURE_OPENAI_API_VERSION",
    "RUST_LOG",
];

fn prompt_lab(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("prompt-lab").unwrap();
    cmd.current_dir(cwd).env("NO_COLOR", "1");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::write(dir.path().join("config/default.yaml"), CONFIG).unwrap();
    dir
}

#[test]
fn test_help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    prompt_lab(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run-all"))
        .stdout(predicate::str::contains("fewshot"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_missing_config_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    prompt_lab(dir.path())
        .arg("baseline")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_baseline_writes_results_in_working_directory() {
    let dir = workspace();

    prompt_lab(dir.path())
        .arg("baseline")
        .assert()
        .success()
        .stdout(predicate::str::contains("experiment:baseline"));

    assert!(dir.path().join("results/baseline_predictions.csv").exists());
    assert!(dir.path().join("results/baseline_metrics.csv").exists());
    assert!(!dir.path().join("results/cot_predictions.csv").exists());
}

#[test]
fn test_full_pipeline_json_output() {
    let dir = workspace();

    let assert = prompt_lab(dir.path())
        .args(["--output", "json", "full"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["pipeline"], "full");
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 8);
    assert!(dir.path().join("analysis_results/report.html").exists());
}

#[test]
fn test_analyze_without_results_exits_with_one() {
    let dir = workspace();

    prompt_lab(dir.path())
        .arg("analyze")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("prompt_variation"));
}

#[test]
fn test_explicit_config_and_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("experiment.yaml");
    std::fs::write(&config_path, CONFIG).unwrap();

    prompt_lab(dir.path())
        .args(["cot", "--config"])
        .arg(&config_path)
        .args(["--output-dir", "custom-out"])
        .assert()
        .success();

    assert!(dir.path().join("custom-out/cot_predictions.csv").exists());
}

#[test]
fn test_config_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("env.yaml");
    std::fs::write(&config_path, CONFIG).unwrap();

    prompt_lab(dir.path())
        .env("PROMPT_LAB_CONFIG", &config_path)
        .env("PROMPT_LAB_OUTPUT_DIR", dir.path().join("env-out"))
        .arg("fewshot")
        .assert()
        .success();

    assert!(dir.path().join("env-out/fewshot_predictions.csv").exists());
}

#[test]
fn test_dataset_path_flag_loads_tasks_file() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[{"id": "m1", "task_type": "math", "input_text": "What is 1 + 1?", "ground_truth": "2"}]"#,
    )
    .unwrap();

    prompt_lab(dir.path())
        .args(["baseline", "--dataset-path", "tasks.json"])
        .assert()
        .success();

    let csv = std::fs::read_to_string(dir.path().join("results/baseline_predictions.csv")).unwrap();
    assert_eq!(csv.lines().filter(|l| l.starts_with("m1,")).count(), 3);
}

#[test]
fn test_azure_provider_without_credentials_fails() {
    let dir = workspace();

    prompt_lab(dir.path())
        .args(["baseline", "--provider", "azure"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing required environment variables"));
}
