use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use prompt_lab_core::{PromptLength, Task, TaskType};
use prompt_lab_workflow::{
    build_prompt_variants, generate_dummy_tasks, load_tasks_from_json, PromptVariantBuilder,
    WorkflowError, ANSWER_MARKER,
};
use std::io::Write;

fn task_type() -> impl Strategy<Value = TaskType> {
    prop_oneof![
        Just(TaskType::Sentiment),
        Just(TaskType::Math),
        Just(TaskType::Logic),
    ]
}

proptest! {
    #[test]
    fn three_variants_per_task(inputs in prop::collection::vec(("[a-z ]{1,60}", task_type()), 0..8)) {
        let tasks: Vec<Task> = inputs
            .iter()
            .enumerate()
            .map(|(i, (text, kind))| Task::new(format!("task_{i}"), *kind, text.clone(), "x"))
            .collect();

        let variants = build_prompt_variants(&tasks);

        prop_assert_eq!(variants.len(), tasks.len() * 3);
        for (task, chunk) in tasks.iter().zip(variants.chunks(3)) {
            let lengths: Vec<PromptLength> = chunk.iter().map(|v| v.length).collect();
            prop_assert_eq!(lengths, PromptLength::ALL.to_vec());
            prop_assert!(chunk.iter().all(|v| v.task_id == task.id));
            prop_assert!(chunk.iter().all(|v| v.prompt_text.ends_with(ANSWER_MARKER)));
        }
    }
}

#[test]
fn test_variants_are_deterministic() {
    let tasks = generate_dummy_tasks();
    assert_eq!(build_prompt_variants(&tasks), build_prompt_variants(&tasks));
}

#[rstest]
#[case(PromptLength::Short, 50)]
#[case(PromptLength::Medium, 200)]
#[case(PromptLength::Long, 500)]
fn test_padded_variants_reach_word_targets(#[case] length: PromptLength, #[case] target: usize) {
    let variants = build_prompt_variants(&generate_dummy_tasks());

    for variant in variants.iter().filter(|v| v.length == length) {
        assert!(
            variant.word_count() >= target,
            "{} has {} words",
            variant.task_id,
            variant.word_count()
        );
    }
}

#[test]
fn test_unpadded_variants_grow_with_length() {
    let task = &generate_dummy_tasks()[0];
    let builder = PromptVariantBuilder::new().with_padding(false);

    let short = builder.render(task, PromptLength::Short);
    let medium = builder.render(task, PromptLength::Medium);
    let long = builder.render(task, PromptLength::Long);

    assert!(short.len() < medium.len());
    assert!(medium.len() < long.len());
    assert!(long.contains(&task.input_text));
}

#[test]
fn test_load_tasks_from_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": "m1", "task_type": "math", "input_text": "What is 2 + 2?", "ground_truth": "4"}},
            {{"id": "s1", "task_type": "sentiment", "input_text": "Awful.", "ground_truth": "negative"}}
        ]"#
    )
    .unwrap();

    let tasks = load_tasks_from_json(file.path()).unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0], Task::new("m1", TaskType::Math, "What is 2 + 2?", "4"));
    assert_eq!(tasks[1].task_type, TaskType::Sentiment);
}

#[test]
fn test_load_tasks_rejects_duplicate_ids() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": "m1", "task_type": "math", "input_text": "a", "ground_truth": "1"}},
            {{"id": "m1", "task_type": "math", "input_text": "b", "ground_truth": "2"}}
        ]"#
    )
    .unwrap();

    let err = load_tasks_from_json(file.path()).unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(ref msg) if msg.contains("m1")));
}

#[test]
fn test_load_tasks_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_tasks_from_json(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}
