//! Task datasets and prompt-variant construction

use prompt_lab_core::{DatasetSource, ExperimentSettings, PromptLength, PromptVariant, Task, TaskType};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{WorkflowError, WorkflowResult};

/// Marker every rendered prompt ends with
pub const ANSWER_MARKER: &str = "Answer:";

/// Neutral sentences used, in order and cyclically, to pad prompts
const FILLER_SENTENCES: &[&str] = &[
    "Take the information above at face value.",
    "No additional context is required to respond.",
    "The question is self-contained and unambiguous.",
    "Focus only on what is asked.",
    "Formatting beyond the requested answer is unnecessary.",
    "The expected response is short.",
];

/// The three built-in tasks used when no dataset file is configured
pub fn generate_dummy_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "sentiment_1",
            TaskType::Sentiment,
            "I loved the movie, it was fantastic!",
            "positive",
        ),
        Task::new("math_1", TaskType::Math, "What is 7 + 5?", "12"),
        Task::new(
            "logic_1",
            TaskType::Logic,
            "If all A are B, and all B are C, are all A also C?",
            "yes",
        ),
    ]
}

/// Load tasks from a JSON array of task objects.
///
/// Task ids must be unique within the file.
pub fn load_tasks_from_json(path: impl AsRef<Path>) -> WorkflowResult<Vec<Task>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(WorkflowError::NotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let tasks: Vec<Task> = serde_json::from_str(&contents)?;

    let mut seen = HashSet::new();
    for task in &tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(WorkflowError::Validation(format!(
                "Duplicate task id '{}' in {}",
                task.id,
                path.display()
            )));
        }
    }

    info!(path = %path.display(), count = tasks.len(), "Loaded tasks");
    Ok(tasks)
}

/// Tasks for an experiment, from the dummy generator or the configured file
pub fn load_dataset(settings: &ExperimentSettings) -> WorkflowResult<Vec<Task>> {
    match settings.dataset {
        DatasetSource::Dummy => Ok(generate_dummy_tasks()),
        DatasetSource::File => {
            let path = settings.dataset_path.as_ref().ok_or_else(|| {
                WorkflowError::Validation("dataset 'file' requires a dataset_path".to_string())
            })?;
            load_tasks_from_json(path)
        }
    }
}

fn instruction(task_type: TaskType, length: PromptLength) -> &'static str {
    match (task_type, length) {
        (TaskType::Sentiment, PromptLength::Short) => {
            "Answer with one word: positive or negative."
        }
        (TaskType::Sentiment, PromptLength::Medium) => {
            "Classify the sentiment of the following text. Answer with one word: positive or negative."
        }
        (TaskType::Sentiment, PromptLength::Long) => {
            "You are a careful annotator. Read the text below and decide whether its overall \
             sentiment is positive or negative. Respond with exactly one word, either positive \
             or negative, and nothing else."
        }
        (TaskType::Math, PromptLength::Short) => "Give only the numeric answer.",
        (TaskType::Math, PromptLength::Medium) => {
            "Solve the following arithmetic question. Give only the numeric answer."
        }
        (TaskType::Math, PromptLength::Long) => {
            "You are a precise calculator. Work out the arithmetic question below. Respond with \
             the final numeric answer only, without units, words or explanation."
        }
        (TaskType::Logic, PromptLength::Short) => "Answer with one word: yes or no.",
        (TaskType::Logic, PromptLength::Medium) => {
            "Decide whether the conclusion follows from the statement. Answer with one word: yes or no."
        }
        (TaskType::Logic, PromptLength::Long) => {
            "You are a careful logician. Read the statement below and decide whether the \
             conclusion necessarily follows. Respond with exactly one word, either yes or no, \
             and nothing else."
        }
    }
}

fn target_words(length: PromptLength) -> usize {
    match length {
        PromptLength::Short => 50,
        PromptLength::Medium => 200,
        PromptLength::Long => 500,
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Renders the short, medium and long prompt for each task
#[derive(Debug, Clone, Copy)]
pub struct PromptVariantBuilder {
    padding: bool,
}

impl Default for PromptVariantBuilder {
    fn default() -> Self {
        Self { padding: true }
    }
}

impl PromptVariantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable filler padding up to the tier's word target
    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn render(&self, task: &Task, length: PromptLength) -> String {
        let body = format!("{}\n\n{}", instruction(task.task_type, length), task.input_text);

        let mut filler: Vec<&str> = Vec::new();
        if self.padding {
            let target = target_words(length);
            let mut words = word_count(&body) + word_count(ANSWER_MARKER);
            for sentence in FILLER_SENTENCES.iter().cycle() {
                if words >= target {
                    break;
                }
                words += word_count(sentence);
                filler.push(*sentence);
            }
        }

        if filler.is_empty() {
            format!("{}\n\n{}", body, ANSWER_MARKER)
        } else {
            format!("{}\n\n{}\n\n{}", body, filler.join(" "), ANSWER_MARKER)
        }
    }

    /// Three variants per task, in task order and then short, medium, long
    pub fn build(&self, tasks: &[Task]) -> Vec<PromptVariant> {
        let variants: Vec<PromptVariant> = tasks
            .iter()
            .flat_map(|task| {
                PromptLength::ALL.into_iter().map(move |length| {
                    PromptVariant::new(task.id.clone(), length, self.render(task, length))
                })
            })
            .collect();

        debug!(tasks = tasks.len(), variants = variants.len(), "Built prompt variants");
        variants
    }
}

/// Padded prompt variants for every task
pub fn build_prompt_variants(tasks: &[Task]) -> Vec<PromptVariant> {
    PromptVariantBuilder::default().build(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_tasks() {
        let tasks = generate_dummy_tasks();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["sentiment_1", "math_1", "logic_1"]);
    }

    #[test]
    fn test_padding_reaches_target() {
        let task = Task::new("math_1", TaskType::Math, "What is 7 + 5?", "12");
        let builder = PromptVariantBuilder::new();

        for length in PromptLength::ALL {
            let prompt = builder.render(&task, length);
            assert!(word_count(&prompt) >= target_words(length));
            assert!(prompt.ends_with(ANSWER_MARKER));
        }
    }

    #[test]
    fn test_unpadded_prompt() {
        let task = Task::new("math_1", TaskType::Math, "What is 7 + 5?", "12");
        let prompt = PromptVariantBuilder::new()
            .with_padding(false)
            .render(&task, PromptLength::Short);

        assert_eq!(prompt, "Give only the numeric answer.\n\nWhat is 7 + 5?\n\nAnswer:");
    }
}
