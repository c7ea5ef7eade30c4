use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Sentiment,
    Math,
    Logic,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Sentiment => "sentiment",
            TaskType::Math => "math",
            TaskType::Logic => "logic",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sentiment" => Ok(TaskType::Sentiment),
            "math" => Ok(TaskType::Math),
            "logic" => Ok(TaskType::Logic),
            other => Err(CoreError::Validation(format!("Unknown task type: {}", other))),
        }
    }
}

/// A single question with its ground-truth answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub task_type: TaskType,
    pub input_text: String,
    pub ground_truth: String,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        task_type: TaskType,
        input_text: impl Into<String>,
        ground_truth: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            task_type,
            input_text: input_text.into(),
            ground_truth: ground_truth.into(),
        }
    }
}
