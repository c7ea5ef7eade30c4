use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Verbosity tier of a rendered prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PromptLength {
    Short,
    Medium,
    Long,
}

impl PromptLength {
    pub const ALL: [PromptLength; 3] = [PromptLength::Short, PromptLength::Medium, PromptLength::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptLength::Short => "short",
            PromptLength::Medium => "medium",
            PromptLength::Long => "long",
        }
    }
}

impl fmt::Display for PromptLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptLength {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(PromptLength::Short),
            "medium" => Ok(PromptLength::Medium),
            "long" => Ok(PromptLength::Long),
            other => Err(CoreError::Validation(format!("Unknown prompt length: {}", other))),
        }
    }
}

/// One rendering of a task's prompt at a given length tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptVariant {
    pub task_id: String,
    pub length: PromptLength,
    pub prompt_text: String,
}

impl PromptVariant {
    pub fn new(task_id: impl Into<String>, length: PromptLength, prompt_text: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            length,
            prompt_text: prompt_text.into(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.prompt_text.split_whitespace().count()
    }
}
