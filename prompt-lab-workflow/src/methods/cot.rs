use prompt_lab_core::CotSettings;

use super::{MethodKind, PromptStrategy};

pub const COT_PREFIX: &str = "You are an AI assistant. Let's think about this step by step.";
pub const COT_SUFFIX: &str =
    "Take a moment to reason carefully, then provide a clear final answer.";

/// Wraps the prompt in step-by-step reasoning cues
#[derive(Debug, Clone, Copy)]
pub struct CotStrategy {
    pub add_prefix: bool,
    pub add_suffix: bool,
}

impl Default for CotStrategy {
    fn default() -> Self {
        Self {
            add_prefix: true,
            add_suffix: true,
        }
    }
}

impl CotStrategy {
    pub fn from_settings(settings: &CotSettings) -> Self {
        Self {
            add_prefix: settings.add_prefix,
            add_suffix: settings.add_suffix,
        }
    }
}

impl PromptStrategy for CotStrategy {
    fn kind(&self) -> MethodKind {
        MethodKind::Cot
    }

    fn render(&self, prompt: &str) -> String {
        let mut parts = Vec::with_capacity(3);
        if self.add_prefix {
            parts.push(COT_PREFIX);
        }
        parts.push(prompt);
        if self.add_suffix {
            parts.push(COT_SUFFIX);
        }
        parts.join("\n\n")
    }
}
