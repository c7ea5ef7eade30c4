use prompt_lab_core::{FewShotExample, FewShotSettings};

use super::{MethodKind, PromptStrategy};

pub const FEWSHOT_INSTRUCTION: &str = "Below are examples of correct responses. Follow the patterns.";

/// Prepends worked input/output examples to the prompt
#[derive(Debug, Clone)]
pub struct FewShotStrategy {
    pub examples: Vec<FewShotExample>,
    pub add_instruction: bool,
}

impl FewShotStrategy {
    pub fn new(examples: Vec<FewShotExample>) -> Self {
        Self {
            examples,
            add_instruction: true,
        }
    }

    pub fn from_settings(settings: &FewShotSettings, examples: Vec<FewShotExample>) -> Self {
        Self {
            examples,
            add_instruction: settings.add_instruction,
        }
    }
}

impl PromptStrategy for FewShotStrategy {
    fn kind(&self) -> MethodKind {
        MethodKind::FewShot
    }

    fn render(&self, prompt: &str) -> String {
        let mut blocks = Vec::with_capacity(self.examples.len() + 2);
        if self.add_instruction {
            blocks.push(FEWSHOT_INSTRUCTION.to_string());
        }
        blocks.extend(
            self.examples
                .iter()
                .map(|ex| format!("Input: {}\nOutput: {}", ex.input, ex.output)),
        );
        blocks.push(format!("Input: {}\nOutput:", prompt));
        blocks.join("\n\n")
    }
}
